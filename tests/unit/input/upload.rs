use std::{io::Cursor, path::PathBuf};

use super::*;
use crate::foundation::error::StitchError;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([9, 9, 9, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stitchview-upload-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn extension_mapping_mirrors_browser_types() {
    assert_eq!(declared_type_for_path(Path::new("a/logo.PNG")), "image/png");
    assert_eq!(declared_type_for_path(Path::new("x.jpg")), "image/jpeg");
    assert_eq!(declared_type_for_path(Path::new("x.jpeg")), "image/jpeg");
    assert_eq!(declared_type_for_path(Path::new("x.svg")), "image/svg+xml");
    assert_eq!(declared_type_for_path(Path::new("x.gif")), "");
    assert_eq!(declared_type_for_path(Path::new("noext")), "");
    assert_eq!(declared_type_for_path(Path::new("png")), "");
    assert_eq!(declared_type_for_path(Path::new("a.Jpeg")), "image/jpeg");
}

#[test]
fn successful_upload_replaces_previous_design() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();
    let mut uploader = DesignUploader::default();

    uploader
        .handle_file(RawFile::new("a.png", "image/png", png(4, 4)), &registry, &mut store)
        .unwrap();
    uploader
        .handle_file(RawFile::new("b.png", "image/png", png(6, 6)), &registry, &mut store)
        .unwrap();

    assert!(!uploader.is_processing());
    assert!(uploader.last_error().is_none());
    assert_eq!(registry.live_count(), 1);
    assert_eq!(registry.released_count(), 1);
    let design = store.state().design.as_ref().unwrap();
    assert_eq!(design.display_name(), "b.png");
}

#[test]
fn rejection_keeps_current_design_and_records_error() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();
    let mut uploader = DesignUploader::default();
    uploader
        .handle_file(RawFile::new("a.png", "image/png", png(4, 4)), &registry, &mut store)
        .unwrap();

    let err = uploader
        .handle_file(RawFile::new("b.gif", "image/gif", vec![1, 2, 3]), &registry, &mut store)
        .unwrap_err();
    assert_eq!(err.code(), "unsupported_type");
    assert_eq!(uploader.last_error(), Some(&err));
    assert_eq!(store.state().design.as_ref().unwrap().display_name(), "a.png");
    assert_eq!(registry.live_count(), 1);

    uploader.clear(&mut store);
    assert!(uploader.last_error().is_none());
    assert!(store.state().design.is_none());
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn drop_takes_first_file_only() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();
    let mut uploader = DesignUploader::default();

    assert!(uploader.handle_drop(vec![], &registry, &mut store).is_none());

    let result = uploader.handle_drop(
        vec![
            RawFile::new("first.png", "image/png", png(2, 2)),
            RawFile::new("second.png", "image/png", png(3, 3)),
        ],
        &registry,
        &mut store,
    );
    assert_eq!(result, Some(Ok(())));
    assert_eq!(registry.created_count(), 1);
    assert_eq!(store.state().design.as_ref().unwrap().dimensions(), (2, 2));
}

#[test]
fn reading_from_disk_checks_size_first() {
    let dir = scratch_dir("read");
    let ok = dir.join("logo.png");
    std::fs::write(&ok, png(5, 5)).unwrap();
    let empty = dir.join("empty.svg");
    std::fs::write(&empty, b"").unwrap();

    let raw = read_raw_file(&ok, &FileValidator::default()).unwrap();
    assert_eq!(raw.name, "logo.png");
    assert_eq!(raw.declared_type, "image/png");
    assert_eq!(raw.bytes, png(5, 5));

    assert!(matches!(
        read_raw_file(&empty, &FileValidator::default()),
        Err(StitchError::Upload(ValidationError::EmptyFile))
    ));
    assert!(matches!(
        read_raw_file(&dir.join("missing.png"), &FileValidator::default()),
        Err(StitchError::Other(_))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
