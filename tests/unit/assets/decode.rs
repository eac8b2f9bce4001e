use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn blob(format: DesignFormat, bytes: Vec<u8>, width: u32, height: u32) -> DesignBlob {
    DesignBlob {
        format,
        bytes: Arc::from(bytes),
        width,
        height,
    }
}

#[test]
fn probe_reads_png_header() {
    let bytes = png_bytes(37, 12, [0, 0, 0, 255]);
    assert_eq!(
        probe_raster_dimensions(&bytes, DesignFormat::Png).unwrap(),
        (37, 12)
    );
}

#[test]
fn probe_rejects_truncated_png() {
    let bytes = png_bytes(8, 8, [0, 0, 0, 255]);
    assert!(matches!(
        probe_raster_dimensions(&bytes[..10], DesignFormat::Png),
        Err(DecodeError::Image(_))
    ));
}

#[test]
fn render_native_size_is_premultiplied() {
    let bytes = png_bytes(1, 1, [100, 50, 200, 128]);
    let px = render_design(&blob(DesignFormat::Png, bytes, 1, 1), 1, 1).unwrap();
    assert_eq!(
        px.rgba8_premul,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn render_resamples_raster_to_target_size() {
    let bytes = png_bytes(40, 20, [255, 0, 0, 255]);
    let px = render_design(&blob(DesignFormat::Png, bytes, 40, 20), 10, 5).unwrap();
    assert_eq!((px.width, px.height), (10, 5));
    assert_eq!(px.rgba8_premul.len(), 10 * 5 * 4);
    assert_eq!(&px.rgba8_premul[..4], &[255, 0, 0, 255]);
}

#[test]
fn render_rejects_zero_target() {
    let bytes = png_bytes(1, 1, [0, 0, 0, 255]);
    assert!(matches!(
        render_design(&blob(DesignFormat::Png, bytes, 1, 1), 0, 1),
        Err(DecodeError::EmptySize)
    ));
}

#[test]
fn svg_size_and_rasterization() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10.2" height="4"><rect width="100%" height="100%" fill="#0000ff"/></svg>"##;
    let tree = parse_svg(svg).unwrap();
    assert_eq!(svg_pixel_size(&tree).unwrap(), (11, 4));

    let px = render_design(&blob(DesignFormat::Svg, svg.to_vec(), 11, 4), 22, 8).unwrap();
    assert_eq!((px.width, px.height), (22, 8));
    let center = ((4 * 22 + 11) * 4) as usize;
    assert_eq!(&px.rgba8_premul[center..center + 4], &[0, 0, 255, 255]);
}

#[test]
fn svg_external_images_are_not_resolved() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><image href="/etc/hostname" width="4" height="4"/></svg>"#;
    let tree = parse_svg(svg).unwrap();
    let px = render_design(&blob(DesignFormat::Svg, svg.to_vec(), 4, 4), 4, 4).unwrap();
    assert!(px.rgba8_premul.iter().all(|&b| b == 0));
    assert_eq!(svg_pixel_size(&tree).unwrap(), (4, 4));
}

#[test]
fn svg_parse_ok_and_err() {
    parse_svg(br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#).unwrap();
    assert!(parse_svg(br#"<svg"#).is_err());
}
