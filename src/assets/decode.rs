use std::{
    io::Cursor,
    sync::{Arc, OnceLock},
};

use crate::assets::handle::{DesignBlob, DesignFormat};

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("decode raster image: {0}")]
    Image(#[from] image::ImageError),

    #[error("parse svg tree: {0}")]
    Svg(#[from] usvg::Error),

    #[error("image has an empty size")]
    EmptySize,

    #[error("failed to allocate a {width}x{height} pixmap")]
    Alloc { width: u32, height: u32 },
}

/// Pixels ready to blend: row-major premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesignPixels {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

fn image_format(format: DesignFormat) -> Option<image::ImageFormat> {
    match format {
        DesignFormat::Png => Some(image::ImageFormat::Png),
        DesignFormat::Jpeg => Some(image::ImageFormat::Jpeg),
        DesignFormat::Svg => None,
    }
}

/// Read raster dimensions from the header without decoding pixel data.
pub fn probe_raster_dimensions(
    bytes: &[u8],
    format: DesignFormat,
) -> Result<(u32, u32), DecodeError> {
    let Some(fmt) = image_format(format) else {
        return Err(DecodeError::EmptySize);
    };
    Ok(image::ImageReader::with_format(Cursor::new(bytes), fmt).into_dimensions()?)
}

/// Fully decode raster bytes to straight RGBA8.
pub fn decode_raster(bytes: &[u8], format: DesignFormat) -> Result<image::RgbaImage, DecodeError> {
    let Some(fmt) = image_format(format) else {
        return Err(DecodeError::EmptySize);
    };
    let dyn_img = image::ImageReader::with_format(Cursor::new(bytes), fmt).decode()?;
    Ok(dyn_img.to_rgba8())
}

/// Parse SVG bytes without touching the filesystem or network.
///
/// Only `data:` image references are resolved; every other `href` resolves to nothing.
pub fn parse_svg(bytes: &[u8]) -> Result<usvg::Tree, DecodeError> {
    let opts = usvg::Options {
        resources_dir: None,
        fontdb: svg_fontdb(),
        image_href_resolver: usvg::ImageHrefResolver {
            resolve_data: usvg::ImageHrefResolver::default_data_resolver(),
            resolve_string: Box::new(|_, _| None),
        },
        ..Default::default()
    };
    match usvg::Tree::from_data(bytes, &opts) {
        Ok(tree) => Ok(tree),
        Err(usvg::Error::InvalidSize) => Err(DecodeError::EmptySize),
        Err(e) => Err(e.into()),
    }
}

/// Natural pixel size of a parsed SVG (rounded up).
pub fn svg_pixel_size(tree: &usvg::Tree) -> Result<(u32, u32), DecodeError> {
    fn to_px(v: f32) -> Option<u32> {
        (v.is_finite() && v > 0.0).then(|| v.ceil() as u32)
    }

    let size = tree.size();
    match (to_px(size.width()), to_px(size.height())) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(DecodeError::EmptySize),
    }
}

fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Decode `blob` and produce premultiplied pixels at exactly `width` x `height`.
///
/// Rasters are resampled; SVGs are rendered directly at the target size so they stay crisp.
pub fn render_design(
    blob: &DesignBlob,
    width: u32,
    height: u32,
) -> Result<DesignPixels, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptySize);
    }

    let rgba8_premul = match blob.format {
        DesignFormat::Svg => {
            let tree = parse_svg(&blob.bytes)?;
            rasterize_svg_to_premul_rgba8(&tree, width, height)?
        }
        raster => {
            let rgba = decode_raster(&blob.bytes, raster)?;
            let rgba = if rgba.dimensions() == (width, height) {
                rgba
            } else {
                image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle)
            };
            let mut bytes = rgba.into_raw();
            premultiply_rgba8_in_place(&mut bytes);
            bytes
        }
    };

    Ok(DesignPixels {
        width,
        height,
        rgba8_premul,
    })
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, DecodeError> {
    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(width, height).ok_or(DecodeError::Alloc { width, height })?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
