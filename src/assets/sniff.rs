use crate::{
    assets::handle::DesignFormat,
    config::limits::{MIME_JPEG, MIME_JPG, MIME_PNG, MIME_SVG},
};

pub const PNG_SIGNATURE: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
pub const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Map a declared media type to the format it claims. Parameters (`;charset=...`) and case
/// are ignored. `image/jpg` is accepted as an alias of `image/jpeg`.
pub fn declared_format(media_type: &str) -> Option<DesignFormat> {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        MIME_PNG => Some(DesignFormat::Png),
        MIME_JPEG | MIME_JPG => Some(DesignFormat::Jpeg),
        MIME_SVG => Some(DesignFormat::Svg),
        _ => None,
    }
}

/// Identify a raster format from its leading bytes.
pub fn sniff_raster(bytes: &[u8]) -> Option<DesignFormat> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        Some(DesignFormat::Png)
    } else if bytes.starts_with(&JPEG_SIGNATURE) {
        Some(DesignFormat::Jpeg)
    } else {
        None
    }
}

/// Decide the format the rest of the pipeline treats the bytes as.
///
/// SVG is text, so it is taken from the declared type and proven later by the XML parser.
/// Raster content must carry the signature of the declared format.
pub fn detect_format(declared: DesignFormat, bytes: &[u8]) -> Option<DesignFormat> {
    match declared {
        DesignFormat::Svg => Some(DesignFormat::Svg),
        raster => sniff_raster(bytes).filter(|sniffed| *sniffed == raster),
    }
}
