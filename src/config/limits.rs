/// Largest accepted upload, in bytes (10 MB, decimal).
pub const MAX_FILE_SIZE_BYTES: u64 = 10_000_000;
/// Largest accepted image side, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 4096;

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
/// Non-standard alias some platforms report for `.jpg` files.
pub const MIME_JPG: &str = "image/jpg";
pub const MIME_SVG: &str = "image/svg+xml";

/// Size and dimension ceilings applied by the file validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationLimits {
    pub max_file_bytes: u64,
    pub max_dimension_px: u32,
}

impl ValidationLimits {
    /// Whole megabytes, as shown to the user.
    pub fn max_file_mb(&self) -> u64 {
        self.max_file_bytes / 1_000_000
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_SIZE_BYTES,
            max_dimension_px: MAX_IMAGE_DIMENSION,
        }
    }
}
