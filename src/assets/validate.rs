use std::sync::Arc;

use crate::{
    assets::{
        decode::{self, DecodeError},
        handle::{DesignBlob, DesignFormat, DesignHandle, HandleId, HandleRegistry},
        sanitize::{SanitizeReport, sanitize_svg_bytes},
        sniff::{declared_format, detect_format},
    },
    config::limits::ValidationLimits,
};

/// Longest display name shown before truncation, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 50;
const DISPLAY_NAME_FALLBACK: &str = "Design";

/// An untrusted file as handed over by a picker or a drop: name, declared media type, bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Why a design file was refused. `Display` is the message shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File is empty.")]
    EmptyFile,

    #[error("File is too large. Maximum size is {limit_mb}MB.")]
    TooLarge { limit_mb: u64 },

    #[error("Unsupported file type. Please upload a PNG, JPG, or SVG image.")]
    UnsupportedType { declared_type: String },

    #[error("File content does not match a supported image format.")]
    ContentMismatch,

    #[error("SVG file appears to be malformed or invalid.")]
    MalformedSvg,

    #[error("Could not decode image. File may be corrupted.")]
    DecodeFailed,

    #[error("Image appears to be empty or corrupted.")]
    EmptyImage,

    #[error("Image is too large. Maximum dimensions are {limit_px}×{limit_px}px.")]
    TooLargeDimensions { limit_px: u32 },
}

impl ValidationError {
    /// Stable machine-readable tag.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyFile => "empty_file",
            ValidationError::TooLarge { .. } => "too_large",
            ValidationError::UnsupportedType { .. } => "unsupported_type",
            ValidationError::ContentMismatch => "content_mismatch",
            ValidationError::MalformedSvg => "malformed_svg",
            ValidationError::DecodeFailed => "decode_failed",
            ValidationError::EmptyImage => "empty_image",
            ValidationError::TooLargeDimensions { .. } => "too_large_dimensions",
        }
    }
}

/// Validated artwork: the owning handle plus what the UI shows about it.
#[derive(Debug)]
pub struct DesignAsset {
    handle: DesignHandle,
    display_name: String,
    format: DesignFormat,
    width: u32,
    height: u32,
}

impl DesignAsset {
    pub fn id(&self) -> HandleId {
        self.handle.id()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn format(&self) -> DesignFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the backing blob now.
    pub fn release(self) {
        self.handle.release();
    }
}

/// Offline validation pipeline for uploaded artwork.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileValidator {
    limits: ValidationLimits,
}

impl FileValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ValidationLimits {
        self.limits
    }

    /// Size gate, usable before the bytes are even read.
    pub fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size > self.limits.max_file_bytes {
            return Err(ValidationError::TooLarge {
                limit_mb: self.limits.max_file_mb(),
            });
        }
        Ok(())
    }

    /// Run the pipeline, short-circuiting on the first failure, and register the result.
    ///
    /// Order: size, declared type, content signature, SVG sanitizing, decode and dimensions.
    #[tracing::instrument(
        skip(self, file, registry),
        fields(name = %file.name, declared = %file.declared_type, size = file.bytes.len())
    )]
    pub fn validate(
        &self,
        file: &RawFile,
        registry: &HandleRegistry,
    ) -> Result<DesignAsset, ValidationError> {
        match self.prepare(file) {
            Ok(blob) => {
                let display_name = sanitize_display_name(&file.name);
                tracing::debug!(
                    format = ?blob.format,
                    width = blob.width,
                    height = blob.height,
                    "design accepted"
                );
                let (format, width, height) = (blob.format, blob.width, blob.height);
                Ok(DesignAsset {
                    handle: registry.create(blob),
                    display_name,
                    format,
                    width,
                    height,
                })
            }
            Err(err) => {
                tracing::info!(code = err.code(), "design rejected");
                Err(err)
            }
        }
    }

    fn prepare(&self, file: &RawFile) -> Result<DesignBlob, ValidationError> {
        self.check_size(file.size())?;

        let declared =
            declared_format(&file.declared_type).ok_or_else(|| ValidationError::UnsupportedType {
                declared_type: file.declared_type.clone(),
            })?;

        let format =
            detect_format(declared, &file.bytes).ok_or(ValidationError::ContentMismatch)?;

        let (bytes, (width, height)) = match format {
            DesignFormat::Svg => {
                let sanitized = sanitize_svg_bytes(&file.bytes).map_err(|err| {
                    tracing::debug!(%err, "svg sanitizer refused input");
                    ValidationError::MalformedSvg
                })?;
                if sanitized.report != SanitizeReport::default() {
                    tracing::info!(
                        removed_elements = sanitized.report.removed_elements,
                        removed_attributes = sanitized.report.removed_attributes,
                        "svg sanitized"
                    );
                }
                let bytes = sanitized.markup.into_bytes();
                let dims = decode::parse_svg(&bytes)
                    .and_then(|tree| decode::svg_pixel_size(&tree))
                    .map_err(decode_error)?;
                self.check_dimensions(dims)?;
                (bytes, dims)
            }
            raster => {
                let dims =
                    decode::probe_raster_dimensions(&file.bytes, raster).map_err(decode_error)?;
                self.check_dimensions(dims)?;
                decode::decode_raster(&file.bytes, raster).map_err(decode_error)?;
                (file.bytes.clone(), dims)
            }
        };

        Ok(DesignBlob {
            format,
            bytes: Arc::from(bytes),
            width,
            height,
        })
    }

    fn check_dimensions(&self, (width, height): (u32, u32)) -> Result<(), ValidationError> {
        if width == 0 || height == 0 {
            return Err(ValidationError::EmptyImage);
        }
        let limit = self.limits.max_dimension_px;
        if width > limit || height > limit {
            return Err(ValidationError::TooLargeDimensions { limit_px: limit });
        }
        Ok(())
    }
}

fn decode_error(err: DecodeError) -> ValidationError {
    match err {
        DecodeError::EmptySize => ValidationError::EmptyImage,
        other => {
            tracing::debug!(err = %other, "design decode failed");
            ValidationError::DecodeFailed
        }
    }
}

/// Make an uploaded file name safe to show: strip path separators and `: * ? " < > |`,
/// trim, and cap the length with a trailing `...`.
pub fn sanitize_display_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return DISPLAY_NAME_FALLBACK.to_string();
    }
    if stripped.chars().count() > MAX_DISPLAY_NAME_CHARS {
        let head: String = stripped.chars().take(MAX_DISPLAY_NAME_CHARS - 3).collect();
        format!("{head}...")
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/validate.rs"]
mod tests;
