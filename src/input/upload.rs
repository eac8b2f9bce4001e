use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::{
        handle::HandleRegistry,
        validate::{FileValidator, RawFile, ValidationError},
    },
    config::limits::{MIME_JPEG, MIME_PNG, MIME_SVG},
    foundation::error::StitchResult,
    state::store::DesignerStore,
};

/// Media type a browser would report for `path`, from its extension. Unknown → empty.
pub fn declared_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => MIME_PNG,
        "jpg" | "jpeg" => MIME_JPEG,
        "svg" => MIME_SVG,
        _ => "",
    }
}

/// Read a file from disk as an untrusted upload. The size limit is checked against the file
/// metadata before any bytes are read.
pub fn read_raw_file(path: &Path, validator: &FileValidator) -> StitchResult<RawFile> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("stat design file '{}'", path.display()))?
        .len();
    validator.check_size(len)?;

    let bytes =
        std::fs::read(path).with_context(|| format!("read design file '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RawFile::new(name, declared_type_for_path(path), bytes))
}

/// Upload control: validates a picked or dropped file and installs it in the store.
#[derive(Debug, Default)]
pub struct DesignUploader {
    validator: FileValidator,
    processing: bool,
    last_error: Option<ValidationError>,
}

impl DesignUploader {
    pub fn new(validator: FileValidator) -> Self {
        Self {
            validator,
            processing: false,
            last_error: None,
        }
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Message of the last rejected file, cleared by the next attempt or by `clear`.
    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    /// Validate `file`; on success hand the asset to the store, which releases any previous one.
    pub fn handle_file(
        &mut self,
        file: RawFile,
        registry: &HandleRegistry,
        store: &mut DesignerStore,
    ) -> Result<(), ValidationError> {
        self.processing = true;
        self.last_error = None;
        let result = self.validator.validate(&file, registry);
        self.processing = false;

        match result {
            Ok(asset) => {
                store.set_design(asset);
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Drag-and-drop: only the first file counts. An empty drop does nothing.
    pub fn handle_drop(
        &mut self,
        files: Vec<RawFile>,
        registry: &HandleRegistry,
        store: &mut DesignerStore,
    ) -> Option<Result<(), ValidationError>> {
        let count = files.len();
        let first = files.into_iter().next()?;
        if count > 1 {
            tracing::debug!(ignored = count - 1, "extra dropped files ignored");
        }
        Some(self.handle_file(first, registry, store))
    }

    /// Remove the design and any error message.
    pub fn clear(&mut self, store: &mut DesignerStore) {
        self.last_error = None;
        store.clear_design();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/upload.rs"]
mod tests;
