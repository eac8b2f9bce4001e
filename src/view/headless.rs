use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Panel,
        error::{StitchError, StitchResult},
    },
    view::presentation::{TextureFrame, ViewPresenter},
};

/// Presenter without a GPU: every presented texture version is written to a PNG file.
#[derive(Debug)]
pub struct PngSnapshotPresenter {
    out_path: PathBuf,
    writes: u32,
    last_view: Option<Panel>,
}

impl PngSnapshotPresenter {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            writes: 0,
            last_view: None,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }

    pub fn last_view(&self) -> Option<Panel> {
        self.last_view
    }
}

pub fn ensure_parent_dir(path: &Path) -> StitchResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

impl ViewPresenter for PngSnapshotPresenter {
    fn load_model(&mut self) -> StitchResult<()> {
        ensure_parent_dir(&self.out_path)
    }

    fn present(&mut self, frame: &TextureFrame<'_>) -> StitchResult<()> {
        let img = frame.pixels.to_rgba_image()?;
        img.save_with_format(&self.out_path, image::ImageFormat::Png)
            .map_err(|e| {
                StitchError::presentation(format!(
                    "write texture snapshot '{}': {e}",
                    self.out_path.display()
                ))
            })?;
        self.writes += 1;
        self.last_view = Some(frame.active_view);
        tracing::debug!(
            path = %self.out_path.display(),
            version = frame.texture.version(),
            view = %frame.active_view,
            "texture snapshot written"
        );
        Ok(())
    }
}
