use crate::{
    foundation::{core::Panel, error::StitchResult},
    render::{raster::RasterBuffer, texture::TextureHandle},
};

/// Static garment illustration shown when the 3D view cannot run.
pub const FALLBACK_ILLUSTRATION_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 220" width="200" height="220"><path d="M60 20 L85 10 Q100 30 115 10 L140 20 L185 55 L165 85 L145 72 L145 205 L55 205 L55 72 L35 85 L15 55 Z" fill="#e9ecef" stroke="#adb5bd" stroke-width="3" stroke-linejoin="round"/><path d="M85 10 Q100 30 115 10" fill="none" stroke="#adb5bd" stroke-width="3"/></svg>"##;

/// What the presenter gets to read each frame. It never mutates the texture.
#[derive(Clone, Copy, Debug)]
pub struct TextureFrame<'a> {
    pub texture: &'a TextureHandle,
    pub pixels: &'a RasterBuffer,
    pub active_view: Panel,
}

/// The 3D view collaborator: loads its model once, then shows the texture on demand.
pub trait ViewPresenter {
    /// Load the model asset. `Ok` means the model is ready to show.
    fn load_model(&mut self) -> StitchResult<()>;

    /// Upload/show `frame`. Called only when the texture version or active view moved.
    fn present(&mut self, frame: &TextureFrame<'_>) -> StitchResult<()>;
}

impl<P: ViewPresenter + ?Sized> ViewPresenter for Box<P> {
    fn load_model(&mut self) -> StitchResult<()> {
        (**self).load_model()
    }

    fn present(&mut self, frame: &TextureFrame<'_>) -> StitchResult<()> {
        (**self).present(frame)
    }
}

/// One-shot latch for the model-ready callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelReady {
    fired: bool,
}

impl ModelReady {
    /// Returns true the first time only.
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationPhase {
    Loading,
    Live,
    Fallback { message: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Not live (still loading, or in fallback).
    Skipped,
    /// Texture version and view already shown.
    Unchanged,
    Presented,
    /// The presenter failed; the boundary is now in fallback.
    Failed,
}

/// Catches every presenter failure and degrades to the fallback illustration.
#[derive(Debug)]
pub struct PresentationBoundary<P> {
    presenter: P,
    phase: PresentationPhase,
    model_ready: ModelReady,
    shown: Option<(u64, Panel)>,
}

impl<P: ViewPresenter> PresentationBoundary<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            phase: PresentationPhase::Loading,
            model_ready: ModelReady::default(),
            shown: None,
        }
    }

    pub fn phase(&self) -> &PresentationPhase {
        &self.phase
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Try to load the model while loading. Returns true exactly once per boundary: the first
    /// time the model becomes ready.
    pub fn poll_model(&mut self) -> bool {
        if self.phase != PresentationPhase::Loading {
            return false;
        }
        match self.presenter.load_model() {
            Ok(()) => {
                self.phase = PresentationPhase::Live;
                let first = self.model_ready.fire();
                if first {
                    tracing::info!("model ready");
                }
                first
            }
            Err(err) => {
                self.enter_fallback(err.to_string());
                false
            }
        }
    }

    /// Show `frame` if live and something changed since the last successful present.
    pub fn present(&mut self, frame: &TextureFrame<'_>) -> PresentOutcome {
        if self.phase != PresentationPhase::Live {
            return PresentOutcome::Skipped;
        }
        if frame.texture.version() == 0 || frame.texture.is_released() {
            return PresentOutcome::Skipped;
        }
        let seen = self
            .shown
            .filter(|(_, view)| *view == frame.active_view)
            .map(|(version, _)| version);
        if !frame.texture.needs_update(seen) {
            return PresentOutcome::Unchanged;
        }
        match self.presenter.present(frame) {
            Ok(()) => {
                self.shown = Some((frame.texture.version(), frame.active_view));
                PresentOutcome::Presented
            }
            Err(err) => {
                self.enter_fallback(err.to_string());
                PresentOutcome::Failed
            }
        }
    }

    /// Leave fallback and try the model again on the next poll.
    pub fn retry(&mut self) {
        if matches!(self.phase, PresentationPhase::Fallback { .. }) {
            tracing::info!("retrying 3D view");
            self.phase = PresentationPhase::Loading;
            self.shown = None;
        }
    }

    /// The illustration to draw instead of the 3D view, while in fallback.
    pub fn fallback_illustration(&self) -> Option<&'static str> {
        match self.phase {
            PresentationPhase::Fallback { .. } => Some(FALLBACK_ILLUSTRATION_SVG),
            _ => None,
        }
    }

    pub fn model_ready(&self) -> bool {
        self.model_ready.has_fired()
    }

    fn enter_fallback(&mut self, message: String) {
        tracing::warn!(error = %message, "3D view failed; showing fallback illustration");
        self.phase = PresentationPhase::Fallback { message };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/presentation.rs"]
mod tests;
