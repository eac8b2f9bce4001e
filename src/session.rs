use std::path::Path;

use crate::{
    assets::{
        handle::HandleRegistry,
        validate::{FileValidator, RawFile, ValidationError},
    },
    config::{
        geometry::GeometryProfile,
        limits::ValidationLimits,
        palette::{ColorPreset, preset_by_label},
    },
    foundation::{
        core::{ColorValue, Panel},
        error::{StitchError, StitchResult},
    },
    input::{
        color::ColorInput,
        upload::{DesignUploader, read_raw_file},
    },
    lifecycle::{
        controller::{FrameReport, TextureController},
        scheduler::SchedulerStats,
    },
    render::{composite::Compositor, raster::RasterBuffer, texture::TextureHandle},
    state::store::{DesignerState, DesignerStore, SubscriptionId},
    view::presentation::{PresentOutcome, PresentationBoundary, TextureFrame, ViewPresenter},
};

/// Everything a session can be configured with.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionConfig {
    #[serde(default = "GeometryProfile::placeholder")]
    pub profile: GeometryProfile,
    #[serde(default)]
    pub limits: ValidationLimits,
}

/// What one [`DesignerSession::tick`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub model_ready: bool,
    pub frame: FrameReport,
    pub presented: PresentOutcome,
}

/// The one process-wide designer handle.
///
/// Owns the store, the design handle registry, the texture controller and the view boundary,
/// and wires them together: user actions mutate the store, the store notifies the controller,
/// and each [`tick`](Self::tick) runs at most one composite pass and presents the result.
/// [`end`](Self::end) (or drop) tears everything down and releases the design.
pub struct DesignerSession<P: ViewPresenter> {
    config: SessionConfig,
    registry: HandleRegistry,
    store: DesignerStore,
    controller: TextureController,
    view: PresentationBoundary<P>,
    color_input: ColorInput,
    uploader: DesignUploader,
    subscription: Option<SubscriptionId>,
}

impl<P: ViewPresenter> DesignerSession<P> {
    #[tracing::instrument(skip_all, fields(profile = %config.profile.name))]
    pub fn start(config: SessionConfig, presenter: P) -> StitchResult<Self> {
        config.profile.validate()?;
        if config.limits.max_file_bytes == 0 || config.limits.max_dimension_px == 0 {
            return Err(StitchError::config("validation limits must be non-zero"));
        }

        let mut store = DesignerStore::new();
        let mut controller = TextureController::new(Compositor::new(config.profile.clone()));
        let subscription = store.subscribe(controller.observer());
        controller.mount(store.state().composite_inputs())?;
        tracing::info!("designer session started");

        Ok(Self {
            uploader: DesignUploader::new(FileValidator::new(config.limits)),
            config,
            registry: HandleRegistry::new(),
            store,
            controller,
            view: PresentationBoundary::new(presenter),
            color_input: ColorInput::new(),
            subscription: Some(subscription),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &DesignerState {
        self.store.state()
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &TextureController {
        &self.controller
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.controller.texture()
    }

    pub fn buffer(&self) -> Option<&RasterBuffer> {
        self.controller.buffer()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.controller.stats()
    }

    pub fn view(&self) -> &PresentationBoundary<P> {
        &self.view
    }

    pub fn color_input(&self) -> &ColorInput {
        &self.color_input
    }

    pub fn uploader(&self) -> &DesignUploader {
        &self.uploader
    }

    pub fn set_base_color(&mut self, color: ColorValue) {
        self.store.set_base_color(color);
    }

    pub fn select_preset(&mut self, preset: &ColorPreset) {
        self.color_input.select_preset(preset, &mut self.store);
    }

    pub fn select_preset_by_label(&mut self, label: &str) -> StitchResult<()> {
        let preset = preset_by_label(label)
            .ok_or_else(|| StitchError::config(format!("unknown colour preset '{label}'")))?;
        self.select_preset(preset);
        Ok(())
    }

    pub fn enter_color_text(&mut self, raw: &str) -> Option<ColorValue> {
        self.color_input.enter_text(raw, &mut self.store)
    }

    pub fn set_view(&mut self, view: Panel) {
        self.store.set_active_view(view);
    }

    pub fn upload(&mut self, file: RawFile) -> Result<(), ValidationError> {
        self.uploader
            .handle_file(file, &self.registry, &mut self.store)
    }

    pub fn upload_path(&mut self, path: &Path) -> StitchResult<()> {
        let file = read_raw_file(path, self.uploader.validator())?;
        self.upload(file)?;
        Ok(())
    }

    pub fn drop_files(&mut self, files: Vec<RawFile>) -> Option<Result<(), ValidationError>> {
        self.uploader
            .handle_drop(files, &self.registry, &mut self.store)
    }

    pub fn clear_design(&mut self) {
        self.uploader.clear(&mut self.store);
    }

    pub fn retry_view(&mut self) {
        self.view.retry();
    }

    /// One scheduling point: poll the model, run the pending pass, present.
    pub fn tick(&mut self) -> TickReport {
        let model_ready = self.view.poll_model();
        if model_ready {
            self.store.set_loading(false);
        }

        let frame = self.controller.run_frame(&self.registry);

        let presented = match (self.controller.texture(), self.controller.buffer()) {
            (Some(texture), Some(pixels)) => self.view.present(&TextureFrame {
                texture,
                pixels,
                active_view: self.store.state().active_view,
            }),
            _ => PresentOutcome::Skipped,
        };

        TickReport {
            model_ready,
            frame,
            presented,
        }
    }

    /// Tick until no pass is pending.
    pub fn settle(&mut self) -> TickReport {
        let mut report = self.tick();
        while self.controller.scheduler().has_pending() {
            report = self.tick();
        }
        report
    }

    /// Tear down: cancel outstanding passes, release the texture and the design.
    pub fn end(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.unsubscribe(id);
            self.controller.teardown();
            self.store.clear_design();
            tracing::info!(
                live_handles = self.registry.live_count(),
                "designer session ended"
            );
        }
    }
}

impl<P: ViewPresenter> Drop for DesignerSession<P> {
    fn drop(&mut self) {
        self.end();
    }
}

impl<P: ViewPresenter> std::fmt::Debug for DesignerSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerSession")
            .field("profile", &self.config.profile.name)
            .field("state", self.store.state())
            .field("controller", &self.controller.state())
            .field("view", self.view.phase())
            .finish()
    }
}
