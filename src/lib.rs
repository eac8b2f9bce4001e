//! Stitchview is an on-device garment design pipeline.
//!
//! A user picks a base colour and drops in artwork; the crate validates and sanitizes the file,
//! composites colour and artwork onto the UV panels of a shared square texture, and keeps the
//! texture in step with the designer state under rapid, overlapping updates.
//!
//! - Validate untrusted uploads with [`FileValidator`]
//! - Start a [`DesignerSession`] with a [`ViewPresenter`]
//! - Mutate state through the session and [`tick`](DesignerSession::tick) to composite and present
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod lifecycle;
pub mod render;
pub mod session;
pub mod state;
pub mod view;

pub use crate::assets::handle::{DesignSource, HandleId, HandleRegistry};
pub use crate::assets::validate::{DesignAsset, FileValidator, RawFile, ValidationError};
pub use crate::config::geometry::{GeometryProfile, TEXTURE_SIZE};
pub use crate::config::limits::ValidationLimits;
pub use crate::config::palette::{COLOR_PRESETS, ColorPreset};
pub use crate::foundation::core::{ColorValue, Panel, Rgba8Premul};
pub use crate::foundation::error::{StitchError, StitchResult};
pub use crate::lifecycle::controller::{FrameReport, TextureController};
pub use crate::render::composite::{CompositeInputs, Compositor, DesignLayer};
pub use crate::render::raster::{BufferFingerprint, RasterBuffer};
pub use crate::session::{DesignerSession, SessionConfig, TickReport};
pub use crate::state::store::{DesignerState, DesignerStore, StateChange};
pub use crate::view::headless::PngSnapshotPresenter;
pub use crate::view::presentation::{PresentationBoundary, TextureFrame, ViewPresenter};
