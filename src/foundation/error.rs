use crate::assets::validate::ValidationError;

/// Convenience result type used across stitchview.
pub type StitchResult<T> = Result<T, StitchError>;

/// Top-level error taxonomy used by library APIs.
///
/// File-intake failures keep their own typed [`ValidationError`] so callers can show the
/// user-facing message; everything else is either a configuration problem, a render problem,
/// or a wrapped lower-level error.
#[derive(thiserror::Error, Debug)]
pub enum StitchError {
    /// Invalid geometry profile, limits, or other configuration data.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while compositing into the texture buffer.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by the view presentation layer.
    #[error("presentation error: {0}")]
    Presentation(String),

    /// A design file was rejected by the validator.
    #[error(transparent)]
    Upload(#[from] ValidationError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StitchError {
    /// Build a [`StitchError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StitchError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StitchError::Presentation`] value.
    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
