/// Convenience result type used across glowdrift.
pub type GlowdriftResult<T> = Result<T, GlowdriftError>;

/// Top-level error taxonomy used by surface APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlowdriftError {
    /// Invalid configuration or construction input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while allocating or rasterizing an offscreen surface.
    #[error("raster error: {0}")]
    Raster(String),

    /// Errors while compositing or filtering a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlowdriftError {
    /// Build a [`GlowdriftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlowdriftError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`GlowdriftError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
