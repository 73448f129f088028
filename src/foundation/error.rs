/// Convenience result type used across meshcam.
pub type MeshcamResult<T> = Result<T, MeshcamError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-frame degenerate input (buffer not ready, too few seeds, a lost
/// track) is handled by graceful degradation inside the pipeline and never
/// surfaces here. These variants cover genuine API misuse and I/O.
#[derive(thiserror::Error, Debug)]
pub enum MeshcamError {
    /// Invalid user-provided parameters or palette data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or inconsistent frame/buffer data.
    #[error("frame error: {0}")]
    Frame(String),

    /// Errors raised while driving the per-frame pipeline.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MeshcamError {
    /// Build a [`MeshcamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MeshcamError::Frame`] value.
    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame(msg.into())
    }

    /// Build a [`MeshcamError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Build a [`MeshcamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
