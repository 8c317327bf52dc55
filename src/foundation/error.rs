/// Convenience result type used across paintbox.
pub type PaintboxResult<T> = Result<T, PaintboxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Out-of-range *settings* are not an error here: the settings owner clamps
/// them before they reach the pipeline. `Validation` covers structural misuse
/// (mismatched frame sizes, unbound uniforms, same-slot blits) and `Resource`
/// covers buffer allocation failure, which is fatal for the current frame.
#[derive(thiserror::Error, Debug)]
pub enum PaintboxError {
    /// Invalid input or structural misuse of the pipeline.
    #[error("validation error: {0}")]
    Validation(String),

    /// Buffer (re)allocation failure at the current resolution.
    #[error("resource error: {0}")]
    Resource(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaintboxError {
    /// Build a [`PaintboxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PaintboxError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}
