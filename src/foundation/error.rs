/// Convenience result type used across rigport.
pub type RigportResult<T> = Result<T, RigportError>;

/// Top-level error taxonomy used by crate APIs.
///
/// Domain conditions encountered *inside* a pipeline run (missing optional
/// property, absent third-party component, no matches found) are reported as
/// notifications, never as errors; this type covers misuse of the crate
/// boundary itself.
#[derive(thiserror::Error, Debug)]
pub enum RigportError {
    /// Invalid caller-provided scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures while assembling exporter artifacts.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigportError {
    /// Build a [`RigportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RigportError::Conversion`] value.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
