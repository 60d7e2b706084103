//! Error types for channel descriptors and packing templates.

use std::path::PathBuf;

use thiserror::Error;

/// A channel default value outside the normalized `[0.0, 1.0]` range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("default value must be between 0.0 and 1.0, got {value}")]
pub struct InvalidDefaultError {
    /// The rejected value.
    pub value: f64,
}

/// Errors raised while building, loading, or saving a packing template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template definition is malformed or violates a template invariant.
    #[error("invalid template: {0}")]
    Validation(String),

    /// The template file does not exist.
    #[error("template file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A plane key other than R, G, B, or A was requested.
    #[error("invalid plane key '{0}', expected one of R, G, B, A")]
    InvalidPlaneKey(String),

    /// Reading or writing a template file failed.
    #[error("failed to access template file {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a template to JSON failed.
    #[error("failed to serialize template: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateError {
    /// Returns true for the "template definition is invalid" error kind.
    pub fn is_validation(&self) -> bool {
        matches!(self, TemplateError::Validation(_))
    }
}
