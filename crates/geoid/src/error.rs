//! Error types for geoid grid loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating, parsing or loading a geoid grid.
///
/// Height queries never produce these: invalid coordinates yield NaN.
#[derive(Error, Debug)]
pub enum GeoidError {
    /// The named grid resource could not be found.
    #[error("geoid resource '{name}' is not available at {}", path.display())]
    ResourceUnavailable { name: String, path: PathBuf },

    /// The resource is not a valid 16-bit PGM geoid grid.
    #[error("invalid geoid grid in resource '{resource}': {reason}")]
    Format { resource: String, reason: String },

    /// The sample payload ended before `width * height` values were read.
    #[error("truncated geoid grid in resource '{resource}': expected {expected} samples, found {found}")]
    TruncatedData {
        resource: String,
        expected: usize,
        found: usize,
    },

    /// Underlying I/O failure while reading the resource.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GeoidError {
    /// Create a ResourceUnavailable error.
    pub fn resource_unavailable(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ResourceUnavailable {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a Format error.
    pub fn format(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create a TruncatedData error.
    pub fn truncated(resource: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::TruncatedData {
            resource: resource.into(),
            expected,
            found,
        }
    }
}

/// Result type for geoid operations.
pub type Result<T> = std::result::Result<T, GeoidError>;
