//! Error types for the tsbench-quantile library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while building, running or persisting a predictor.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frequency token could not be parsed.
    #[error("invalid frequency '{0}'")]
    InvalidFrequency(String),

    /// The wrapped forecasting backend is not usable in this build.
    #[error("backend '{backend}' is not available: {hint}")]
    BackendUnavailable {
        backend: &'static str,
        hint: &'static str,
    },

    /// Filesystem failure, tagged with the offending path.
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted JSON document could not be encoded or decoded.
    #[error("malformed metadata in {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failure reported by the wrapped model.
    #[error("model error: {0}")]
    Model(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The same item key appeared twice in a dataset.
    #[error("duplicate item id '{0}'")]
    DuplicateItem(String),

    /// A forecast was asked for a key it does not carry.
    #[error("unknown forecast key '{0}'")]
    UnknownForecastKey(String),
}

impl AdapterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn metadata(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }
}
