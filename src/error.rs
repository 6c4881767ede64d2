use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring, fitting or persisting a clustering.
#[derive(Debug, Error)]
pub enum KMeansError {
    #[error("unknown initialization method `{0}` (expected `random` or `kmeans++`)")]
    UnknownInitMethod(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("centroids are not available before fit has run")]
    NotFitted,

    #[error("malformed dump {path:?}: {len} bytes")]
    MalformedDump { path: PathBuf, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, KMeansError>;
