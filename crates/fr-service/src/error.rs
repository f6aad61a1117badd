use std::path::PathBuf;

use fr_core::CoreError;
use fr_spatial::SpatialError;
use thiserror::Error;

/// Errors surfaced to the request layer.  `Display` is a single
/// human-readable reason.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Core(#[from] CoreError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
