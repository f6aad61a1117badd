//! Spatial-subsystem error type.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use fr_core::{CoreError, NodeId};

/// Errors produced by `fr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Source data is not a recognised feature-collection shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Well-formed input that yields zero usable geometries.  Non-fatal:
    /// callers fall back to an empty graph.
    #[error("no usable {what} geometry in input")]
    EmptyInput { what: &'static str },

    #[error("cannot route on a graph with no nodes")]
    EmptyGraph,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("source file {} is unavailable", .0.display())]
    MissingSource(PathBuf),

    #[error("hazard penalty factor must be finite and >= 1, got {0}")]
    InvalidPenalty(f64),

    #[error("invalid query coordinate: {0}")]
    InvalidCoordinate(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

/// Stable, payload-free name of a [`SpatialError`] variant, for logs and
/// fallback bookkeeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    MalformedInput,
    EmptyInput,
    EmptyGraph,
    NoPath,
    MissingSource,
    InvalidPenalty,
    InvalidCoordinate,
    Io,
}

impl SpatialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpatialError::MalformedInput(_) => ErrorKind::MalformedInput,
            SpatialError::EmptyInput { .. } => ErrorKind::EmptyInput,
            SpatialError::EmptyGraph => ErrorKind::EmptyGraph,
            SpatialError::NoPath { .. } => ErrorKind::NoPath,
            SpatialError::MissingSource(_) => ErrorKind::MissingSource,
            SpatialError::InvalidPenalty(_) => ErrorKind::InvalidPenalty,
            SpatialError::InvalidCoordinate(_) => ErrorKind::InvalidCoordinate,
            SpatialError::Io(_) => ErrorKind::Io,
        }
    }

    /// `false` only for [`SpatialError::EmptyInput`], which still describes a
    /// valid (empty) result.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SpatialError::EmptyInput { .. })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::EmptyGraph => "EmptyGraph",
            ErrorKind::NoPath => "NoPath",
            ErrorKind::MissingSource => "MissingSource",
            ErrorKind::InvalidPenalty => "InvalidPenalty",
            ErrorKind::InvalidCoordinate => "InvalidCoordinate",
            ErrorKind::Io => "Io",
        };
        f.write_str(name)
    }
}
