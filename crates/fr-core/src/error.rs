//! Core error type.
//!
//! Sub-crates keep their own error enums and wrap `CoreError` through a
//! `From` impl where core values are validated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate ({lon}, {lat}) is not finite")]
    NonFiniteCoordinate { lon: f64, lat: f64 },

    #[error("coordinate precision of {0} decimals exceeds the f64 limit of 15")]
    InvalidPrecision(u8),
}

pub type CoreResult<T> = Result<T, CoreError>;
