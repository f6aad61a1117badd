//! Node identity by coordinate.
//!
//! Graph vertices are deduplicated by the value of their coordinate.  Float
//! equality is a poor hash key, so coordinates are first mapped to an integer
//! [`CoordKey`] under a [`CoordPrecision`]:
//!
//! - `Exact` keys on the IEEE-754 bit pattern.  Two vertices that differ only
//!   in the last decimal place are **distinct** nodes.
//! - `Decimals(n)` rounds both components to `n` decimal places first, so
//!   vertices within half a unit of the `n`th decimal share a node.
//!
//! `-0.0` and `0.0` always produce the same key.

use crate::{CoreError, CoreResult, GeoPoint};

/// Largest accepted `Decimals` value; beyond this `f64` has no digits left.
pub const MAX_DECIMALS: u8 = 15;

/// Hashable identity of a coordinate under some [`CoordPrecision`].
///
/// Keys produced under different precisions are not comparable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lon: u64,
    lat: u64,
}

/// Rule deciding when two coordinates denote the same node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CoordPrecision {
    /// Bitwise `f64` equality.
    #[default]
    Exact,
    /// Equality after rounding to this many decimal places.
    Decimals(u8),
}

impl CoordPrecision {
    /// Checked constructor for [`CoordPrecision::Decimals`].
    pub fn decimals(n: u8) -> CoreResult<Self> {
        let p = CoordPrecision::Decimals(n);
        p.validate()?;
        Ok(p)
    }

    pub fn validate(self) -> CoreResult<()> {
        match self {
            CoordPrecision::Decimals(n) if n > MAX_DECIMALS => {
                Err(CoreError::InvalidPrecision(n))
            }
            _ => Ok(()),
        }
    }

    /// Map a coordinate to its identity key.
    pub fn key(self, p: GeoPoint) -> CoordKey {
        match self {
            // `x + 0.0` folds -0.0 into 0.0 and leaves everything else alone.
            CoordPrecision::Exact => CoordKey {
                lon: (p.lon + 0.0).to_bits(),
                lat: (p.lat + 0.0).to_bits(),
            },
            CoordPrecision::Decimals(n) => {
                let scale = 10f64.powi(i32::from(n.min(MAX_DECIMALS)));
                CoordKey {
                    lon: quantize(p.lon, scale),
                    lat: quantize(p.lat, scale),
                }
            }
        }
    }

    /// `true` if `a` and `b` map to the same node under this rule.
    #[inline]
    pub fn same(self, a: GeoPoint, b: GeoPoint) -> bool {
        self.key(a) == self.key(b)
    }
}

#[inline]
fn quantize(v: f64, scale: f64) -> u64 {
    ((v * scale).round() as i64) as u64
}

impl std::fmt::Display for CoordPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordPrecision::Exact => f.write_str("exact"),
            CoordPrecision::Decimals(n) => write!(f, "{n} decimals"),
        }
    }
}
