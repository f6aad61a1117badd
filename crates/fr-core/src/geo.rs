//! Geographic coordinate type and distance helpers.
//!
//! `GeoPoint` is stored as `f64` longitude/latitude: coordinates double as
//! node identity, so no precision may be lost between the input file and the
//! graph.  Arguments follow GeoJSON order (`lon`, then `lat`).

use crate::{CoreError, CoreResult};

/// A longitude/latitude pair in a consistent geographic reference frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Like [`new`](Self::new) but rejects NaN and infinities.
    pub fn try_new(lon: f64, lat: f64) -> CoreResult<Self> {
        if lon.is_finite() && lat.is_finite() {
            Ok(Self { lon, lat })
        } else {
            Err(CoreError::NonFiniteCoordinate { lon, lat })
        }
    }

    /// Squared planar distance in degree space.
    #[inline]
    pub fn planar_distance_2(self, other: GeoPoint) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        dx * dx + dy * dy
    }

    /// Planar Euclidean distance in coordinate units (degrees).
    ///
    /// This is the edge length convention of the road graph: no geodesic
    /// correction is applied.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }

    /// Haversine great-circle distance in metres.
    pub fn haversine_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * R * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl From<GeoPoint> for ::geo::Coord<f64> {
    #[inline]
    fn from(p: GeoPoint) -> Self {
        ::geo::Coord { x: p.lon, y: p.lat }
    }
}

impl From<::geo::Coord<f64>> for GeoPoint {
    #[inline]
    fn from(c: ::geo::Coord<f64>) -> Self {
        GeoPoint { lon: c.x, lat: c.y }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}
