//! GeoJSON reading and structural checks.
//!
//! Only the outer shape is validated: the document must be a
//! `FeatureCollection`.  Individual features with unsupported or missing
//! geometry are the builders' concern (they are skipped, not rejected).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use log::debug;

use crate::{SpatialError, SpatialResult};

/// Parse GeoJSON text.  Any JSON or GeoJSON syntax error is reported as
/// [`SpatialError::MalformedInput`].
pub fn parse_geojson(text: &str) -> SpatialResult<GeoJson> {
    text.parse::<GeoJson>()
        .map_err(|e| SpatialError::MalformedInput(e.to_string()))
}

/// Read and parse a GeoJSON file.
///
/// # Errors
///
/// [`SpatialError::MissingSource`] if the file does not exist,
/// [`SpatialError::Io`] for other read failures, and
/// [`SpatialError::MalformedInput`] if the content does not parse.
pub fn read_geojson(path: &Path) -> SpatialResult<GeoJson> {
    debug!("reading GeoJSON from {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SpatialError::MissingSource(path.to_path_buf()),
        _ => SpatialError::Io(e),
    })?;
    parse_geojson(&text)
}

/// Borrow the feature collection inside `input`, or fail with
/// [`SpatialError::MalformedInput`].
pub(crate) fn feature_collection<'a>(
    input: &'a GeoJson,
    what: &str,
) -> SpatialResult<&'a FeatureCollection> {
    match input {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) => Err(SpatialError::MalformedInput(format!(
            "{what} input is a single Feature, expected a FeatureCollection"
        ))),
        GeoJson::Geometry(_) => Err(SpatialError::MalformedInput(format!(
            "{what} input is a bare Geometry, expected a FeatureCollection"
        ))),
    }
}

/// Convert a GeoJSON geometry to its `geo` equivalent.  `None` when the
/// conversion is not representable.
pub(crate) fn to_geo(geometry: &geojson::Geometry) -> Option<geo::Geometry<f64>> {
    geo::Geometry::<f64>::try_from(geometry.value.clone()).ok()
}

/// Geometry type name, for log messages.
pub(crate) fn type_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
