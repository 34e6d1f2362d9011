//! Geographic and projected coordinate types
//!
//! The two coordinate systems are kept in separate types so that a distance
//! can only ever be computed between points of the same (projected) system.

use geo::Point;

use crate::error::AccessError;

/// Northern/southern limit of the Web Mercator domain, in degrees
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// WGS84 longitude/latitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint(Point<f64>);

impl GeoPoint {
    /// Create a validated geographic point
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, AccessError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(AccessError::invalid_request(format!(
                "Coordinates must be finite, got: {longitude}, {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AccessError::invalid_request(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        if !(-MAX_MERCATOR_LATITUDE..=MAX_MERCATOR_LATITUDE).contains(&latitude) {
            return Err(AccessError::invalid_request(format!(
                "Latitude must be between -{MAX_MERCATOR_LATITUDE} and {MAX_MERCATOR_LATITUDE}, got: {latitude}"
            )));
        }

        Ok(Self(Point::new(longitude, latitude)))
    }

    /// Wrap a point that is already known to be inside the valid domain
    pub(crate) fn from_point_unchecked(point: Point<f64>) -> Self {
        Self(point)
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    /// `[lon, lat]`, the GeoJSON coordinate order
    #[must_use]
    pub fn coordinates(&self) -> [f64; 2] {
        [self.0.x(), self.0.y()]
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.6}, {:.6}", self.longitude(), self.latitude())
    }
}

/// Web Mercator (EPSG:3857) coordinates in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint(Point<f64>);

impl ProjectedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point::new(x, y))
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x()
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y()
    }

    /// Shift by a planar offset in meters
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self(self.0 + Point::new(dx, dy))
    }

    pub(crate) fn as_array(&self) -> [f64; 2] {
        [self.0.x(), self.0.y()]
    }

    pub(crate) fn point(&self) -> Point<f64> {
        self.0
    }
}
