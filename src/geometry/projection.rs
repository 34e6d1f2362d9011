//! Web Mercator (EPSG:3857) projection and the planar distance primitive.

use std::f64::consts::FRAC_PI_4;

use geo::Point;

use super::error::{GeometryError, Result};
use crate::models::{GeoPoint, ProjectedPoint};

/// Semi-major axis of the WGS84 ellipsoid, used as the sphere radius by Web Mercator
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Project a geographic point into Web Mercator meters
#[must_use]
pub fn to_projected(point: &GeoPoint) -> ProjectedPoint {
    let x = EARTH_RADIUS_M * point.longitude().to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + point.latitude().to_radians() / 2.0).tan().ln();
    ProjectedPoint::new(x, y)
}

/// Inverse of [`to_projected`]
#[must_use]
pub fn to_geographic(point: &ProjectedPoint) -> GeoPoint {
    let longitude = (point.x() / EARTH_RADIUS_M).to_degrees();
    let latitude = (2.0 * (point.y() / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    GeoPoint::from_point_unchecked(Point::new(longitude, latitude))
}

/// Squared planar distance; used for ordering candidates
#[must_use]
pub fn planar_distance_squared(a: &ProjectedPoint, b: &ProjectedPoint) -> f64 {
    let delta = a.point() - b.point();
    delta.x() * delta.x() + delta.y() * delta.y()
}

/// Planar distance in meters between two projected points
pub fn planar_distance(a: &ProjectedPoint, b: &ProjectedPoint) -> Result<f64> {
    let distance = planar_distance_squared(a, b).sqrt();
    if !distance.is_finite() || distance < 0.0 {
        return Err(GeometryError::InvariantViolation {
            message: format!(
                "distance between ({}, {}) and ({}, {}) is {distance}",
                a.x(),
                a.y(),
                b.x(),
                b.y()
            ),
        });
    }
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_origin_projects_to_zero() {
        let p = to_projected(&GeoPoint::new(0.0, 0.0).unwrap());
        assert_abs_diff_eq!(p.x(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_known_projection() {
        // EPSG:3857 coordinates of (37.6, 55.75)
        let p = to_projected(&GeoPoint::new(37.6, 55.75).unwrap());
        assert_abs_diff_eq!(p.x(), 4_185_612.854, epsilon = 0.01);
        assert_abs_diff_eq!(p.y(), 7_508_807.851, epsilon = 0.01);
    }

    #[rstest]
    #[case(37.6, 55.75)]
    #[case(-122.42, 37.77)]
    #[case(151.21, -33.87)]
    #[case(0.0, 85.0)]
    fn test_projection_round_trip(#[case] lon: f64, #[case] lat: f64) {
        let original = GeoPoint::new(lon, lat).unwrap();
        let back = to_geographic(&to_projected(&original));
        assert_abs_diff_eq!(back.longitude(), lon, epsilon = 1e-9);
        assert_abs_diff_eq!(back.latitude(), lat, epsilon = 1e-9);
    }

    #[test]
    fn test_planar_distance() {
        let a = ProjectedPoint::new(0.0, 0.0);
        let b = ProjectedPoint::new(300.0, 400.0);
        assert_eq!(planar_distance(&a, &b).unwrap(), 500.0);
        assert_eq!(planar_distance(&b, &a).unwrap(), 500.0);
        assert_eq!(planar_distance_squared(&a, &b), 250_000.0);
    }

    #[test]
    fn test_planar_distance_rejects_nan() {
        let a = ProjectedPoint::new(f64::NAN, 0.0);
        let b = ProjectedPoint::new(0.0, 0.0);
        assert!(matches!(
            planar_distance(&a, &b),
            Err(GeometryError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_planar_distance_rejects_infinite() {
        let a = ProjectedPoint::new(f64::INFINITY, 0.0);
        let b = ProjectedPoint::new(0.0, 0.0);
        assert!(planar_distance(&a, &b).is_err());
    }
}
