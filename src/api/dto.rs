//! Response bodies

use serde::{Deserialize, Serialize};

use crate::dataset::DataSnapshot;
use crate::error::AccessError;
use crate::geometry::Nearest;
use crate::models::{AccessibilityResult, Facility, PathSegment, SegmentKind, Status};

/// `/predict` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: Status,
    pub distances: ApiDistances,
    pub paths: Vec<ApiPath>,
}

/// Distances in meters, `null` when not computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDistances {
    pub direct: Option<f64>,
    pub to_stop: Option<f64>,
    pub via_stop: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPath {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub to: ApiTarget,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTarget {
    pub global_id: i64,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

impl From<&PathSegment> for ApiPath {
    fn from(segment: &PathSegment) -> Self {
        Self {
            kind: segment.kind,
            to: ApiTarget {
                global_id: segment.target_id,
                coordinates: segment.target.coordinates(),
            },
            distance_m: segment.distance_m,
        }
    }
}

impl TryFrom<&AccessibilityResult> for PredictResponse {
    type Error = AccessError;

    /// Fails with an invariant violation instead of emitting a malformed body
    fn try_from(result: &AccessibilityResult) -> Result<Self, Self::Error> {
        result.validate()?;

        Ok(Self {
            status: result.status(),
            distances: ApiDistances {
                direct: result.distances.direct,
                to_stop: result.distances.to_stop,
                via_stop: result.distances.via_stop,
            },
            paths: result.paths().into_iter().map(ApiPath::from).collect(),
        })
    }
}

/// Sports facility as listed for the map client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFacility {
    pub global_id: i64,
    pub coordinates: [f64; 2],
}

impl From<&Facility> for ApiFacility {
    fn from(facility: &Facility) -> Self {
        Self {
            global_id: facility.global_id,
            coordinates: facility.location.coordinates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestFacilityResponse {
    pub global_id: i64,
    pub coordinates: [f64; 2],
    pub distance_m: f64,
}

impl From<&Nearest> for NearestFacilityResponse {
    fn from(nearest: &Nearest) -> Self {
        Self {
            global_id: nearest.global_id,
            coordinates: nearest.location.coordinates(),
            distance_m: nearest.distance_m,
        }
    }
}

/// Liveness plus the size of the loaded snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sports: usize,
    pub medical: usize,
    pub stops: usize,
}

impl HealthResponse {
    #[must_use]
    pub fn from_snapshot(snapshot: &DataSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            sports: snapshot.sports_count(),
            medical: snapshot.medical().len(),
            stops: snapshot.stops().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Accessibility, Distances, GeoPoint};
    use serde_json::json;

    #[test]
    fn test_yellow_response_shape() {
        let target = GeoPoint::new(37.6, 55.75).unwrap();
        let result = AccessibilityResult {
            accessibility: Accessibility::Yellow {
                stop: PathSegment::new(SegmentKind::Stop, 10, target, 300.0),
                stop_to_med: PathSegment::new(SegmentKind::StopToMed, 2, target, 400.0),
            },
            distances: Distances {
                direct: Some(700.0),
                to_stop: Some(300.0),
                via_stop: Some(400.0),
            },
        };

        let body = serde_json::to_value(PredictResponse::try_from(&result).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "yellow",
                "distances": { "direct": 700.0, "to_stop": 300.0, "via_stop": 400.0 },
                "paths": [
                    { "type": "stop", "to": { "global_id": 10, "coordinates": [37.6, 55.75] }, "distance_m": 300.0 },
                    { "type": "stop_to_med", "to": { "global_id": 2, "coordinates": [37.6, 55.75] }, "distance_m": 400.0 }
                ]
            })
        );
    }

    #[test]
    fn test_uncomputed_distances_are_null() {
        let result = AccessibilityResult {
            accessibility: Accessibility::Red,
            distances: Distances {
                direct: Some(900.0),
                ..Distances::default()
            },
        };

        let body = serde_json::to_value(PredictResponse::try_from(&result).unwrap()).unwrap();
        assert_eq!(body["status"], "red");
        assert!(body["distances"]["to_stop"].is_null());
        assert!(body["distances"]["via_stop"].is_null());
        assert_eq!(body["paths"], json!([]));
    }

    #[test]
    fn test_invalid_result_is_not_serialized() {
        let result = AccessibilityResult {
            accessibility: Accessibility::Red,
            distances: Distances {
                direct: Some(-1.0),
                ..Distances::default()
            },
        };

        assert!(matches!(
            PredictResponse::try_from(&result),
            Err(AccessError::InvariantViolation { .. })
        ));
    }
}
