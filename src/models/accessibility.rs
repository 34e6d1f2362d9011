//! Accessibility classification results

use serde::{Deserialize, Serialize};

use super::point::GeoPoint;
use crate::error::AccessError;

/// Traffic-light accessibility tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A medical facility is within walking distance
    Green,
    /// A medical facility is reachable via one transit stop
    Yellow,
    /// Neither connection meets its thresholds
    Red,
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Yellow => "yellow",
            Status::Red => "red",
        }
    }
}

/// Kind of a single hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Sports facility to medical facility
    Direct,
    /// Sports facility to transit stop
    Stop,
    /// Transit stop to medical facility
    StopToMed,
}

/// One hop of a qualifying connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    /// `global_id` of the medical facility or stop this hop ends at
    pub target_id: i64,
    pub target: GeoPoint,
    pub distance_m: f64,
}

impl PathSegment {
    #[must_use]
    pub fn new(kind: SegmentKind, target_id: i64, target: GeoPoint, distance_m: f64) -> Self {
        Self {
            kind,
            target_id,
            target,
            distance_m,
        }
    }
}

/// Distances computed for one facility, `None` when not computed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Distances {
    /// Sports facility to nearest medical facility
    pub direct: Option<f64>,
    /// Sports facility to nearest transit stop
    pub to_stop: Option<f64>,
    /// That stop to its nearest medical facility
    pub via_stop: Option<f64>,
}

/// Status together with the segments that justify it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accessibility {
    Green {
        direct: PathSegment,
    },
    Yellow {
        stop: PathSegment,
        stop_to_med: PathSegment,
    },
    Red,
}

/// Classification outcome for one sports facility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessibilityResult {
    pub accessibility: Accessibility,
    pub distances: Distances,
}

impl AccessibilityResult {
    #[must_use]
    pub fn status(&self) -> Status {
        match self.accessibility {
            Accessibility::Green { .. } => Status::Green,
            Accessibility::Yellow { .. } => Status::Yellow,
            Accessibility::Red => Status::Red,
        }
    }

    /// Path segments in travel order; empty for red
    #[must_use]
    pub fn paths(&self) -> Vec<&PathSegment> {
        match &self.accessibility {
            Accessibility::Green { direct } => vec![direct],
            Accessibility::Yellow { stop, stop_to_med } => vec![stop, stop_to_med],
            Accessibility::Red => Vec::new(),
        }
    }

    /// Check the structural invariants before the result leaves the service
    pub fn validate(&self) -> Result<(), AccessError> {
        let Distances {
            direct,
            to_stop,
            via_stop,
        } = self.distances;

        for (name, value) in [("direct", direct), ("to_stop", to_stop), ("via_stop", via_stop)] {
            if let Some(d) = value {
                check_distance(name, d)?;
            }
        }

        if direct.is_none() {
            return Err(AccessError::invariant("direct distance is always computed"));
        }

        match &self.accessibility {
            Accessibility::Green { direct: segment } => {
                check_segment(segment, SegmentKind::Direct, direct)?;
            }
            Accessibility::Yellow { stop, stop_to_med } => {
                check_segment(stop, SegmentKind::Stop, to_stop)?;
                check_segment(stop_to_med, SegmentKind::StopToMed, via_stop)?;
            }
            Accessibility::Red => {}
        }

        Ok(())
    }
}

fn check_distance(name: &str, distance: f64) -> Result<(), AccessError> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(AccessError::invariant(format!(
            "{name} distance must be finite and non-negative, got {distance}"
        )));
    }
    Ok(())
}

fn check_segment(
    segment: &PathSegment,
    expected: SegmentKind,
    reported: Option<f64>,
) -> Result<(), AccessError> {
    if segment.kind != expected {
        return Err(AccessError::invariant(format!(
            "expected {expected:?} segment, got {:?}",
            segment.kind
        )));
    }

    check_distance("segment", segment.distance_m)?;

    if reported != Some(segment.distance_m) {
        return Err(AccessError::invariant(format!(
            "{expected:?} segment distance {} does not match reported {reported:?}",
            segment.distance_m
        )));
    }

    Ok(())
}
