//! Accessibility classification
//!
//! Decides, for one sports facility, whether the nearest medical facility is
//! within walking distance (green), reachable via the nearest transit stop
//! (yellow), or neither (red).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AccessError;
use crate::geometry::{GeometryError, GeometryIndex, to_projected};
use crate::models::{
    Accessibility, AccessibilityResult, Distances, GeoPoint, PathSegment, SegmentKind,
};

pub const DEFAULT_DIRECT_THRESHOLD_M: f64 = 250.0;
pub const DEFAULT_STOP_THRESHOLD_M: f64 = 500.0;
pub const DEFAULT_MED_FROM_STOP_THRESHOLD_M: f64 = 500.0;

/// Distance thresholds in meters, all inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Sports facility to medical facility for green
    #[serde(default = "default_direct_m")]
    pub direct_m: f64,
    /// Sports facility to transit stop for yellow
    #[serde(default = "default_stop_m")]
    pub stop_m: f64,
    /// Transit stop to medical facility for yellow
    #[serde(default = "default_med_from_stop_m")]
    pub med_from_stop_m: f64,
}

pub(crate) fn default_direct_m() -> f64 {
    DEFAULT_DIRECT_THRESHOLD_M
}

pub(crate) fn default_stop_m() -> f64 {
    DEFAULT_STOP_THRESHOLD_M
}

pub(crate) fn default_med_from_stop_m() -> f64 {
    DEFAULT_MED_FROM_STOP_THRESHOLD_M
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            direct_m: default_direct_m(),
            stop_m: default_stop_m(),
            med_from_stop_m: default_med_from_stop_m(),
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), AccessError> {
        for (name, value) in [
            ("direct_m", self.direct_m),
            ("stop_m", self.stop_m),
            ("med_from_stop_m", self.med_from_stop_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AccessError::config(format!(
                    "Threshold {name} must be a positive number of meters, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Whether stop distances are computed when the direct path already qualifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsMode {
    /// Stop after a green direct path
    #[default]
    ShortCircuit,
    /// Always report all three distances
    Full,
}

impl FromStr for DiagnosticsMode {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_circuit" => Ok(Self::ShortCircuit),
            "full" => Ok(Self::Full),
            other => Err(AccessError::invalid_request(format!(
                "diagnostics must be 'full' or 'short_circuit', got '{other}'"
            ))),
        }
    }
}

/// Stateless classifier; the collections are passed in per query
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibilityClassifier {
    thresholds: Thresholds,
    diagnostics: DiagnosticsMode,
}

impl AccessibilityClassifier {
    #[must_use]
    pub fn new(thresholds: Thresholds, diagnostics: DiagnosticsMode) -> Self {
        Self {
            thresholds,
            diagnostics,
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsMode {
        self.diagnostics
    }

    /// Classify using the configured diagnostics mode
    pub fn classify(
        &self,
        sport: &GeoPoint,
        medical: &GeometryIndex,
        stops: &GeometryIndex,
    ) -> Result<AccessibilityResult, AccessError> {
        self.classify_with(sport, medical, stops, self.diagnostics)
    }

    #[instrument(
        level = "debug",
        skip(self, medical, stops),
        fields(lon = sport.longitude(), lat = sport.latitude())
    )]
    pub fn classify_with(
        &self,
        sport: &GeoPoint,
        medical: &GeometryIndex,
        stops: &GeometryIndex,
        mode: DiagnosticsMode,
    ) -> Result<AccessibilityResult, AccessError> {
        ensure_populated(medical)?;
        ensure_populated(stops)?;

        let origin = to_projected(sport);

        let nearest_medical = medical.nearest(&origin)?;
        let direct = PathSegment::new(
            SegmentKind::Direct,
            nearest_medical.global_id,
            nearest_medical.location,
            nearest_medical.distance_m,
        );
        let direct_ok = direct.distance_m <= self.thresholds.direct_m;

        if direct_ok && mode == DiagnosticsMode::ShortCircuit {
            debug!("Direct path of {:.1}m qualifies", direct.distance_m);
            return Ok(AccessibilityResult {
                accessibility: Accessibility::Green { direct },
                distances: Distances {
                    direct: Some(direct.distance_m),
                    ..Distances::default()
                },
            });
        }

        let nearest_stop = stops.nearest(&origin)?;
        // Measured from the stop, not from the sports facility
        let medical_from_stop = medical.nearest(&nearest_stop.projected)?;

        let stop = PathSegment::new(
            SegmentKind::Stop,
            nearest_stop.global_id,
            nearest_stop.location,
            nearest_stop.distance_m,
        );
        let stop_to_med = PathSegment::new(
            SegmentKind::StopToMed,
            medical_from_stop.global_id,
            medical_from_stop.location,
            medical_from_stop.distance_m,
        );

        let distances = Distances {
            direct: Some(direct.distance_m),
            to_stop: Some(stop.distance_m),
            via_stop: Some(stop_to_med.distance_m),
        };

        let accessibility = if direct_ok {
            Accessibility::Green { direct }
        } else if stop.distance_m <= self.thresholds.stop_m
            && stop_to_med.distance_m <= self.thresholds.med_from_stop_m
        {
            Accessibility::Yellow { stop, stop_to_med }
        } else {
            Accessibility::Red
        };

        debug!(
            "Classified with direct={:.1}m to_stop={:.1}m via_stop={:.1}m",
            direct.distance_m, stop.distance_m, stop_to_med.distance_m
        );

        Ok(AccessibilityResult {
            accessibility,
            distances,
        })
    }
}

fn ensure_populated(index: &GeometryIndex) -> Result<(), AccessError> {
    if index.is_empty() {
        return Err(GeometryError::EmptyCollection {
            collection: index.name().to_string(),
        }
        .into());
    }
    Ok(())
}
