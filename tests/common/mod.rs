//! Shared fixtures for the integration tests
#![allow(dead_code)]

use medaccess::geometry::{to_geographic, to_projected};
use medaccess::{AccessError, DatasetSource, Facility, GeoPoint, TransitStop};

/// Sports facilities sit 10 km apart so their neighbourhoods never interact
pub const SPACING_M: f64 = 10_000.0;

pub const GREEN_SPORT: i64 = 1;
pub const YELLOW_SPORT: i64 = 2;
pub const RED_SPORT: i64 = 3;

pub fn base() -> GeoPoint {
    GeoPoint::new(37.6, 55.75).unwrap()
}

/// Point offset from `base()` by meters in the projected plane
pub fn at(dx: f64, dy: f64) -> GeoPoint {
    to_geographic(&to_projected(&base()).offset(dx, dy))
}

/// Three sports facilities covering every tier with default thresholds:
/// green (medical 120 m away), yellow (direct 700 m, stop 300 m, stop to
/// medical 400 m) and red (direct 900 m, stop 700 m, stop to medical 1600 m).
#[derive(Debug, Clone)]
pub struct Scenario {
    pub sports: Vec<Facility>,
    pub medical: Vec<Facility>,
    pub stops: Vec<TransitStop>,
}

impl Scenario {
    pub fn three_tiers() -> Self {
        let green = 0.0;
        let yellow = SPACING_M;
        let red = 2.0 * SPACING_M;

        Self {
            sports: vec![
                Facility::new(GREEN_SPORT, at(green, 0.0)),
                Facility::new(YELLOW_SPORT, at(yellow, 0.0)),
                Facility::new(RED_SPORT, at(red, 0.0)),
            ],
            medical: vec![
                Facility::new(101, at(green + 120.0, 0.0)),
                Facility::new(102, at(yellow + 700.0, 0.0)),
                Facility::new(103, at(red + 900.0, 0.0)),
            ],
            stops: vec![
                TransitStop::new(201, at(green, 200.0)),
                TransitStop::new(202, at(yellow + 300.0, 0.0)),
                TransitStop::new(203, at(red - 700.0, 0.0)),
            ],
        }
    }

    pub fn without_medical(mut self) -> Self {
        self.medical.clear();
        self
    }

    pub fn without_stops(mut self) -> Self {
        self.stops.clear();
        self
    }
}

impl DatasetSource for Scenario {
    fn load_sports(&self) -> Result<Vec<Facility>, AccessError> {
        Ok(self.sports.clone())
    }

    fn load_medical(&self) -> Result<Vec<Facility>, AccessError> {
        Ok(self.medical.clone())
    }

    fn load_stops(&self) -> Result<Vec<TransitStop>, AccessError> {
        Ok(self.stops.clone())
    }
}

/// Source whose every load fails, for reload error paths
#[derive(Debug, Clone, Copy)]
pub struct BrokenSource;

impl DatasetSource for BrokenSource {
    fn load_sports(&self) -> Result<Vec<Facility>, AccessError> {
        Err(AccessError::dataset("sports dataset unavailable"))
    }

    fn load_medical(&self) -> Result<Vec<Facility>, AccessError> {
        Err(AccessError::dataset("medical dataset unavailable"))
    }

    fn load_stops(&self) -> Result<Vec<TransitStop>, AccessError> {
        Err(AccessError::dataset("stops dataset unavailable"))
    }
}
