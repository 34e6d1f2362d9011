//! Facility and transit stop records

use super::point::GeoPoint;

/// Anything with a unique id and a geographic position
pub trait Located {
    fn global_id(&self) -> i64;
    fn location(&self) -> GeoPoint;
}

/// A sports or medical facility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facility {
    pub global_id: i64,
    pub location: GeoPoint,
}

impl Facility {
    #[must_use]
    pub fn new(global_id: i64, location: GeoPoint) -> Self {
        Self {
            global_id,
            location,
        }
    }
}

impl Located for Facility {
    fn global_id(&self) -> i64 {
        self.global_id
    }

    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// A public transport stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitStop {
    pub global_id: i64,
    pub location: GeoPoint,
}

impl TransitStop {
    #[must_use]
    pub fn new(global_id: i64, location: GeoPoint) -> Self {
        Self {
            global_id,
            location,
        }
    }
}

impl Located for TransitStop {
    fn global_id(&self) -> i64 {
        self.global_id
    }

    fn location(&self) -> GeoPoint {
        self.location
    }
}
