//! Data models for the MedAccess service
//!
//! This module contains the core domain models organized by concern:
//! - Point: Geographic and projected coordinates
//! - Facility: Sports/medical facilities and transit stops
//! - Accessibility: Classification results, path segments and distances

pub mod accessibility;
pub mod facility;
pub mod point;

// Re-export all public types for convenient access
pub use accessibility::{Accessibility, AccessibilityResult, Distances, PathSegment, SegmentKind, Status};
pub use facility::{Facility, Located, TransitStop};
pub use point::{GeoPoint, MAX_MERCATOR_LATITUDE, ProjectedPoint};
