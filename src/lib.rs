//! `MedAccess` - accessibility of medical facilities from sports facilities
//!
//! Each sports facility is classified green (a medical facility within
//! walking distance), yellow (reachable through one nearby transit stop) or
//! red, using planar distances in Web Mercator meters.

pub mod api;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod models;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use classifier::{AccessibilityClassifier, DiagnosticsMode, Thresholds};
pub use config::AccessConfig;
pub use dataset::{DataSnapshot, DatasetSource, GeoJsonFiles, SnapshotHandle};
pub use error::AccessError;
pub use geometry::{GeometryError, GeometryIndex, IndexStrategy, Nearest};
pub use models::{AccessibilityResult, Facility, GeoPoint, ProjectedPoint, Status, TransitStop};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AccessError>;
