//! Geometry module
//!
//! Projection and distance primitives plus nearest-point search over fixed
//! collections. Every distance in the crate is computed by
//! [`projection::planar_distance`].

pub mod error;
pub mod index;
pub mod projection;

pub use error::GeometryError;
pub use index::{GeometryIndex, IndexStrategy, Nearest};
pub use projection::{planar_distance, planar_distance_squared, to_geographic, to_projected};
