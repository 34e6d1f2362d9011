//! Dataset module
//!
//! Loading of the three point collections (sports facilities, medical
//! facilities, transit stops) and the immutable snapshot the service
//! queries.

pub mod geojson_files;
pub mod snapshot;

use std::collections::HashSet;

use crate::error::AccessError;
use crate::models::{Facility, Located, TransitStop};

pub use geojson_files::GeoJsonFiles;
pub use snapshot::{DataSnapshot, SnapshotHandle};

/// Anything that can supply the three collections
pub trait DatasetSource: Send + Sync {
    fn load_sports(&self) -> Result<Vec<Facility>, AccessError>;
    fn load_medical(&self) -> Result<Vec<Facility>, AccessError>;
    fn load_stops(&self) -> Result<Vec<TransitStop>, AccessError>;
}

/// Reject collections where a `global_id` appears more than once
pub fn ensure_unique_ids<T: Located>(collection: &str, items: &[T]) -> Result<(), AccessError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.global_id()) {
            return Err(AccessError::dataset(format!(
                "duplicate global_id {} in {collection} collection",
                item.global_id()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    #[test]
    fn test_unique_ids() {
        let point = GeoPoint::new(37.6, 55.75).unwrap();
        let items = vec![Facility::new(1, point), Facility::new(2, point)];
        assert!(ensure_unique_ids("medical", &items).is_ok());

        let items = vec![Facility::new(1, point), Facility::new(1, point)];
        let err = ensure_unique_ids("medical", &items).unwrap_err();
        assert!(err.to_string().contains("duplicate global_id 1"));
    }
}
