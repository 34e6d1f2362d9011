//! Immutable dataset snapshot
//!
//! All three collections are loaded and indexed once. Queries hold an
//! `Arc<DataSnapshot>`; a reload builds a complete new snapshot and swaps
//! it in, so in-flight queries keep the snapshot they started with.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, instrument};

use super::{DatasetSource, ensure_unique_ids};
use crate::classifier::{AccessibilityClassifier, DiagnosticsMode};
use crate::error::AccessError;
use crate::geometry::{GeometryError, GeometryIndex, IndexStrategy, Nearest, to_projected};
use crate::models::{AccessibilityResult, Facility, GeoPoint, TransitStop};

/// The loaded collections, read-only for the snapshot's lifetime
#[derive(Debug)]
pub struct DataSnapshot {
    sports: HashMap<i64, Facility>,
    sports_index: GeometryIndex,
    medical: GeometryIndex,
    stops: GeometryIndex,
}

impl DataSnapshot {
    /// Build a snapshot from already loaded collections
    pub fn new(
        sports: Vec<Facility>,
        medical: Vec<Facility>,
        stops: Vec<TransitStop>,
        strategy: IndexStrategy,
    ) -> Result<Self, AccessError> {
        ensure_unique_ids("sports", &sports)?;
        ensure_unique_ids("medical", &medical)?;
        ensure_unique_ids("stops", &stops)?;

        let sports_index = GeometryIndex::build("sports", &sports, strategy);
        let medical = GeometryIndex::build("medical", &medical, strategy);
        let stops = GeometryIndex::build("stops", &stops, strategy);
        let sports = sports.into_iter().map(|f| (f.global_id, f)).collect();

        Ok(Self {
            sports,
            sports_index,
            medical,
            stops,
        })
    }

    /// Load every collection from `source` and index it
    #[instrument(skip(source))]
    pub fn load(source: &dyn DatasetSource, strategy: IndexStrategy) -> Result<Self, AccessError> {
        let snapshot = Self::new(
            source.load_sports()?,
            source.load_medical()?,
            source.load_stops()?,
            strategy,
        )?;

        info!(
            "Snapshot ready: {} sports facilities, {} medical facilities, {} stops",
            snapshot.sports.len(),
            snapshot.medical.len(),
            snapshot.stops.len()
        );

        Ok(snapshot)
    }

    /// Look up a sports facility by id
    pub fn sport(&self, global_id: i64) -> Result<&Facility, AccessError> {
        self.sports
            .get(&global_id)
            .ok_or(AccessError::UnknownFacility { id: global_id })
    }

    /// All sports facilities ordered by id
    #[must_use]
    pub fn sports(&self) -> Vec<&Facility> {
        let mut sports: Vec<&Facility> = self.sports.values().collect();
        sports.sort_by_key(|f| f.global_id);
        sports
    }

    /// Sports facility nearest to an arbitrary point (e.g. a map click)
    pub fn nearest_sport(&self, point: &GeoPoint) -> Result<Nearest, AccessError> {
        self.sports_index
            .nearest(&to_projected(point))
            .map_err(|err| match err {
                GeometryError::EmptyCollection { collection } => {
                    AccessError::empty_collection(collection)
                }
                other => other.into(),
            })
    }

    #[must_use]
    pub fn medical(&self) -> &GeometryIndex {
        &self.medical
    }

    #[must_use]
    pub fn stops(&self) -> &GeometryIndex {
        &self.stops
    }

    #[must_use]
    pub fn sports_count(&self) -> usize {
        self.sports.len()
    }

    /// Resolve a sports facility id and classify it
    pub fn classify(
        &self,
        classifier: &AccessibilityClassifier,
        sport_id: i64,
        mode: DiagnosticsMode,
    ) -> Result<AccessibilityResult, AccessError> {
        let sport = self.sport(sport_id)?;
        classifier.classify_with(&sport.location, &self.medical, &self.stops, mode)
    }
}

/// Shared pointer to the current snapshot
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    current: Arc<RwLock<Arc<DataSnapshot>>>,
}

impl SnapshotHandle {
    #[must_use]
    pub fn new(snapshot: DataSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot queries should run against
    #[must_use]
    pub fn current(&self) -> Arc<DataSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a fully built snapshot
    pub fn replace(&self, snapshot: DataSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
    }
}
