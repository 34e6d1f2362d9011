//! Nearest-point search over a fixed collection.
//!
//! Entries are projected once when the index is built. Two search strategies
//! are available and return identical results: a linear scan, and an R-tree
//! whose distance function is the shared squared-distance primitive. Ties
//! are broken by lowest `global_id`.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{GeometryError, Result};
use super::projection::{planar_distance, planar_distance_squared, to_projected};
use crate::models::{GeoPoint, Located, ProjectedPoint};

/// How nearest-point queries are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStrategy {
    Linear,
    #[default]
    RTree,
}

#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    global_id: i64,
    location: GeoPoint,
    projected: ProjectedPoint,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.projected.as_array())
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        planar_distance_squared(&self.projected, &ProjectedPoint::new(point[0], point[1]))
    }
}

/// Result of a nearest-point query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub global_id: i64,
    pub location: GeoPoint,
    pub projected: ProjectedPoint,
    pub distance_m: f64,
}

/// Immutable nearest-point index over one collection
pub struct GeometryIndex {
    name: String,
    strategy: IndexStrategy,
    entries: Vec<IndexedPoint>,
    tree: Option<RTree<IndexedPoint>>,
}

impl std::fmt::Debug for GeometryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryIndex")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl GeometryIndex {
    /// Build an index named after the collection it holds (used in errors)
    pub fn build<T: Located>(name: impl Into<String>, items: &[T], strategy: IndexStrategy) -> Self {
        let name = name.into();
        let entries: Vec<IndexedPoint> = items
            .iter()
            .map(|item| {
                let location = item.location();
                IndexedPoint {
                    global_id: item.global_id(),
                    location,
                    projected: to_projected(&location),
                }
            })
            .collect();

        let tree = match strategy {
            IndexStrategy::RTree => Some(RTree::bulk_load(entries.clone())),
            IndexStrategy::Linear => None,
        };

        debug!(
            "Built {:?} index '{}' with {} entries",
            strategy,
            name,
            entries.len()
        );

        Self {
            name,
            strategy,
            entries,
            tree,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest entry to `point` and its distance in meters
    pub fn nearest(&self, point: &ProjectedPoint) -> Result<Nearest> {
        let best = match &self.tree {
            Some(tree) => Self::nearest_in_tree(tree, point),
            None => self.nearest_by_scan(point),
        };

        let best = best.ok_or_else(|| GeometryError::EmptyCollection {
            collection: self.name.clone(),
        })?;

        Ok(Nearest {
            global_id: best.global_id,
            location: best.location,
            projected: best.projected,
            distance_m: planar_distance(point, &best.projected)?,
        })
    }

    fn nearest_by_scan(&self, point: &ProjectedPoint) -> Option<&IndexedPoint> {
        self.entries
            .iter()
            .map(|entry| (planar_distance_squared(&entry.projected, point), entry))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then(a.global_id.cmp(&b.global_id)))
            .map(|(_, entry)| entry)
    }

    fn nearest_in_tree<'a>(
        tree: &'a RTree<IndexedPoint>,
        point: &ProjectedPoint,
    ) -> Option<&'a IndexedPoint> {
        let mut candidates = tree.nearest_neighbor_iter(&point.as_array());
        let mut best = candidates.next()?;
        let best_distance = planar_distance_squared(&best.projected, point);

        // The iterator yields in non-decreasing distance, so equidistant
        // entries are adjacent.
        for candidate in candidates {
            if planar_distance_squared(&candidate.projected, point) > best_distance {
                break;
            }
            if candidate.global_id < best.global_id {
                best = candidate;
            }
        }

        Some(best)
    }
}
