//! Nearest-stop lookup.
//!
//! An R-tree (via `rstar`) over the stops of one geometry, queried with a
//! vehicle position to report the stop it is closest to.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sv_core::GeoPoint;

use crate::Stop;

/// Entry stored in the R-tree: a `[lon, lat]` point and the stop's position
/// in the owning `Vec<Stop>`.
#[derive(Clone)]
struct StopEntry {
    point: [f64; 2],
    slot:  usize,
}

impl RTreeObject for StopEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopEntry {
    /// Squared Euclidean distance in degree space.  Ranking only; good
    /// enough within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

/// Spatial index over a set of stops.
pub struct StopIndex {
    stops: Vec<Stop>,
    tree:  RTree<StopEntry>,
}

impl StopIndex {
    /// Bulk-load an index over `stops`.
    pub fn new(stops: Vec<Stop>) -> Self {
        let entries = stops
            .iter()
            .enumerate()
            .map(|(slot, s)| StopEntry { point: [s.position.lon, s.position.lat], slot })
            .collect();
        Self { tree: RTree::bulk_load(entries), stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The stop closest to `pos`, or `None` for an empty index.
    pub fn nearest(&self, pos: GeoPoint) -> Option<&Stop> {
        self.tree
            .nearest_neighbor(&[pos.lon, pos.lat])
            .map(|e| &self.stops[e.slot])
    }

    /// Up to `k` stops ordered by ascending distance from `pos`.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<&Stop> {
        self.tree
            .nearest_neighbor_iter(&[pos.lon, pos.lat])
            .take(k)
            .map(|e| &self.stops[e.slot])
            .collect()
    }
}
