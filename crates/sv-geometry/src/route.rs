//! Assembled, read-only route geometry.

use serde::{Deserialize, Serialize};

use sv_core::{Direction, GeoPoint, OsmId, RouteId, RouteKey};

use crate::sampler::{self, Sample};
use crate::GeometryResult;

/// A public-transport stop or platform.  Identity is `id`; several routes
/// may reference the same stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id:       String,
    pub name:     String,
    pub position: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code:     Option<String>,
}

/// One direction of one line, rebuilt wholesale on every ingestion and never
/// mutated afterwards.  Shared through `Arc` between the cache and the
/// simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub route_id:         RouteId,
    pub direction:        Direction,
    /// The OSM relation the path was assembled from.
    pub relation_id:      OsmId,
    /// Ordered polyline without consecutive duplicates at way junctions.
    pub path:             Vec<GeoPoint>,
    /// Stops in relation-member order.
    pub stops:            Vec<Stop>,
    /// Planar arc length of `path`, metres.
    pub total_distance_m: f64,
}

impl RouteGeometry {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.route_id.clone(), self.direction)
    }

    /// Stop ids in order.
    pub fn stop_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.stops.iter().map(|s| s.id.as_str())
    }

    /// `true` when the path cannot be sampled.
    pub fn is_degenerate(&self) -> bool {
        self.path.len() < 2
    }

    /// [`position_at`](crate::position_at) using the stored
    /// `total_distance_m` instead of re-measuring the path.
    pub fn sample(&self, distance: f64) -> GeometryResult<Sample> {
        sampler::position_at_with_length(distance, &self.path, self.total_distance_m)
    }

    /// [`has_reached_end`](crate::has_reached_end) against the stored
    /// `total_distance_m`.
    pub fn has_reached_end(&self, distance: f64, threshold_m: f64) -> bool {
        sampler::has_reached_end_with_length(distance, &self.path, self.total_distance_m, threshold_m)
    }

    /// `distance` restricted to `[0, total_distance_m]`.
    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.max(0.0).min(self.total_distance_m)
    }
}
