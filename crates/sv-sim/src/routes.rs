//! Route geometries the simulation can currently drive on.

use std::collections::HashMap;
use std::sync::Arc;

use sv_core::{GeoPoint, RouteKey};
use sv_fleet::GeometryLookup;
use sv_geometry::{RouteGeometry, Stop, StopIndex};

/// A geometry plus the spatial index over its stops.
pub struct LoadedRoute {
    pub geometry: Arc<RouteGeometry>,
    pub stops:    StopIndex,
}

impl LoadedRoute {
    pub fn new(geometry: Arc<RouteGeometry>) -> Self {
        let stops = StopIndex::new(geometry.stops.clone());
        Self { geometry, stops }
    }
}

/// Loaded routes keyed by `(route id, direction)`.
#[derive(Default)]
pub struct RouteRegistry {
    routes: HashMap<RouteKey, LoadedRoute>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the geometry under its own key.  Returns `true`
    /// when an older geometry was replaced.
    pub fn install(&mut self, geometry: Arc<RouteGeometry>) -> bool {
        self.routes.insert(geometry.key(), LoadedRoute::new(geometry)).is_some()
    }

    pub fn get(&self, key: &RouteKey) -> Option<&LoadedRoute> {
        self.routes.get(key)
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.routes.contains_key(key)
    }

    /// Stop on `key` closest to `position`.
    pub fn nearest_stop(&self, key: &RouteKey, position: GeoPoint) -> Option<&Stop> {
        self.routes.get(key)?.stops.nearest(position)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RouteKey> + '_ {
        self.routes.keys()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl GeometryLookup for RouteRegistry {
    fn geometry(&self, key: &RouteKey) -> Option<&RouteGeometry> {
        self.routes.get(key).map(|r| r.geometry.as_ref())
    }
}
