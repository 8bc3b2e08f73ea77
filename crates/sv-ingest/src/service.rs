//! `RouteIngestionService` — route id + direction in, shared geometry out.
//!
//! Lookup order for a request:
//!
//! 1. Route table: unknown id → [`IngestError::NotFound`].
//! 2. Cache: fresh hit → [`RouteSourceKind::Cache`].
//! 3. Overpass, bounded by [`FETCH_TIMEOUT`]; the response is assembled,
//!    cached, and returned as [`RouteSourceKind::Fresh`].
//!
//! No retries.  Concurrent misses for the same key may each fetch; the last
//! one to finish wins the cache slot.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use sv_core::{Direction, RouteId, RouteKey, WallClock};
use sv_geometry::{assemble, RouteGeometry};

use crate::{IngestError, IngestResult, OverpassFetch, RouteCache, RouteTable};

/// Upper bound on a single Overpass round trip.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a returned geometry came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSourceKind {
    Cache,
    Fresh,
}

#[derive(Clone, Debug)]
pub struct FetchedRoute {
    pub geometry: Arc<RouteGeometry>,
    pub source:   RouteSourceKind,
}

pub struct RouteIngestionService<F> {
    table:   Arc<RouteTable>,
    cache:   RouteCache<Arc<RouteGeometry>>,
    fetcher: F,
    timeout: Duration,
}

impl<F: OverpassFetch> RouteIngestionService<F> {
    pub fn new(table: Arc<RouteTable>, fetcher: F, clock: Arc<dyn WallClock>) -> Self {
        Self {
            table,
            cache: RouteCache::new(clock),
            fetcher,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the per-fetch bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn cache(&self) -> &RouteCache<Arc<RouteGeometry>> {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Geometry of `route_id` in `direction`, from cache or Overpass.
    pub async fn fetch_route(
        &self,
        route_id:  &str,
        direction: Direction,
    ) -> IngestResult<FetchedRoute> {
        let definition = self
            .table
            .get(route_id)
            .ok_or_else(|| IngestError::NotFound(RouteId::new(route_id)))?;
        let key = RouteKey::new(route_id, direction);

        if let Some(geometry) = self.cache.get(&key) {
            info!(route = %key, "cache hit");
            return Ok(FetchedRoute { geometry, source: RouteSourceKind::Cache });
        }

        let relation = definition.relation(direction);
        info!(route = %key, %relation, "cache miss, fetching relation");

        let response = match tokio::time::timeout(self.timeout, self.fetcher.fetch_relation(relation)).await {
            Ok(result) => result.inspect_err(|e| warn!(route = %key, %relation, "fetch failed: {e}"))?,
            Err(_) => {
                warn!(route = %key, %relation, timeout_s = self.timeout.as_secs(), "fetch timed out");
                return Err(IngestError::Timeout(self.timeout));
            }
        };

        let geometry = assemble(&response.elements, RouteId::new(route_id), direction)
            .inspect_err(|e| warn!(route = %key, %relation, "assembly failed: {e}"))?;
        let geometry = Arc::new(geometry);

        info!(
            route = %key,
            "route ingested: {} points, {} stops, {:.2} km",
            geometry.path.len(),
            geometry.stops.len(),
            geometry.total_distance_m / 1000.0,
        );

        self.cache.put(key, Arc::clone(&geometry));
        Ok(FetchedRoute { geometry, source: RouteSourceKind::Fresh })
    }
}
