//! Shared server state.

use std::sync::Arc;

use tokio::sync::Mutex;

use sv_ingest::{OverpassFetch, RouteIngestionService};
use sv_sim::Sim;

/// Handed to every handler and to the driver task.
///
/// The simulation has a single writer per frame: whoever holds the lock.
pub struct AppState<F> {
    pub sim:    Arc<Mutex<Sim>>,
    pub ingest: Arc<RouteIngestionService<F>>,
}

impl<F: OverpassFetch> AppState<F> {
    pub fn new(sim: Sim, ingest: RouteIngestionService<F>) -> Self {
        Self {
            sim:    Arc::new(Mutex::new(sim)),
            ingest: Arc::new(ingest),
        }
    }
}

// Manual impl: `F` itself need not be `Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            sim:    Arc::clone(&self.sim),
            ingest: Arc::clone(&self.ingest),
        }
    }
}
