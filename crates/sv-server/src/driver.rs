//! Background task stepping the simulation in real time.
//!
//! Each tick measures the wall time elapsed since the previous one, runs a
//! single [`Sim::frame`](sv_sim::Sim::frame) under the state lock, then
//! spawns ingestion for any route an assigned vehicle still waits for.
//! Ingestion never runs while the lock is held.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use sv_core::RouteKey;
use sv_ingest::OverpassFetch;
use sv_sim::SimObserver;

use crate::state::AppState;

/// Routes the driver has already asked the ingestion service for.
///
/// A route is requested at most once; failed loads are left for an operator
/// to retry through `GET /route`, which installs the geometry on success.
#[derive(Clone, Default)]
struct RouteRequests {
    requested: Arc<Mutex<HashSet<RouteKey>>>,
}

impl RouteRequests {
    /// `true` the first time `key` is seen.
    fn claim(&self, key: &RouteKey) -> bool {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone())
    }
}

/// Step the simulation at `tick_hz` until `shutdown` resolves, then hand the
/// observer back so the caller can flush it.
pub async fn run<F, O>(
    state:    AppState<F>,
    tick_hz:  u32,
    mut observer: O,
    shutdown: impl Future<Output = ()>,
) -> O
where
    F: OverpassFetch + 'static,
    O: SimObserver,
{
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1)));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let requests = RouteRequests::default();
    let mut last = Instant::now();
    tokio::pin!(shutdown);

    info!(tick_hz, "simulation driver started");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let now = Instant::now();
        let real_delta = now.duration_since(last).as_secs_f64();
        last = now;

        let needed = {
            let mut sim = state.sim.lock().await;
            sim.frame(real_delta, &mut observer);
            sim.routes_needed()
        };
        for key in needed {
            spawn_ingestion(&state, &requests, key);
        }
    }
    info!("simulation driver stopped");
    observer
}

fn spawn_ingestion<F: OverpassFetch + 'static>(state: &AppState<F>, requests: &RouteRequests, key: RouteKey) {
    if !requests.claim(&key) {
        return;
    }
    debug!(route = %key, "requesting geometry for assigned vehicles");

    let state = state.clone();
    tokio::spawn(async move {
        let result = state.ingest.fetch_route(key.route_id.as_str(), key.direction).await;
        let mut sim = state.sim.lock().await;
        match result {
            Ok(fetched) => {
                if !sim.routes.contains(&key) {
                    sim.install_route(fetched.geometry);
                }
            }
            Err(e) => sim.route_load_failed(&key, &e.to_string()),
        }
    });
}
