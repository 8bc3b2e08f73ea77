//! `FleetSimulator` — advance every in-service vehicle along its path.
//!
//! # Per-vehicle step
//!
//! 1. Skip unless the vehicle is `IN_SERVICE` and assigned to a route.
//! 2. Look the route geometry up; skip if it is not loaded yet.  The
//!    simulator never triggers ingestion itself.
//! 3. `new = distance + speed_mps · Δt`.
//! 4. If the route end is reached at `new`: status `IDLE`, speed 0, distance
//!    kept but clamped to the path length.  Degenerate paths count as reached.
//! 5. Otherwise sample position and heading at `new`, move the tractor, store
//!    `new`, and add the travelled metres to the odometer.
//!
//! Path lengths come from `RouteGeometry::total_distance_m`; the path is not
//! re-measured per vehicle.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use sv_core::{RouteKey, VehicleId};
use sv_geometry::{RouteGeometry, DEFAULT_END_THRESHOLD_M};

use crate::{Fleet, Vehicle, VehicleStatus};

/// Read access to loaded route geometries.
pub trait GeometryLookup {
    fn geometry(&self, key: &RouteKey) -> Option<&RouteGeometry>;
}

impl GeometryLookup for HashMap<RouteKey, Arc<RouteGeometry>> {
    fn geometry(&self, key: &RouteKey) -> Option<&RouteGeometry> {
        self.get(key).map(Arc::as_ref)
    }
}

impl GeometryLookup for HashMap<RouteKey, RouteGeometry> {
    fn geometry(&self, key: &RouteKey) -> Option<&RouteGeometry> {
        self.get(key)
    }
}

/// Something noteworthy that happened during an update.
#[derive(Clone, Debug, PartialEq)]
pub enum FleetEvent {
    /// The vehicle came within the terminus threshold and was stopped.
    TerminusReached { vehicle: VehicleId, route: RouteKey },
}

#[derive(Copy, Clone, Debug)]
pub struct FleetSimulator {
    terminus_threshold_m: f64,
}

impl Default for FleetSimulator {
    fn default() -> Self {
        Self { terminus_threshold_m: DEFAULT_END_THRESHOLD_M }
    }
}

impl FleetSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metres before the path end at which a vehicle is stopped.
    pub fn with_terminus_threshold(threshold_m: f64) -> Self {
        Self { terminus_threshold_m: threshold_m.max(0.0) }
    }

    pub fn terminus_threshold_m(&self) -> f64 {
        self.terminus_threshold_m
    }

    /// Advance the fleet by `scaled_delta_secs` of virtual time.
    ///
    /// A non-positive delta (paused clock) is a no-op.
    pub fn update<G: GeometryLookup + ?Sized>(
        &self,
        fleet:             &mut Fleet,
        scaled_delta_secs: f64,
        routes:            &G,
    ) -> Vec<FleetEvent> {
        if !(scaled_delta_secs > 0.0) {
            return Vec::new();
        }
        fleet
            .iter_mut()
            .filter_map(|vehicle| self.step(vehicle, scaled_delta_secs, routes))
            .collect()
    }

    fn step<G: GeometryLookup + ?Sized>(
        &self,
        vehicle: &mut Vehicle,
        dt:      f64,
        routes:  &G,
    ) -> Option<FleetEvent> {
        if vehicle.status != VehicleStatus::InService {
            return None;
        }
        let key = vehicle.route_key()?;
        let geometry = routes.geometry(&key)?;

        let current = vehicle.distance_on_path_m;
        let next = current + vehicle.speed_mps() * dt;

        if geometry.has_reached_end(next, self.terminus_threshold_m) {
            vehicle.distance_on_path_m = geometry.clamp_distance(current);
            vehicle.status = VehicleStatus::Idle;
            vehicle.speed_kmh = 0.0;
            info!(vehicle = %vehicle.label, route = %key, distance_m = vehicle.distance_on_path_m, "terminus reached");
            return Some(FleetEvent::TerminusReached { vehicle: vehicle.id, route: key });
        }

        // Cannot fail once the end check above has passed.
        let sample = match geometry.sample(next) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(vehicle = %vehicle.label, route = %key, "position sampling failed: {e}");
                return None;
            }
        };

        let tractor = &mut vehicle.segments[0];
        tractor.position = sample.position;
        tractor.heading_deg = sample.heading_deg;
        vehicle.distance_on_path_m = next;
        vehicle.telemetry.odometer_km += (next - current) / 1000.0;
        None
    }
}
