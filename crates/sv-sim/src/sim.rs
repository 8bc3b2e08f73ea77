//! The `Sim` struct and its frame step.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use sv_core::{Direction, RouteId, RouteKey, SpeedMultiplier, VehicleId, VirtualClock};
use sv_fleet::{Fleet, FleetEvent, FleetSimulator, VehicleStatus};
use sv_geometry::RouteGeometry;

use crate::{EventLog, LogSource, RouteRegistry, Severity, SimObserver, SimResult};

/// The whole simulation state, stepped one frame at a time by its owner.
///
/// Each [`frame`](Sim::frame):
///
/// 1. ticks the [`VirtualClock`] with the real elapsed seconds and gets the
///    scaled delta back (0 while paused),
/// 2. advances the fleet by that delta over the loaded routes,
/// 3. records fleet events in the [`EventLog`],
/// 4. hands a snapshot to the observer every `snapshot_interval` frames.
///
/// Route geometry is never fetched from here: the owner installs it with
/// [`install_route`](Sim::install_route) once ingestion completes.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub clock:     VirtualClock,
    pub fleet:     Fleet,
    pub simulator: FleetSimulator,
    pub routes:    RouteRegistry,
    pub log:       EventLog,

    /// Frames between `on_snapshot` calls; 0 disables snapshots.
    pub snapshot_interval: u64,

    frame: u64,
}

impl Sim {
    pub(crate) fn from_parts(
        clock:             VirtualClock,
        fleet:             Fleet,
        simulator:         FleetSimulator,
        log:               EventLog,
        snapshot_interval: u64,
    ) -> Self {
        Self {
            clock,
            fleet,
            simulator,
            routes: RouteRegistry::new(),
            log,
            snapshot_interval,
            frame: 0,
        }
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Advance by `real_delta_secs` of wall time.  Returns the virtual
    /// seconds actually simulated.
    pub fn frame<O: SimObserver>(&mut self, real_delta_secs: f64, observer: &mut O) -> f64 {
        let frame = self.frame;
        observer.on_frame_start(frame, self.clock.now());

        let scaled = self.clock.tick(real_delta_secs);
        let events = self.simulator.update(&mut self.fleet, scaled, &self.routes);
        for event in &events {
            self.record_fleet_event(event);
            observer.on_fleet_event(frame, event);
        }

        observer.on_frame_end(frame, scaled);
        if self.snapshot_interval > 0 && frame.is_multiple_of(self.snapshot_interval) {
            observer.on_snapshot(frame, self.clock.now(), &self.fleet, &self.log);
        }

        self.frame += 1;
        scaled
    }

    /// Frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    // ── Routes ────────────────────────────────────────────────────────────

    /// Make `geometry` available to the vehicles assigned to it.
    pub fn install_route(&mut self, geometry: Arc<RouteGeometry>) {
        let key = geometry.key();
        let message = format!(
            "Route {key} loaded: {} points, {} stops, {:.2} km",
            geometry.path.len(),
            geometry.stops.len(),
            geometry.total_distance_m / 1000.0,
        );
        self.routes.install(geometry);
        self.push_log(Severity::Info, LogSource::System, message, None);
    }

    /// Record that loading `key` failed.  Vehicles on it keep waiting.
    pub fn route_load_failed(&mut self, key: &RouteKey, reason: &str) {
        self.push_log(
            Severity::Warning,
            LogSource::System,
            format!("Route {key} could not be loaded: {reason}"),
            None,
        );
    }

    /// Routes that in-service vehicles are assigned to but that are not
    /// loaded yet, without duplicates.
    pub fn routes_needed(&self) -> Vec<RouteKey> {
        let mut needed: Vec<RouteKey> = Vec::new();
        let pending = self
            .fleet
            .iter()
            .filter(|v| v.status == VehicleStatus::InService)
            .filter_map(|v| v.route_key())
            .filter(|k| !self.routes.contains(k));
        for key in pending {
            if !needed.contains(&key) {
                needed.push(key);
            }
        }
        needed
    }

    // ── Clock control ─────────────────────────────────────────────────────

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        let message = if paused { "Simulation paused" } else { "Simulation resumed" };
        self.push_log(Severity::Info, LogSource::System, message, None);
        paused
    }

    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        self.clock.set_speed(speed);
        self.push_log(Severity::Info, LogSource::System, format!("Simulation speed set to {speed}"), None);
    }

    pub fn seek(&mut self, target: NaiveDateTime) {
        self.clock.seek(target);
        self.push_log(Severity::Info, LogSource::System, format!("Virtual time set to {target}"), None);
    }

    // ── Regulation ────────────────────────────────────────────────────────

    pub fn assign_vehicle(
        &mut self,
        id:               VehicleId,
        route_id:         RouteId,
        direction:        Direction,
        start_distance_m: f64,
    ) -> SimResult<()> {
        let message = format!("assigned to {route_id} ({direction}) at {start_distance_m:.0} m");
        self.fleet.assign_to_route(id, route_id, direction, start_distance_m)?;
        self.push_vehicle_log(id, Severity::Info, LogSource::Regulation, &message);
        Ok(())
    }

    pub fn set_vehicle_status(&mut self, id: VehicleId, status: VehicleStatus) -> SimResult<()> {
        self.fleet.set_status(id, status)?;
        let severity = if status == VehicleStatus::Emergency { Severity::Critical } else { Severity::Info };
        self.push_vehicle_log(id, severity, LogSource::Regulation, &format!("status set to {status}"));
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn record_fleet_event(&mut self, event: &FleetEvent) {
        match event {
            FleetEvent::TerminusReached { vehicle, route } => {
                self.push_vehicle_log(*vehicle, Severity::Info, LogSource::Vehicle, &format!("reached the terminus of {route}"));
            }
        }
    }

    fn push_vehicle_log(&mut self, id: VehicleId, severity: Severity, source: LogSource, what: &str) {
        let label = self.fleet.get(id).map(|v| v.label.clone()).unwrap_or_else(|| id.to_string());
        self.push_log(severity, source, format!("{label} {what}"), Some(label));
    }

    fn push_log(&mut self, severity: Severity, source: LogSource, message: impl Into<String>, entity_id: Option<String>) {
        let message = message.into();
        info!(severity = severity.as_str(), source = source.as_str(), "{message}");
        self.log.push(self.clock.now(), severity, source, message, entity_id);
    }
}
