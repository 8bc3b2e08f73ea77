//! Simulation observer trait for progress reporting and data collection.

use chrono::NaiveDateTime;

use sv_fleet::{Fleet, FleetEvent};

use crate::EventLog;

/// Callbacks invoked by [`Sim::frame`][crate::Sim::frame].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each frame, before the clock ticks.
    fn on_frame_start(&mut self, _frame: u64, _now: NaiveDateTime) {}

    /// Called once per fleet event raised during the frame.
    fn on_fleet_event(&mut self, _frame: u64, _event: &FleetEvent) {}

    /// Called at the end of each frame with the virtual seconds it covered.
    fn on_frame_end(&mut self, _frame: u64, _scaled_delta_secs: f64) {}

    /// Called every `snapshot_interval` frames with read-only access to the
    /// fleet and the event log.
    fn on_snapshot(
        &mut self,
        _frame: u64,
        _now:   NaiveDateTime,
        _fleet: &Fleet,
        _log:   &EventLog,
    ) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
