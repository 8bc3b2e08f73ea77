//! Fluent builder for constructing a [`Sim`].

use sv_core::VirtualClock;
use sv_fleet::{Fleet, FleetSimulator};
use sv_geometry::DEFAULT_END_THRESHOLD_M;

use crate::{EventLog, Sim, SimError, SimResult, DEFAULT_LOG_CAPACITY};

/// Fluent builder for [`Sim`].
///
/// | Method                   | Default                              |
/// |--------------------------|--------------------------------------|
/// | `.fleet(f)`              | empty fleet                          |
/// | `.clock(c)`              | `VirtualClock::new()` (paused, ×1)   |
/// | `.terminus_threshold(m)` | 50 m                                 |
/// | `.snapshot_interval(n)`  | 0 (no snapshots)                     |
/// | `.log_capacity(n)`       | 1000 entries                         |
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new()
///     .fleet(Roster::default().build_fleet()?)
///     .snapshot_interval(30)
///     .build()?;
/// sim.frame(1.0 / 30.0, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    fleet:              Fleet,
    clock:              VirtualClock,
    terminus_threshold: f64,
    snapshot_interval:  u64,
    log_capacity:       usize,
}

impl Default for SimBuilder {
    fn default() -> Self {
        Self {
            fleet:              Fleet::new(),
            clock:              VirtualClock::new(),
            terminus_threshold: DEFAULT_END_THRESHOLD_M,
            snapshot_interval:  0,
            log_capacity:       DEFAULT_LOG_CAPACITY,
        }
    }
}

impl SimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = fleet;
        self
    }

    pub fn clock(mut self, clock: VirtualClock) -> Self {
        self.clock = clock;
        self
    }

    /// Metres before the end of a path at which vehicles stop.
    pub fn terminus_threshold(mut self, metres: f64) -> Self {
        self.terminus_threshold = metres;
        self
    }

    /// Call `on_snapshot` every `frames` frames (0 disables).
    pub fn snapshot_interval(mut self, frames: u64) -> Self {
        self.snapshot_interval = frames;
        self
    }

    pub fn log_capacity(mut self, entries: usize) -> Self {
        self.log_capacity = entries;
        self
    }

    pub fn build(self) -> SimResult<Sim> {
        if !self.terminus_threshold.is_finite() || self.terminus_threshold < 0.0 {
            return Err(SimError::Config(format!(
                "terminus threshold must be a non-negative number of metres, got {}",
                self.terminus_threshold
            )));
        }
        if self.log_capacity == 0 {
            return Err(SimError::Config("event log capacity must be at least 1".into()));
        }

        Ok(Sim::from_parts(
            self.clock,
            self.fleet,
            FleetSimulator::with_terminus_threshold(self.terminus_threshold),
            EventLog::with_capacity(self.log_capacity),
            self.snapshot_interval,
        ))
    }
}
