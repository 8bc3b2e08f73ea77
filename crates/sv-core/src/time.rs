//! Time sources.
//!
//! # Virtual time
//!
//! [`VirtualClock`] holds the simulated wall time as a reference instant plus
//! elapsed virtual seconds, a speed multiplier and a pause flag.  The driver calls
//! [`VirtualClock::tick`] once per frame with the real elapsed time; the
//! clock returns the scaled delta that the fleet simulator should integrate.
//!
//! ```text
//! PAUSED  --toggle_pause-->  RUNNING
//! RUNNING --toggle_pause-->  PAUSED
//! tick(d): RUNNING → elapsed += d · speed ; PAUSED → no-op
//! seek(t): reference = t, elapsed = 0
//! ```
//!
//! # Wall time
//!
//! [`WallClock`] abstracts `Instant::now()` so TTL-based caches can be
//! driven deterministically from tests via [`ManualClock`].

use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// 2026-01-05 08:00:00 (a Monday morning), the clock's starting point.
pub const REFERENCE_UNIX_SECS: i64 = 1_767_600_000;

// ── SpeedMultiplier ───────────────────────────────────────────────────────────

/// Allowed virtual-time speed factors.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SpeedMultiplier {
    #[default]
    X1,
    X10,
    X30,
    X60,
}

impl SpeedMultiplier {
    #[inline]
    pub fn factor(self) -> f64 {
        u32::from(self) as f64
    }
}

impl TryFrom<u32> for SpeedMultiplier {
    type Error = CoreError;

    fn try_from(m: u32) -> Result<Self, Self::Error> {
        match m {
            1  => Ok(SpeedMultiplier::X1),
            10 => Ok(SpeedMultiplier::X10),
            30 => Ok(SpeedMultiplier::X30),
            60 => Ok(SpeedMultiplier::X60),
            other => Err(CoreError::InvalidSpeed(other)),
        }
    }
}

impl From<SpeedMultiplier> for u32 {
    fn from(m: SpeedMultiplier) -> u32 {
        match m {
            SpeedMultiplier::X1  => 1,
            SpeedMultiplier::X10 => 10,
            SpeedMultiplier::X30 => 30,
            SpeedMultiplier::X60 => 60,
        }
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", u32::from(*self))
    }
}

// ── VirtualClock ──────────────────────────────────────────────────────────────

/// Simulated clock with a speed multiplier and a pause switch.
///
/// Time is a reference instant plus the virtual seconds elapsed since it;
/// frame deltas accumulate into `elapsed_secs` only.
///
/// Single writer: only the simulation driver mutates it.
#[derive(Clone, Debug)]
pub struct VirtualClock {
    reference:    NaiveDateTime,
    /// Virtual seconds since `reference`.
    elapsed_secs: f64,
    speed:        SpeedMultiplier,
    paused:       bool,
}

impl VirtualClock {
    /// A paused clock at [`REFERENCE_UNIX_SECS`], speed ×1.
    pub fn new() -> Self {
        let reference = DateTime::from_timestamp(REFERENCE_UNIX_SECS, 0)
            .unwrap_or_default()
            .naive_utc();
        Self::starting_at(reference)
    }

    /// A paused clock at an arbitrary instant, speed ×1.
    pub fn starting_at(reference: NaiveDateTime) -> Self {
        Self {
            reference,
            elapsed_secs: 0.0,
            speed:        SpeedMultiplier::X1,
            paused:       true,
        }
    }

    /// Advance by `real_delta_secs × speed` unless paused.
    ///
    /// Returns the virtual seconds actually elapsed (`0.0` when paused), which
    /// is the delta the fleet simulator integrates this frame.
    pub fn tick(&mut self, real_delta_secs: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let scaled = real_delta_secs * self.speed.factor();
        self.elapsed_secs += scaled;
        scaled
    }

    /// Takes effect on the next `tick`; elapsed time is not rescaled.
    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        self.speed = speed;
    }

    /// Flip between running and paused.  Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Overwrite the current time, regardless of pause state or bounds.
    /// `target` becomes the new reference.
    pub fn seek(&mut self, target: NaiveDateTime) {
        self.reference = target;
        self.elapsed_secs = 0.0;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    #[inline]
    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    /// Virtual seconds since the reference (start or last seek).
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Current virtual time as fractional Unix seconds.  Lossy at the
    /// sub-microsecond level; use [`now`](Self::now) for display.
    pub fn unix_secs(&self) -> f64 {
        self.reference.and_utc().timestamp() as f64 + self.elapsed_secs
    }

    /// Current virtual time, rounded to the microsecond.
    pub fn now(&self) -> NaiveDateTime {
        let micros = (self.elapsed_secs * 1_000_000.0).round() as i64;
        self.reference + TimeDelta::microseconds(micros)
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.paused { "paused" } else { "running" };
        write!(f, "{} ({} {})", self.now().format("%Y-%m-%d %H:%M:%S"), self.speed, state)
    }
}

// ── WallClock ─────────────────────────────────────────────────────────────────

/// Source of real (monotonic) time.  Injected into anything with a TTL.
pub trait WallClock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The process clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base:   Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { base: Instant::now(), offset: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + offset
    }
}

impl<C: WallClock + ?Sized> WallClock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
