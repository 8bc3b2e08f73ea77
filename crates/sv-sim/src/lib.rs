//! `sv-sim` — frame loop orchestrator for the rust_sv simulator.
//!
//! # Frame step
//!
//! ```text
//! every frame (≈30 Hz, driven by the owner):
//!   ① Clock   — VirtualClock::tick(real Δt) → scaled Δt (0 while paused)
//!   ② Fleet   — FleetSimulator::update(scaled Δt) over the loaded routes
//!   ③ Log     — terminus / sampling events → EventLog
//!   ④ Observe — SimObserver hooks, snapshot every N frames
//! ```
//!
//! Route ingestion is asynchronous and lives outside the frame: the owner
//! asks [`Sim::routes_needed`], fetches, and calls [`Sim::install_route`].

pub mod builder;
pub mod error;
pub mod log;
pub mod observer;
pub mod routes;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use log::{EventLog, LogEntry, LogSource, Severity, DEFAULT_LOG_CAPACITY};
pub use observer::{NoopObserver, SimObserver};
pub use routes::{LoadedRoute, RouteRegistry};
pub use sim::Sim;
