//! `sv-output` — simulation output writers for the rust_sv simulator.
//!
//! | Backend | Files created                              |
//! |---------|--------------------------------------------|
//! | CSV     | `vehicle_snapshots.csv`, `event_log.csv`   |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `sv_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sv_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.frame(1.0 / 30.0, &mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EventLogRow, VehicleSnapshotRow};
pub use writer::OutputWriter;
