//! The `OutputWriter` trait implemented by backend writers.

use crate::{EventLogRow, OutputResult, VehicleSnapshotRow};

/// Sink for snapshot and event-log rows.
///
/// Errors are stored by [`SimOutputObserver`](crate::SimOutputObserver) and
/// retrieved with `take_error`, since observer hooks cannot fail.
pub trait OutputWriter {
    /// Write a batch of vehicle snapshots.
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()>;

    /// Write event-log entries not yet written.
    fn write_events(&mut self, rows: &[EventLogRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
