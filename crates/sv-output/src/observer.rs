//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use chrono::NaiveDateTime;

use sv_fleet::Fleet;
use sv_sim::{EventLog, SimObserver};

use crate::row::{EventLogRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes vehicle snapshots and new event-log entries
/// to any [`OutputWriter`] at every snapshot frame.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  Check them with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:       W,
    /// Id of the newest log entry already written.
    last_log_id:  u64,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_log_id: 0,
            last_error:  None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Write the log entries newer than the last snapshot.  Call before
    /// [`finish`](Self::finish) so events logged after the final snapshot
    /// frame still reach the output.
    pub fn flush_log(&mut self, log: &EventLog) -> OutputResult<()> {
        let events: Vec<EventLogRow> = log.since(self.last_log_id).map(EventLogRow::from).collect();
        if !events.is_empty() {
            self.writer.write_events(&events)?;
        }
        self.last_log_id = log.last_id();
        Ok(())
    }

    /// Flush the writer.  Call once when the simulation stops.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files afterwards).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, frame: u64, now: NaiveDateTime, fleet: &Fleet, log: &EventLog) {
        let rows: Vec<VehicleSnapshotRow> = fleet
            .iter()
            .map(|v| VehicleSnapshotRow::from_vehicle(frame, now, v))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }

        let result = self.flush_log(log);
        self.store_err(result);
    }
}
