//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `vehicle_snapshots.csv`
//! - `event_log.csv`
//!
//! Both are flushed after every batch so they can be tailed while the
//! server runs.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventLogRow, OutputResult, VehicleSnapshotRow};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files in it and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("vehicle_snapshots.csv"))?;
        snapshots.write_record([
            "frame", "virtual_time", "vehicle", "status", "route", "direction",
            "distance_m", "lon", "lat", "heading_deg", "speed_kmh", "odometer_km",
        ])?;

        let mut events = Writer::from_path(dir.join("event_log.csv"))?;
        events.write_record(["id", "virtual_time", "severity", "source", "message", "entity_id"])?;

        Ok(Self {
            snapshots,
            events,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.frame.to_string(),
                row.virtual_time.format(TIME_FORMAT).to_string(),
                row.vehicle.clone(),
                row.status.to_string(),
                row.route.clone(),
                row.direction.to_string(),
                format!("{:.2}", row.distance_m),
                format!("{:.7}", row.lon),
                format!("{:.7}", row.lat),
                format!("{:.1}", row.heading_deg),
                format!("{:.1}", row.speed_kmh),
                format!("{:.3}", row.odometer_km),
            ])?;
        }
        self.snapshots.flush()?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventLogRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.id.to_string(),
                row.virtual_time.format(TIME_FORMAT).to_string(),
                row.severity.to_string(),
                row.source.to_string(),
                row.message.clone(),
                row.entity_id.clone(),
            ])?;
        }
        self.events.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
