//! Integration tests for sv-output.

#[cfg(test)]
mod csv_tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{EventLogRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    fn snap_row(vehicle: &str, frame: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            frame,
            virtual_time: t0(),
            vehicle:      vehicle.to_string(),
            status:       "IN_SERVICE",
            route:        "T1".to_string(),
            direction:    "forward",
            distance_m:   125.0,
            lon:          6.18,
            lat:          48.69,
            heading_deg:  90.0,
            speed_kmh:    30.0,
            odometer_km:  0.125,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let out = dir.path().join("nested/out");
        let _w = CsvWriter::new(&out).unwrap();
        assert!(out.join("vehicle_snapshots.csv").exists());
        assert!(out.join("event_log.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, [
            "frame", "virtual_time", "vehicle", "status", "route", "direction",
            "distance_m", "lon", "lat", "heading_deg", "speed_kmh", "odometer_km",
        ]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["id", "virtual_time", "severity", "source", "message", "entity_id"]);
    }

    #[test]
    fn csv_snapshot_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row("bus-001", 30), snap_row("bus-002", 30)]).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "30");
        assert_eq!(&rows[0][1], "2026-01-05T08:00:00.000");
        assert_eq!(&rows[0][2], "bus-001");
        assert_eq!(&rows[0][6], "125.00");
        assert_eq!(&rows[0][7], "6.1800000");
        assert_eq!(&rows[1][2], "bus-002");
    }

    #[test]
    fn csv_event_with_comma_is_quoted() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[EventLogRow {
            id:           4,
            virtual_time: t0(),
            severity:     "WARNING",
            source:       "SYSTEM",
            message:      "Route T1-forward could not be loaded: status 429, retry later".into(),
            entity_id:    String::new(),
        }])
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][4], "Route T1-forward could not be loaded: status 429, retry later");
        assert_eq!(&rows[0][5], "");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.write_events(&[]).unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use sv_core::{Direction, GeoPoint, OsmId, RouteId};
    use sv_fleet::{BusType, Fleet, DEPOT_POSITION};
    use sv_geometry::{path_length, RouteGeometry};
    use sv_sim::SimBuilder;

    use crate::{CsvWriter, SimOutputObserver};

    fn t1_forward() -> Arc<RouteGeometry> {
        let path = vec![GeoPoint::new(6.18, 48.68), GeoPoint::new(6.18, 48.70)];
        Arc::new(RouteGeometry {
            route_id:         RouteId::new("T1"),
            direction:        Direction::Forward,
            relation_id:      OsmId(2074460),
            total_distance_m: path_length(&path),
            path,
            stops:            Vec::new(),
        })
    }

    #[test]
    fn integration_csv() {
        let mut fleet = Fleet::new();
        for label in ["bus-001", "bus-002"] {
            let id = fleet.add_vehicle(label, BusType::Standard, DEPOT_POSITION);
            fleet.assign_to_route(id, RouteId::new("T1"), Direction::Forward, 0.0).unwrap();
        }
        let mut sim = SimBuilder::new().fleet(fleet).snapshot_interval(2).build().unwrap();
        sim.install_route(t1_forward());
        sim.toggle_pause();

        let dir = TempDir::new().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        for _ in 0..6 {
            sim.frame(1.0 / 30.0, &mut obs);
        }
        obs.finish().unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // interval = 2 → snapshots at frames 0, 2, 4 (3 frames × 2 vehicles).
        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6, "expected 6 snapshot rows, got {}", rows.len());
        assert_eq!(&rows[5][0], "4");
        assert_eq!(&rows[5][3], "IN_SERVICE");

        // Route load + resume, each written exactly once.
        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(&events[0][3], "SYSTEM");
        assert_eq!(&events[1][4], "Simulation resumed");
    }

    #[test]
    fn events_after_last_snapshot_are_flushed() {
        let mut fleet = Fleet::new();
        fleet.add_vehicle("bus-001", BusType::Standard, DEPOT_POSITION);
        let mut sim = SimBuilder::new().fleet(fleet).snapshot_interval(30).build().unwrap();

        let dir = TempDir::new().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.frame(1.0 / 30.0, &mut obs);
        sim.toggle_pause();
        sim.frame(1.0 / 30.0, &mut obs);

        obs.flush_log(&sim.log).unwrap();
        obs.finish().unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(events.len(), sim.log.len());
        assert_eq!(&events[0][4], "Simulation resumed");

        // A second flush has nothing new to write.
        obs.flush_log(&sim.log).unwrap();
        obs.finish().unwrap();
        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        assert_eq!(rdr.records().count(), 1);
    }
}
