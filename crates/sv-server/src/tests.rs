//! Unit tests for sv-server.
//!
//! Handlers are driven through `tower::ServiceExt::oneshot` against a router
//! whose Overpass side is `FakeOverpass`.  Nothing binds a socket.

#[cfg(test)]
mod fixtures {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use sv_core::{ManualClock, OsmId};
    use sv_fleet::Roster;
    use sv_geometry::OverpassResponse;
    use sv_ingest::{IngestError, IngestResult, OverpassFetch, RouteIngestionService, RouteTable};
    use sv_sim::SimBuilder;

    use crate::{router, AppState};

    /// Way A→B, way B→C, stop "Gare" at A.
    pub const TWO_WAYS: &str = r#"{
        "elements": [
            { "type": "relation", "id": 1, "members": [
                { "type": "way",  "ref": 10, "role": "" },
                { "type": "way",  "ref": 20, "role": "" },
                { "type": "node", "ref": 5,  "role": "platform" }
            ] },
            { "type": "way", "id": 10, "nodes": [5, 6],
              "geometry": [ { "lat": 48.690, "lon": 6.180 }, { "lat": 48.691, "lon": 6.180 } ] },
            { "type": "way", "id": 20, "nodes": [6, 7],
              "geometry": [ { "lat": 48.691, "lon": 6.180 }, { "lat": 48.691, "lon": 6.182 } ] },
            { "type": "node", "id": 5, "lat": 48.690, "lon": 6.180, "tags": { "name": "Gare" } }
        ]
    }"#;

    pub enum Reply {
        Json(&'static str),
        Status(u16),
        Hang,
    }

    pub struct FakeOverpass {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeOverpass {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OverpassFetch for FakeOverpass {
        async fn fetch_relation(&self, _relation: OsmId) -> IngestResult<OverpassResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Json(json) => Ok(serde_json::from_str(json).unwrap()),
                Reply::Status(status) => Err(IngestError::Upstream { status }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(OverpassResponse::default())
                }
            }
        }
    }

    /// Nancy route table, default roster (bus-001 on T1 forward), paused clock.
    pub fn state(reply: Reply) -> AppState<FakeOverpass> {
        let table = RouteTable::default_nancy().unwrap();
        let fleet = Roster::default().build_fleet().unwrap();
        let sim = SimBuilder::new().fleet(fleet).build().unwrap();
        let fetcher = FakeOverpass { reply, calls: AtomicUsize::new(0) };
        let ingest = RouteIngestionService::new(Arc::new(table), fetcher, Arc::new(ManualClock::new()));
        AppState::new(sim, ingest)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post(uri: &str) -> Request<Body> {
        Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn send_raw(state: &AppState<FakeOverpass>, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send(state: &AppState<FakeOverpass>, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send_raw(state, req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

// ── GET /route ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod route_endpoint {
    use approx::assert_abs_diff_eq;
    use axum::http::StatusCode;

    use sv_core::{Direction, RouteKey};

    use super::fixtures::{get, send, send_raw, state, Reply, TWO_WAYS};

    #[tokio::test]
    async fn missing_parameters_are_rejected() {
        let state = state(Reply::Json(TWO_WAYS));
        for uri in ["/route", "/route?routeId=T1", "/route?direction=forward"] {
            let (status, body) = send(&state, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "Missing required parameters: routeId and direction");
        }
        assert_eq!(state.ingest.fetcher().calls(), 0);
    }

    #[tokio::test]
    async fn bad_direction_is_rejected() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, get("/route?routeId=T1&direction=sideways")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("sideways"));
        assert_eq!(state.ingest.fetcher().calls(), 0);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, get("/route?routeId=T9&direction=forward")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown route: T9");
        assert_eq!(state.ingest.fetcher().calls(), 0);
    }

    #[tokio::test]
    async fn fresh_then_cached() {
        let state = state(Reply::Json(TWO_WAYS));

        let (status, body) = send(&state, get("/route?routeId=T1&direction=forward")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routeId"], "T1");
        assert_eq!(body["direction"], "forward");
        assert_eq!(body["source"], "fresh");

        let geometry = body["geometry"].as_array().unwrap();
        assert_eq!(geometry.len(), 3);
        assert_eq!(geometry[0][0].as_f64().unwrap(), 6.180);
        assert_eq!(geometry[0][1].as_f64().unwrap(), 48.690);
        assert_eq!(geometry[2][0].as_f64().unwrap(), 6.182);

        let stops = body["stops"].as_array().unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0]["name"], "Gare");

        // 110.54 m north, then 0.002° east at 48.69° N.
        let expected = 110.54 + 0.002 * 111_320.0 * 48.690_f64.to_radians().cos();
        assert_abs_diff_eq!(body["totalDistance"].as_f64().unwrap(), expected, epsilon = 0.5);

        let (status, body) = send(&state, get("/route?routeId=T1&direction=forward")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "cache");
        assert_eq!(state.ingest.fetcher().calls(), 1);
    }

    #[tokio::test]
    async fn successful_lookup_installs_route_in_sim() {
        let state = state(Reply::Json(TWO_WAYS));
        let key = RouteKey::new("T1", Direction::Forward);
        assert!(!state.sim.lock().await.routes.contains(&key));

        let (status, _) = send_raw(&state, get("/route?routeId=T1&direction=forward")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.sim.lock().await.routes.contains(&key));
        assert!(state.sim.lock().await.routes_needed().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_500() {
        let state = state(Reply::Status(429));
        let (status, body) = send(&state, get("/route?routeId=T2&direction=backward")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Overpass API error: status 429");
    }

    #[tokio::test]
    async fn unusable_relation_is_500() {
        let state = state(Reply::Json(r#"{ "elements": [] }"#));
        let (status, body) = send(&state, get("/route?routeId=T1&direction=forward")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("malformed route data"));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_upstream_is_504() {
        let state = state(Reply::Hang);
        let (status, body) = send(&state, get("/route?routeId=T1&direction=forward")).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "request timeout (60s exceeded)");
    }
}

// ── Static data and fleet ─────────────────────────────────────────────────────

#[cfg(test)]
mod fleet_endpoints {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::fixtures::{get, post, post_json, send, send_raw, state, Reply, TWO_WAYS};

    #[tokio::test]
    async fn health() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send_raw(&state, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn routes_lists_the_table() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, get("/routes")).await;
        assert_eq!(status, StatusCode::OK);

        let routes = body.as_array().unwrap();
        assert_eq!(routes.len(), 5);
        assert_eq!(routes[0]["id"], "T1");
        assert_eq!(routes[0]["shortName"], "T1");
        assert_eq!(routes[0]["kind"], "trolleybus");
        assert_eq!(routes[0]["relations"]["forward"], 2074460);
        assert_eq!(routes[0]["relations"]["backward"], 2074461);
    }

    #[tokio::test]
    async fn vehicles_report_nearest_stop_once_route_is_loaded() {
        let state = state(Reply::Json(TWO_WAYS));

        let (status, body) = send(&state, get("/vehicles")).await;
        assert_eq!(status, StatusCode::OK);
        let bus = &body[0];
        assert_eq!(bus["label"], "bus-001");
        assert_eq!(bus["status"], "IN_SERVICE");
        assert_eq!(bus["busType"], "STANDARD");
        assert_eq!(bus["assignment"]["routeId"], "T1");
        assert_eq!(bus["position"], json!([6.18, 48.68]));
        assert!(bus["nearestStop"].is_null());

        send_raw(&state, get("/route?routeId=T1&direction=forward")).await;
        let (_, body) = send(&state, get("/vehicles")).await;
        assert_eq!(body[0]["nearestStop"]["name"], "Gare");
    }

    #[tokio::test]
    async fn status_change_is_logged() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, post_json("/vehicles/bus-001/status", json!({ "status": "EMERGENCY" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "EMERGENCY");

        let (_, events) = send(&state, get("/events")).await;
        let last = events.as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["severity"], "CRITICAL");
        assert_eq!(last["source"], "REGULATION");
        assert_eq!(last["entityId"], "bus-001");
    }

    #[tokio::test]
    async fn unknown_vehicle_is_404() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, post_json("/vehicles/bus-999/status", json!({ "status": "IDLE" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown vehicle: bus-999");
    }

    #[tokio::test]
    async fn assign_moves_vehicle_to_another_route() {
        let state = state(Reply::Json(TWO_WAYS));
        let req = post_json(
            "/vehicles/bus-001/assign",
            json!({ "routeId": "T3", "direction": "backward", "startDistance": 100.0 }),
        );
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignment"]["routeId"], "T3");
        assert_eq!(body["assignment"]["direction"], "backward");

        let needed = state.sim.lock().await.routes_needed();
        assert_eq!(needed.len(), 1);
        assert_eq!(needed[0].route_id.as_str(), "T3");
    }

    #[tokio::test]
    async fn assign_rejects_unknown_route_and_negative_distance() {
        let state = state(Reply::Json(TWO_WAYS));
        let unknown = post_json("/vehicles/bus-001/assign", json!({ "routeId": "T9", "direction": "forward" }));
        assert_eq!(send(&state, unknown).await.0, StatusCode::BAD_REQUEST);

        let negative = post_json(
            "/vehicles/bus-001/assign",
            json!({ "routeId": "T2", "direction": "forward", "startDistance": -5.0 }),
        );
        assert_eq!(send(&state, negative).await.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn doors_toggle_and_reject_bad_index() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, post("/vehicles/bus-001/doors/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "index": 2, "open": true }));

        let (_, body) = send(&state, post("/vehicles/bus-001/doors/2")).await;
        assert_eq!(body["open"], false);

        let (status, _) = send(&state, post("/vehicles/bus-001/doors/9")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ── Clock and events ──────────────────────────────────────────────────────────

#[cfg(test)]
mod clock_endpoints {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::fixtures::{get, post, post_json, send, state, Reply, TWO_WAYS};

    #[tokio::test]
    async fn clock_starts_paused_at_reference_time() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, get("/clock")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "now": "2026-01-05T08:00:00", "speed": 1, "paused": true }));
    }

    #[tokio::test]
    async fn toggle_pause_flips_and_logs() {
        let state = state(Reply::Json(TWO_WAYS));
        let (_, body) = send(&state, post("/clock/toggle-pause")).await;
        assert_eq!(body["paused"], false);
        let (_, body) = send(&state, post("/clock/toggle-pause")).await;
        assert_eq!(body["paused"], true);

        let (_, events) = send(&state, get("/events")).await;
        let messages: Vec<&str> = events
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, ["Simulation resumed", "Simulation paused"]);
    }

    #[tokio::test]
    async fn events_since_filters_older_entries() {
        let state = state(Reply::Json(TWO_WAYS));
        send(&state, post("/clock/toggle-pause")).await;
        send(&state, post("/clock/toggle-pause")).await;

        let (_, events) = send(&state, get("/events?since=1")).await;
        let events = events.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["id"], 2);

        let (_, events) = send(&state, get("/events?since=2")).await;
        assert!(events.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn speed_accepts_only_known_multipliers() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, post("/clock/speed/10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["speed"], 10);

        for bad in ["7", "0", "fast"] {
            let (status, body) = send(&state, post(&format!("/clock/speed/{bad}"))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
            assert!(body["error"].is_string());
        }
        let (_, body) = send(&state, get("/clock")).await;
        assert_eq!(body["speed"], 10);
    }

    #[tokio::test]
    async fn seek_sets_virtual_time() {
        let state = state(Reply::Json(TWO_WAYS));
        let (status, body) = send(&state, post_json("/clock/seek", json!({ "time": "2026-01-05T17:45:00" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["now"], "2026-01-05T17:45:00");

        let (status, _) = send(&state, post_json("/clock/seek", json!({ "time": "quarter past five" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use sv_core::{Direction, RouteKey};
    use sv_sim::{NoopObserver, Severity};

    use super::fixtures::{state, Reply, TWO_WAYS};
    use crate::driver::run;

    #[tokio::test(start_paused = true)]
    async fn loads_needed_route_and_moves_vehicle() {
        let state = state(Reply::Json(TWO_WAYS));
        state.sim.lock().await.toggle_pause();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(run(state.clone(), 30, NoopObserver, async move {
            let _ = stop_rx.await;
        }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        stop_tx.send(()).unwrap();
        task.await.unwrap();

        let sim = state.sim.lock().await;
        assert!(sim.routes.contains(&RouteKey::new("T1", Direction::Forward)));
        assert!(sim.frame_count() >= 30);
        let bus = sim.fleet.iter().next().unwrap();
        assert!(bus.distance_on_path_m > 0.0);
        assert_eq!(state.ingest.fetcher().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_route_is_requested_once_and_logged() {
        let state = state(Reply::Status(503));

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(run(state.clone(), 30, NoopObserver, async move {
            let _ = stop_rx.await;
        }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        stop_tx.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(state.ingest.fetcher().calls(), 1);
        let sim = state.sim.lock().await;
        assert!(!sim.routes_needed().is_empty());
        assert!(sim.log.entries().any(|e| e.severity == Severity::Warning));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use clap::Parser;

    use crate::ServerConfig;

    #[test]
    fn defaults() {
        let config = ServerConfig::try_parse_from(["sv-server"]).unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(config.overpass_url, sv_ingest::DEFAULT_OVERPASS_URL);
        assert_eq!(config.tick_hz, 30);
        assert_eq!(config.terminus_threshold_m, 50.0);
        assert!(config.routes.is_none());
        assert!(config.snapshot_dir.is_none());
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::try_parse_from([
            "sv-server",
            "--bind", "0.0.0.0:9000",
            "--tick-hz", "60",
            "--snapshot-dir", "/tmp/sv",
            "--snapshot-every", "10",
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.tick_hz, 60);
        assert_eq!(config.snapshot_every, 10);
        assert_eq!(config.snapshot_dir.unwrap().to_str(), Some("/tmp/sv"));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert!(ServerConfig::try_parse_from(["sv-server", "--tick-hz", "0"]).is_err());
    }
}
