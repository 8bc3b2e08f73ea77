//! HTTP surface.
//!
//! | Method | Path                               | Body / query                          |
//! |--------|------------------------------------|---------------------------------------|
//! | GET    | `/route`                           | `?routeId=T1&direction=forward`       |
//! | GET    | `/routes`                          |                                       |
//! | GET    | `/vehicles`                        |                                       |
//! | POST   | `/vehicles/{label}/assign`         | `{ routeId, direction, startDistance }` |
//! | POST   | `/vehicles/{label}/status`         | `{ status }`                          |
//! | POST   | `/vehicles/{label}/doors/{index}`  |                                       |
//! | GET    | `/clock`                           |                                       |
//! | POST   | `/clock/toggle-pause`              |                                       |
//! | POST   | `/clock/speed/{multiplier}`        |                                       |
//! | POST   | `/clock/seek`                      | `{ time: "YYYY-MM-DDTHH:MM:SS" }`     |
//! | GET    | `/events`                          | `?since=<id>`                         |
//! | GET    | `/health`                          |                                       |

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use sv_core::{Direction, GeoPoint, RouteId, SpeedMultiplier, VehicleId};
use sv_fleet::{Vehicle, VehicleStatus};
use sv_geometry::Stop;
use sv_ingest::{DirectionRelations, OverpassFetch, RouteDefinition, RouteSourceKind};
use sv_sim::{LogEntry, Sim};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Accepted by `POST /clock/seek`.
pub const SEEK_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn router<F: OverpassFetch + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/route", get(get_route::<F>))
        .route("/routes", get(list_routes::<F>))
        .route("/vehicles", get(list_vehicles::<F>))
        .route("/vehicles/{label}/assign", post(assign_vehicle::<F>))
        .route("/vehicles/{label}/status", post(set_vehicle_status::<F>))
        .route("/vehicles/{label}/doors/{index}", post(toggle_door::<F>))
        .route("/clock", get(get_clock::<F>))
        .route("/clock/toggle-pause", post(toggle_pause::<F>))
        .route("/clock/speed/{multiplier}", post(set_speed::<F>))
        .route("/clock/seek", post(seek::<F>))
        .route("/events", get(list_events::<F>))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    route_id:  Option<String>,
    direction: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteBody<'a> {
    route_id:       &'a RouteId,
    direction:      Direction,
    geometry:       &'a [GeoPoint],
    stops:          &'a [Stop],
    total_distance: f64,
    source:         RouteSourceKind,
}

async fn get_route<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Query(query): Query<RouteQuery>,
) -> ApiResult<Response> {
    let (Some(route_id), Some(direction)) = (query.route_id, query.direction) else {
        return Err(ApiError::InvalidInput("Missing required parameters: routeId and direction".into()));
    };
    let direction: Direction = direction
        .parse()
        .map_err(|e: sv_core::CoreError| ApiError::InvalidInput(e.to_string()))?;

    let fetched = state.ingest.fetch_route(&route_id, direction).await?;
    let geometry = &fetched.geometry;

    // A successful lookup also makes the geometry available to the fleet.
    {
        let mut sim = state.sim.lock().await;
        if !sim.routes.contains(&geometry.key()) {
            sim.install_route(geometry.clone());
        }
    }

    let body = RouteBody {
        route_id:       &geometry.route_id,
        direction:      geometry.direction,
        geometry:       &geometry.path,
        stops:          &geometry.stops,
        total_distance: geometry.total_distance_m,
        source:         fetched.source,
    };
    Ok(Json(body).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteSummary<'a> {
    id:         &'a RouteId,
    short_name: &'a str,
    long_name:  &'a str,
    kind:       sv_ingest::RouteKind,
    relations:  DirectionRelations,
}

impl<'a> RouteSummary<'a> {
    fn new(id: &'a RouteId, def: &'a RouteDefinition) -> Self {
        Self {
            id,
            short_name: &def.short_name,
            long_name:  &def.long_name,
            kind:       def.kind,
            relations:  def.relations,
        }
    }
}

async fn list_routes<F: OverpassFetch + 'static>(State(state): State<AppState<F>>) -> Response {
    let summaries: Vec<RouteSummary<'_>> = state
        .ingest
        .table()
        .iter()
        .map(|(id, def)| RouteSummary::new(id, def))
        .collect();
    Json(summaries).into_response()
}

// ── Vehicles ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StopRef<'a> {
    id:   &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VehicleView<'a> {
    #[serde(flatten)]
    vehicle:      &'a Vehicle,
    position:     GeoPoint,
    heading:      f64,
    nearest_stop: Option<StopRef<'a>>,
}

fn vehicle_views(sim: &Sim) -> Vec<VehicleView<'_>> {
    sim.fleet
        .iter()
        .map(|vehicle| {
            let position = vehicle.position();
            let nearest_stop = vehicle
                .route_key()
                .and_then(|key| sim.routes.nearest_stop(&key, position))
                .map(|stop| StopRef { id: &stop.id, name: &stop.name });
            VehicleView { vehicle, position, heading: vehicle.heading_deg(), nearest_stop }
        })
        .collect()
}

async fn list_vehicles<F: OverpassFetch + 'static>(State(state): State<AppState<F>>) -> Response {
    let sim = state.sim.lock().await;
    Json(vehicle_views(&sim)).into_response()
}

fn find_vehicle(sim: &Sim, label: &str) -> ApiResult<VehicleId> {
    sim.fleet
        .find_by_label(label)
        .ok_or_else(|| ApiError::UnknownVehicle(label.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    route_id:       String,
    direction:      Direction,
    #[serde(default)]
    start_distance: f64,
}

async fn assign_vehicle<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Path(label): Path<String>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Response> {
    if !state.ingest.table().contains(&req.route_id) {
        return Err(ApiError::InvalidInput(format!("unknown route: {}", req.route_id)));
    }
    if !req.start_distance.is_finite() || req.start_distance < 0.0 {
        return Err(ApiError::InvalidInput(format!("invalid start distance {}", req.start_distance)));
    }
    let mut sim = state.sim.lock().await;
    let id = find_vehicle(&sim, &label)?;
    sim.assign_vehicle(id, RouteId::new(req.route_id), req.direction, req.start_distance)?;
    debug!(%label, "vehicle assigned over HTTP");
    Ok(Json(sim.fleet.get(id)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    status: VehicleStatus,
}

async fn set_vehicle_status<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Path(label): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Response> {
    let mut sim = state.sim.lock().await;
    let id = find_vehicle(&sim, &label)?;
    sim.set_vehicle_status(id, req.status)?;
    Ok(Json(sim.fleet.get(id)).into_response())
}

#[derive(Serialize)]
struct DoorState {
    index: usize,
    open:  bool,
}

async fn toggle_door<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Path((label, index)): Path<(String, usize)>,
) -> ApiResult<Response> {
    let mut sim = state.sim.lock().await;
    let id = find_vehicle(&sim, &label)?;
    let open = sim.fleet.toggle_door(id, index)?;
    Ok(Json(DoorState { index, open }).into_response())
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClockView {
    pub now:    NaiveDateTime,
    pub speed:  SpeedMultiplier,
    pub paused: bool,
}

impl ClockView {
    fn of(sim: &Sim) -> Self {
        Self { now: sim.clock.now(), speed: sim.clock.speed(), paused: sim.clock.is_paused() }
    }
}

async fn get_clock<F: OverpassFetch + 'static>(State(state): State<AppState<F>>) -> Json<ClockView> {
    let sim = state.sim.lock().await;
    Json(ClockView::of(&sim))
}

async fn toggle_pause<F: OverpassFetch + 'static>(State(state): State<AppState<F>>) -> Json<ClockView> {
    let mut sim = state.sim.lock().await;
    sim.toggle_pause();
    Json(ClockView::of(&sim))
}

async fn set_speed<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Path(multiplier): Path<String>,
) -> ApiResult<Json<ClockView>> {
    let speed = multiplier
        .parse::<u32>()
        .map_err(|_| ApiError::InvalidInput(format!("invalid speed multiplier {multiplier:?}")))
        .and_then(|m| SpeedMultiplier::try_from(m).map_err(|e| ApiError::InvalidInput(e.to_string())))?;
    let mut sim = state.sim.lock().await;
    sim.set_speed(speed);
    Ok(Json(ClockView::of(&sim)))
}

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    time: String,
}

async fn seek<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Json(req): Json<SeekRequest>,
) -> ApiResult<Json<ClockView>> {
    let target = NaiveDateTime::parse_from_str(&req.time, SEEK_TIME_FORMAT)
        .map_err(|e| ApiError::InvalidInput(format!("invalid time {:?}: {e}", req.time)))?;
    let mut sim = state.sim.lock().await;
    sim.seek(target);
    Ok(Json(ClockView::of(&sim)))
}

// ── Events / health ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    since: Option<u64>,
}

async fn list_events<F: OverpassFetch + 'static>(
    State(state): State<AppState<F>>,
    Query(query): Query<EventsQuery>,
) -> Response {
    let sim = state.sim.lock().await;
    let entries: Vec<&LogEntry> = sim.log.since(query.since.unwrap_or(0)).collect();
    Json(entries).into_response()
}

async fn health() -> &'static str {
    "OK"
}
