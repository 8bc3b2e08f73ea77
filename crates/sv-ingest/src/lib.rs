//! `sv-ingest` — getting route geometry from OpenStreetMap into the
//! simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`routes`]   | `RouteTable`, `RouteDefinition` — route id → relation ids |
//! | [`cache`]    | `RouteCache` — 15-minute TTL, injectable wall clock       |
//! | [`overpass`] | `OverpassFetch` trait, `OverpassClient` (reqwest)         |
//! | [`service`]  | `RouteIngestionService::fetch_route`                      |
//! | [`error`]    | `IngestError`, `IngestResult<T>`                          |

pub mod cache;
pub mod error;
pub mod overpass;
pub mod routes;
pub mod service;


pub use cache::{RouteCache, ROUTE_CACHE_TTL};
pub use error::{IngestError, IngestResult};
pub use overpass::{build_query, OverpassClient, OverpassFetch, DEFAULT_OVERPASS_URL};
pub use routes::{DirectionRelations, RouteDefinition, RouteKind, RouteTable};
pub use service::{FetchedRoute, RouteIngestionService, RouteSourceKind, FETCH_TIMEOUT};
