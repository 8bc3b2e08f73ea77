//! `sv-server` — HTTP API and real-time driver for the `rust_sv` simulator.
//!
//! The binary (`src/main.rs`) wires these pieces together:
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`config`]  | `ServerConfig` (clap, env overrides)                  |
//! | [`state`]   | `AppState`: the locked `Sim` plus ingestion service   |
//! | [`api`]     | axum `Router` and handlers                            |
//! | [`driver`]  | interval task stepping the `Sim` and loading routes   |
//! | [`error`]   | `ApiError` → HTTP status + JSON body                  |

pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::router;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
