//! Command-line / environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use sv_geometry::DEFAULT_END_THRESHOLD_M;
use sv_ingest::DEFAULT_OVERPASS_URL;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sv-server",
    about = "Transit supervision simulator: OpenStreetMap route geometry and vehicles on a virtual clock",
    version
)]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "SV_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Overpass interpreter endpoint
    #[arg(long, env = "SV_OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL)]
    pub overpass_url: String,

    /// Route table JSON (defaults to the embedded Nancy Tempo lines)
    #[arg(long, env = "SV_ROUTES")]
    pub routes: Option<PathBuf>,

    /// Initial fleet JSON (defaults to one bus on T1 forward)
    #[arg(long, env = "SV_FLEET")]
    pub fleet: Option<PathBuf>,

    /// Simulation frames per real second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub tick_hz: u32,

    /// Distance before the end of a route at which vehicles stop, metres
    #[arg(long, default_value_t = DEFAULT_END_THRESHOLD_M)]
    pub terminus_threshold_m: f64,

    /// Write vehicle snapshots and the event log as CSV into this directory
    #[arg(long, env = "SV_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Frames between two CSV snapshots
    #[arg(long, default_value_t = 30)]
    pub snapshot_every: u64,
}
