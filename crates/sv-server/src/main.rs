use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sv_core::SystemClock;
use sv_fleet::Roster;
use sv_ingest::{OverpassClient, RouteIngestionService, RouteTable};
use sv_output::{CsvWriter, SimOutputObserver};
use sv_server::{driver, router, AppState, ServerConfig};
use sv_sim::{NoopObserver, SimBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    // ── Static data ───────────────────────────────────────────────────────
    let table = match &config.routes {
        Some(path) => RouteTable::from_path(path)
            .with_context(|| format!("loading route table {}", path.display()))?,
        None => RouteTable::default_nancy().context("loading embedded route table")?,
    };
    let roster = match &config.fleet {
        Some(path) => Roster::from_path(path)
            .with_context(|| format!("loading fleet {}", path.display()))?,
        None => Roster::default(),
    };
    let fleet = roster.build_fleet().context("building fleet")?;
    info!(routes = table.len(), vehicles = fleet.len(), "static data loaded");

    // ── Simulation + ingestion ────────────────────────────────────────────
    let snapshot_interval = if config.snapshot_dir.is_some() { config.snapshot_every } else { 0 };
    let sim = SimBuilder::new()
        .fleet(fleet)
        .terminus_threshold(config.terminus_threshold_m)
        .snapshot_interval(snapshot_interval)
        .build()
        .context("building simulation")?;

    let client = OverpassClient::new(&config.overpass_url)?;
    info!(endpoint = client.endpoint(), "Overpass client ready");
    let ingest = RouteIngestionService::new(Arc::new(table), client, Arc::new(SystemClock));
    let state = AppState::new(sim, ingest);

    // ── Driver ────────────────────────────────────────────────────────────
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let stopped = async move {
        let _ = stop_rx.changed().await;
    };
    let output = match &config.snapshot_dir {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("opening snapshot directory {}", dir.display()))?;
            info!(dir = %dir.display(), every = config.snapshot_every, "writing CSV snapshots");
            Some(SimOutputObserver::new(writer))
        }
        None => None,
    };
    let driver_state = state.clone();
    let tick_hz = config.tick_hz;
    let driver = tokio::spawn(async move {
        match output {
            Some(observer) => Some(driver::run(driver_state, tick_hz, observer, stopped).await),
            None => {
                driver::run(driver_state, tick_hz, NoopObserver, stopped).await;
                None
            }
        }
    });

    // ── HTTP ──────────────────────────────────────────────────────────────
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, "listening");

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            let _ = stop_tx.send(true);
        })
        .await
        .context("serving HTTP")?;

    if let Some(mut observer) = driver.await.context("driver task panicked")? {
        if let Some(e) = observer.take_error() {
            warn!(error = %e, "snapshot output failed during the run");
        }
        let sim = state.sim.lock().await;
        observer.flush_log(&sim.log).context("writing final event log entries")?;
        observer.finish().context("flushing snapshots")?;
    }
    Ok(())
}
