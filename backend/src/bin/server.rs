//! ShotMarker HTTP Server Binary
//!
//! Serves the CSV upload form, the JSON analysis endpoint and the generated
//! diagrams.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin shotmarker-server
//!
//! # With a config file
//! SHOTMARKER_CONFIG=shotmarker.toml cargo run --bin shotmarker-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8099)
//! - `SHOTMARKER_CONFIG`: Path to a TOML config file
//! - `SHOTMARKER_OUTPUT_DIR`: Where diagrams are written (default: output)
//! - `SHOTMARKER_MAX_UPLOAD_BYTES`: Upload size limit (default: 102400)
//! - `SHOTMARKER_PLOT_RETENTION_SECS`: Age at which diagrams are deleted (default: 3600)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shotmarker::config::ServerConfig;
use shotmarker::http::{create_router, AppState};
use shotmarker::services::PlotRegistry;

/// Periodically delete diagrams older than the retention window.
fn spawn_plot_pruning(plots: PlotRegistry, retention_secs: u64) -> anyhow::Result<()> {
    let retention = i64::try_from(retention_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| anyhow::anyhow!("plot retention of {}s is out of range", retention_secs))?;
    let period = Duration::from_secs((retention_secs / 4).max(60));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = plots.prune_before(chrono::Utc::now() - retention);
            if removed > 0 {
                info!("Pruned {} expired plot(s)", removed);
            }
        }
    });
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting ShotMarker HTTP Server");

    let config = ServerConfig::load().map_err(|e| anyhow::anyhow!(e))?;
    std::fs::create_dir_all(&config.output_dir)?;
    info!("Writing plots to {}", config.output_dir.display());

    let addr: SocketAddr = config.bind_address().parse()?;
    let retention_secs = config.plot_retention_secs;

    let state = AppState::new(config);
    spawn_plot_pruning(state.plots.clone(), retention_secs)?;

    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
