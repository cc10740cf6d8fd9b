//! stemserve - stem separation service binary
//!
//! Parses configuration from CLI/environment, wires up the router, and
//! serves until terminated.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use stemserve::config::{Args, Config};
use stemserve::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_args(&args);

    info!(
        "Starting stemserve v{} (model: {})",
        env!("CARGO_PKG_VERSION"),
        config.model
    );
    if let Some(path) = &config.demucs_bin {
        info!("Separation engine override: {}", path.display());
    }
    if let Some(path) = &config.ffmpeg_bin {
        info!("Transcoder override: {}", path.display());
    }

    let state = AppState::new(config);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("stemserve listening on http://{addr}");
    info!("Health check: http://{addr}/api/health");

    axum::serve(listener, app).await?;

    Ok(())
}
