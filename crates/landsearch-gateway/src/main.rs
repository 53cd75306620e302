//! LandSearch gateway binary.
//!
//! Usage: `landsearch-gateway [config.yaml]` (default `landsearch.yaml`).
//! `RUST_LOG` overrides `logging.level` from the config.

use tracing_subscriber::{fmt, EnvFilter};

use landsearch_core::error::{LandSearchError, Result};
use landsearch_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("landsearch-gateway: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "landsearch.yaml".into());
    let cfg = config::load_from_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    fmt().with_env_filter(filter).init();

    let listen = cfg.server.listen_addr()?;
    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "landsearch-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| LandSearchError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LandSearchError::Internal(format!("server failed: {e}")))?;

    tracing::info!("landsearch-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
