//! Grid simulation web service.
//!
//! Builds the shared simulation session, wires the HTTP router and serves
//! until a shutdown signal arrives.

use anyhow::Result;
use gridsim::{api, config::Config, state::AppState, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let state = AppState::new(&cfg);
    let app = api::router(state, &cfg);

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0 - the service will be reachable from the network");
    }
    info!(%addr, "starting grid simulation service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
