use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use uw_planner::config::PlannerConfig;
use uw_planner::server::create_router;
use uw_planner::types::WrapperState;
use uw_planner::upstream::HttpPlanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = PlannerConfig::load()
        .map_err(|e| anyhow::anyhow!(e))
        .context("could not load configuration")?;
    info!(
        address = %config.server.bind_address(),
        upstream = %config.upstream.base_url,
        "Starting planner service"
    );

    let planner = HttpPlanner::new(&config.upstream).context("could not create planner client")?;
    let bind_address = config.server.bind_address();
    let state = Arc::new(WrapperState::new(config, Arc::new(planner)));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("could not bind {bind_address}"))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
