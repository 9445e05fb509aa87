//! TRON Risk API Server
//!
//! REST API serving wallet risk scores and downloadable reports
//!
//! Usage:
//!   cargo run --bin tron_risk_api
//!
//! Environment:
//!   PORT / RISK_PORT      - Server port (default: 8080)
//!   RISK_HOST             - Server host (default: 0.0.0.0)
//!   SNAPSHOT_TTL_MINUTES  - Report snapshot lifetime, 0 = until consumed (default: 120)
//!   TRONSCAN_API_KEY      - Sent as TRON-PRO-API-KEY
//!   RUST_LOG              - Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tron_risk::api::{create_router, start_cleanup_task, AppState};
use tron_risk::utils::constants::{APP_NAME, APP_VERSION};
use tron_risk::{live_scorer, EngineConfig, ProviderConfig, ReportCache, ServerConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let server = ServerConfig::from_env();
    let scorer = live_scorer(EngineConfig::from_env(), &ProviderConfig::from_env())?;

    let cache = ReportCache::new(server.snapshot_ttl);
    let cleanup = start_cleanup_task(cache.clone());
    info!("🧹 Snapshot cleanup task started");

    let state = Arc::new(AppState::new(scorer, cache));
    let app = create_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  GET  /risk/{{address}}     - Wallet risk report (JSON)");
    info!("  GET  /report/{{address}}   - Wallet risk report (text download)");
    info!("  GET  /v1/stats            - Service statistics");
    info!("  GET  /health              - Health check");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");
    cleanup.abort();

    let stats = state.cache.stats();
    info!("   Snapshots pending: {}", stats.entries);
    info!("   Snapshot hit rate: {:.1}%", stats.hit_rate);
    info!("👋 TRON Risk API shutdown complete");

    Ok(())
}
