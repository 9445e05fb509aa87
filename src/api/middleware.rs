//! API Middleware (Logging) and background maintenance

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::info;

use crate::utils::cache::ReportCache;
use crate::utils::constants::SNAPSHOT_CLEANUP_INTERVAL_SECS;

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    response
}

/// Purge expired report snapshots every minute
pub fn start_cleanup_task(cache: ReportCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SNAPSHOT_CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            cache.cleanup_expired();
        }
    })
}
