//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::types::*;
use crate::core::engine::WalletScorer;
use crate::models::errors::AppResult;
use crate::models::types::RiskReport;
use crate::render::render_text_report;
use crate::utils::address::canonical_address;
use crate::utils::cache::ReportCache;
use crate::utils::constants::APP_VERSION;

/// Shared application state
pub struct AppState {
    pub scorer: WalletScorer,
    pub cache: ReportCache,
    pub start_time: Instant,
    wallets_scored: AtomicU64,
    reports_rendered: AtomicU64,
}

impl AppState {
    pub fn new(scorer: WalletScorer, cache: ReportCache) -> Self {
        Self {
            scorer,
            cache,
            start_time: Instant::now(),
            wallets_scored: AtomicU64::new(0),
            reports_rendered: AtomicU64::new(0),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    async fn score(&self, address: &str) -> RiskReport {
        self.wallets_scored.fetch_add(1, Ordering::Relaxed);
        self.scorer.score_wallet(address).await
    }
}

// ============================================
// Health Check
// ============================================

/// Liveness probe; `ok` sits at the top level of the body
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthData> {
    Json(HealthData {
        ok: true,
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

// ============================================
// Wallet Risk
// ============================================

/// Score a wallet and keep the result as the snapshot for `/report`
pub async fn get_risk(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> AppResult<Json<RiskReport>> {
    let address = canonical_address(&address)?;

    let report = state.score(&address).await;
    state.cache.set(&address, report.clone());

    Ok(Json(report))
}

/// Render the stored snapshot (or a fresh score) as a text attachment.
/// The snapshot is consumed.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> AppResult<Response> {
    let address = canonical_address(&address)?;

    let report = match state.cache.get(&address) {
        Some(snapshot) => {
            info!("⚡ Rendering stored snapshot for {}", address);
            snapshot
        }
        None => {
            let report = state.score(&address).await;
            state.cache.set(&address, report.clone());
            report
        }
    };

    let body = render_text_report(&report);
    state.cache.invalidate(&address);
    state.reports_rendered.fetch_add(1, Ordering::Relaxed);

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"tron-risk-{}.txt\"", address))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let snapshots = state.cache.stats();

    info!(
        "📊 Snapshot Stats: {} entries, {:.1}% hit rate ({} hits / {} misses)",
        snapshots.entries, snapshots.hit_rate, snapshots.hits, snapshots.misses
    );

    let data = StatsData {
        wallets_scored: state.wallets_scored.load(Ordering::Relaxed),
        reports_rendered: state.reports_rendered.load(Ordering::Relaxed),
        snapshots,
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, start.elapsed().as_secs_f64() * 1000.0))
}
