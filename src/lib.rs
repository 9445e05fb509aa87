//! TRON Wallet Risk Library
//!
//! Deterministic 0-100 risk scoring for TRON wallets from:
//! - Direct compliance flags (blacklist, fraud, stablecoin blacklist evidence)
//! - One-hop counterparty exposure
//! - USDT dust micro-transfer patterns

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod render;
pub mod utils;

pub use crate::core::{FlowTotals, RiskScoreBuilder, ScoreResult, WalletScorer};
pub use crate::models::config::{DustThresholds, EngineConfig, ProviderConfig, ScoringWeights, ServerConfig};
pub use crate::models::errors::{AppError, AppResult, ErrorCode};
pub use crate::models::types::{ReasonCode, RiskLevel, RiskReport, TransferRecord};
pub use crate::providers::{ComplianceSource, LedgerSource, TronGridClient, TronScanClient};
pub use crate::render::render_text_report;
pub use crate::utils::cache::{CacheStats, ReportCache};

use std::sync::Arc;

/// Build a scorer backed by the live TronGrid and TronScan APIs
pub fn live_scorer(engine: EngineConfig, providers: &ProviderConfig) -> AppResult<WalletScorer> {
    let client = providers::http::build_client(providers.http_timeout)?;
    Ok(WalletScorer::new(
        Arc::new(engine),
        Arc::new(TronGridClient::new(client.clone(), providers)),
        Arc::new(TronScanClient::new(client, providers)),
    ))
}
