//! Providers Module - External Data Sources
//!
//! Ledger data (TronGrid) and compliance data (TronScan) behind two traits so
//! the engine can be driven by live clients or in-memory fixtures.

pub mod http;
pub mod trongrid;
pub mod tronscan;

pub use trongrid::*;
pub use tronscan::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::errors::AppResult;
use crate::models::types::{BlacklistEvidence, SecurityCheck, TransferRecord};

/// Account metadata and token transfer history
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Raw account overview; shape varies and is unwrapped by the engine
    async fn fetch_account_overview(&self, address: &str) -> AppResult<Value>;

    /// Most recent token transfers touching `address`
    async fn fetch_token_transfers(&self, address: &str, limit: u32) -> AppResult<Vec<TransferRecord>>;
}

/// Per-address compliance checks
#[async_trait]
pub trait ComplianceSource: Send + Sync {
    async fn fetch_security_signal(&self, address: &str) -> AppResult<SecurityCheck>;

    async fn fetch_blacklist_evidence(&self, address: &str) -> AppResult<BlacklistEvidence>;
}
