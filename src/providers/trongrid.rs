//! TronGrid Ledger Client
//!
//! API: https://api.trongrid.io
//! - `/v1/accounts/{address}` account overview
//! - `/v1/accounts/{address}/transactions/trc20?limit=` TRC20 transfers

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::http::JsonFetcher;
use super::LedgerSource;
use crate::models::config::ProviderConfig;
use crate::models::errors::AppResult;
use crate::models::types::TransferRecord;
use crate::utils::constants::{DEFAULT_TOKEN_DECIMALS, TRON_API_KEY_HEADER};

pub struct TronGridClient {
    fetcher: JsonFetcher,
    base_url: String,
}

impl TronGridClient {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            fetcher: JsonFetcher::new(client, "TronGrid")
                .with_api_key(TRON_API_KEY_HEADER, config.trongrid_api_key.as_deref()),
            base_url: config.trongrid_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn account_url(&self, address: &str) -> String {
        format!("{}/v1/accounts/{}", self.base_url, address)
    }

    pub fn transfers_url(&self, address: &str) -> String {
        format!("{}/v1/accounts/{}/transactions/trc20", self.base_url, address)
    }
}

#[async_trait]
impl LedgerSource for TronGridClient {
    async fn fetch_account_overview(&self, address: &str) -> AppResult<Value> {
        self.fetcher.get_json(&self.account_url(address), &[]).await
    }

    async fn fetch_token_transfers(&self, address: &str, limit: u32) -> AppResult<Vec<TransferRecord>> {
        let body = self
            .fetcher
            .get_json(&self.transfers_url(address), &[("limit", limit.to_string())])
            .await?;
        let transfers = TransferRecord::list_from_value(&body, DEFAULT_TOKEN_DECIMALS);
        debug!("📥 {}: {} transfers for {}", self.fetcher.provider(), transfers.len(), address);
        Ok(transfers)
    }
}
