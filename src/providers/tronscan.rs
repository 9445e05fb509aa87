//! TronScan Compliance Client
//!
//! API: https://apilist.tronscanapi.com
//! - `/api/security/account/data?address=` security flags
//! - `/api/stableCoin/blackList?blackAddress=` stablecoin blacklist records
//!
//! The API key travels in the `TRON-PRO-API-KEY` header.

use async_trait::async_trait;

use super::http::JsonFetcher;
use super::ComplianceSource;
use crate::models::config::ProviderConfig;
use crate::models::errors::AppResult;
use crate::models::types::{BlacklistEvidence, SecurityCheck};
use crate::utils::constants::TRON_API_KEY_HEADER;

pub struct TronScanClient {
    fetcher: JsonFetcher,
    base_url: String,
}

impl TronScanClient {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            fetcher: JsonFetcher::new(client, "TronScan")
                .with_api_key(TRON_API_KEY_HEADER, config.tronscan_api_key.as_deref()),
            base_url: config.tronscan_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn security_url(&self) -> String {
        format!("{}/api/security/account/data", self.base_url)
    }

    pub fn blacklist_url(&self) -> String {
        format!("{}/api/stableCoin/blackList", self.base_url)
    }
}

#[async_trait]
impl ComplianceSource for TronScanClient {
    async fn fetch_security_signal(&self, address: &str) -> AppResult<SecurityCheck> {
        let body = self
            .fetcher
            .get_json(&self.security_url(), &[("address", address.to_string())])
            .await?;
        Ok(SecurityCheck::from_value(body))
    }

    async fn fetch_blacklist_evidence(&self, address: &str) -> AppResult<BlacklistEvidence> {
        // Newest record first; only the total matters
        let query = [
            ("blackAddress", address.to_string()),
            ("start", "0".to_string()),
            ("limit", "1".to_string()),
            ("sort", "2".to_string()),
            ("direction", "2".to_string()),
        ];
        let body = self.fetcher.get_json(&self.blacklist_url(), &query).await?;
        Ok(BlacklistEvidence::from_value(body))
    }
}
