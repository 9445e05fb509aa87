//! Shared HTTP transport for the TRON data providers
//!
//! - One pooled `reqwest::Client` with gzip, user agent and a request timeout
//! - HTTP 429 and 5xx responses (and timeouts / connection failures) are
//!   retried with exponential backoff plus ±20% jitter
//! - Other non-success statuses fail immediately

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    PROVIDER_BASE_RETRY_MS, PROVIDER_MAX_RETRIES, PROVIDER_MAX_RETRY_MS, RETRY_JITTER_PERCENT,
    USER_AGENT as USER_AGENT_CONST,
};

/// Build HTTP client with default headers and automatic gzip decompression
pub fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
}

/// Delay before retry number `attempt` (1-based), before jitter
pub fn base_backoff_ms(attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1).min(16);
    PROVIDER_BASE_RETRY_MS
        .saturating_mul(2_u64.pow(exp))
        .min(PROVIDER_MAX_RETRY_MS)
}

fn jittered(delay_ms: u64) -> u64 {
    let jitter_range = (delay_ms * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 = rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    (delay_ms as i64 + jitter).max(1) as u64
}

/// A named upstream sharing one client
#[derive(Clone)]
pub struct JsonFetcher {
    client: reqwest::Client,
    provider: &'static str,
    /// Extra header sent with every request (API key)
    auth_header: Option<(&'static str, HeaderValue)>,
}

impl JsonFetcher {
    pub fn new(client: reqwest::Client, provider: &'static str) -> Self {
        Self {
            client,
            provider,
            auth_header: None,
        }
    }

    /// Attach an API key header. Invalid header values are dropped with a warning.
    pub fn with_api_key(mut self, header: &'static str, key: Option<&str>) -> Self {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            match HeaderValue::from_str(key) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    self.auth_header = Some((header, value));
                }
                Err(_) => warn!("⚠️ {} API key is not a valid header value, ignoring it", self.provider),
            }
        }
        self
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// GET a JSON body with retry
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let mut attempt = 0;
        loop {
            match self.execute(url, query).await {
                Ok(body) => return Ok(body),
                Err((err, retryable)) => {
                    if !retryable || attempt >= PROVIDER_MAX_RETRIES {
                        return Err(err);
                    }
                    attempt += 1;
                    let base = base_backoff_ms(attempt);
                    let delay = jittered(base);
                    if err.code == ErrorCode::UpstreamRateLimited {
                        warn!("⏳ {} rate limited, backing off (attempt {}/{})", self.provider, attempt, PROVIDER_MAX_RETRIES);
                    }
                    debug!(
                        "⏳ Retry {}/{} for {} after {}ms (base: {}ms): {}",
                        attempt, PROVIDER_MAX_RETRIES, self.provider, delay, base, err
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    /// Single request; the flag says whether a retry may help
    async fn execute(&self, url: &str, query: &[(&str, String)]) -> Result<Value, (AppError, bool)> {
        let mut request = self.client.get(url).query(query);
        if let Some((name, value)) = &self.auth_header {
            request = request.header(*name, value.clone());
        }

        let response = request.send().await.map_err(|e| {
            let err = AppError::from(e);
            let retryable = err.code.is_retryable();
            (err, retryable)
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err((AppError::upstream_rate_limited(self.provider), true));
        }
        if status.is_server_error() {
            return Err((AppError::upstream_http(self.provider, status.as_u16()), true));
        }
        if !status.is_success() {
            return Err((AppError::upstream_http(self.provider, status.as_u16()), false));
        }

        response.json::<Value>().await.map_err(|e| {
            let err = AppError::upstream_invalid(format!("{} returned an unreadable body: {}", self.provider, e));
            (err, false)
        })
    }
}
