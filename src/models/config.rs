//! Configuration module
//!
//! Immutable settings handed to the engine, providers and server at
//! construction time. `Default` gives the documented values; `from_env`
//! overrides them from environment variables (a `.env` file is honoured by
//! the binaries).

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use super::errors::AppError;

use crate::utils::constants::{
    parse_address_list, DEFAULT_COUNTERPARTY_CONCURRENCY, DEFAULT_COUNTERPARTY_TIMEOUT_SECS,
    DEFAULT_DUST_MICRO, DEFAULT_DUST_MIN_EVENTS, DEFAULT_DUST_SMALL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_PORT, DEFAULT_SNAPSHOT_TTL_MINUTES, DEFAULT_TRANSFER_LIMIT,
    DEFAULT_WEIGHT_BLACKLIST, DEFAULT_WEIGHT_COUNTERPARTY_CAP, DEFAULT_WEIGHT_COUNTERPARTY_HIT,
    DEFAULT_WEIGHT_DUST_BASE, DEFAULT_WEIGHT_DUST_CAP, DEFAULT_WEIGHT_DUST_PER_EVENT,
    DEFAULT_WEIGHT_FRAUD, MAX_EVENT_AMOUNT, TRONGRID_BASE_URL, TRONSCAN_BASE_URL,
    USDT_TRC20_CONTRACT,
};

/// Read and parse an env var, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("⚠️ {}, using default", AppError::invalid_config(key, &raw));
                default
            }
        },
        _ => default,
    }
}

/// Non-empty env var
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Decimal literal known to be valid
fn decimal_const(literal: &str) -> Decimal {
    Decimal::from_str(literal).unwrap_or(Decimal::ZERO)
}

/// Scoring weights (points on the 0-100 scale)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Floor applied for a direct or evidenced blacklist hit
    pub blacklist: u32,
    /// Added for a fraud flag
    pub fraud: u32,
    /// Per risky one-hop counterparty
    pub counterparty_hit: u32,
    pub counterparty_cap: u32,
    /// Added once `min_events` dust transfers are seen
    pub dust_base: u32,
    /// Per dust transfer beyond `min_events`
    pub dust_per_event: u32,
    pub dust_cap: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            blacklist: DEFAULT_WEIGHT_BLACKLIST,
            fraud: DEFAULT_WEIGHT_FRAUD,
            counterparty_hit: DEFAULT_WEIGHT_COUNTERPARTY_HIT,
            counterparty_cap: DEFAULT_WEIGHT_COUNTERPARTY_CAP,
            dust_base: DEFAULT_WEIGHT_DUST_BASE,
            dust_per_event: DEFAULT_WEIGHT_DUST_PER_EVENT,
            dust_cap: DEFAULT_WEIGHT_DUST_CAP,
        }
    }
}

impl ScoringWeights {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            blacklist: env_or("WEIGHT_BLACKLIST", d.blacklist),
            fraud: env_or("WEIGHT_FRAUD", d.fraud),
            counterparty_hit: env_or("WEIGHT_COUNTERPARTY_HIT", d.counterparty_hit),
            counterparty_cap: env_or("WEIGHT_COUNTERPARTY_CAP", d.counterparty_cap),
            dust_base: env_or("WEIGHT_DUST_BASE", d.dust_base),
            dust_per_event: env_or("WEIGHT_DUST_PER_EVENT", d.dust_per_event),
            dust_cap: env_or("WEIGHT_DUST_CAP", d.dust_cap),
        }
    }
}

/// Dust tier boundaries (token units, inclusive upper bounds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DustThresholds {
    pub micro: Decimal,
    pub small: Decimal,
    /// Dust transfers needed before the dust rule fires
    pub min_events: u32,
}

impl Default for DustThresholds {
    fn default() -> Self {
        Self {
            micro: decimal_const(DEFAULT_DUST_MICRO),
            small: decimal_const(DEFAULT_DUST_SMALL),
            min_events: DEFAULT_DUST_MIN_EVENTS,
        }
    }
}

impl DustThresholds {
    pub fn from_env() -> Self {
        let d = Self::default();
        let mut micro = env_or("DUST_MICRO_USDT", d.micro);
        let small = env_or("DUST_SMALL_USDT", d.small);
        if micro > small {
            warn!(%micro, %small, "DUST_MICRO_USDT exceeds DUST_SMALL_USDT, clamping micro tier");
            micro = small;
        }
        Self {
            micro,
            small,
            min_events: env_or("DUST_MIN_EVENTS", d.min_events),
        }
    }
}

/// Everything the scoring engine needs besides its data sources
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    pub dust: DustThresholds,
    /// Token whose flows and dust are measured (USDT TRC20)
    pub token_contract: String,
    /// Per-transfer sanity bound; larger amounts count as zero
    pub max_event_amount: Decimal,
    pub transfer_limit: u32,
    pub counterparty_concurrency: usize,
    /// `None` disables the per-lookup timeout
    pub counterparty_timeout: Option<Duration>,
    /// Known DEX contracts for exposure breakdown
    pub dex_addresses: HashSet<String>,
    /// Known exchange hot wallets for exposure breakdown
    pub exchange_addresses: HashSet<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            dust: DustThresholds::default(),
            token_contract: USDT_TRC20_CONTRACT.to_string(),
            max_event_amount: Decimal::from(MAX_EVENT_AMOUNT),
            transfer_limit: DEFAULT_TRANSFER_LIMIT,
            counterparty_concurrency: DEFAULT_COUNTERPARTY_CONCURRENCY,
            counterparty_timeout: Some(Duration::from_secs(DEFAULT_COUNTERPARTY_TIMEOUT_SECS)),
            dex_addresses: HashSet::new(),
            exchange_addresses: HashSet::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();

        let timeout_secs: u64 = env_or("COUNTERPARTY_TIMEOUT_SECS", DEFAULT_COUNTERPARTY_TIMEOUT_SECS);
        let address_set = |key: &str| -> HashSet<String> {
            env_string(key)
                .map(|raw| parse_address_list(&raw).into_iter().collect())
                .unwrap_or_default()
        };

        let config = Self {
            weights: ScoringWeights::from_env(),
            dust: DustThresholds::from_env(),
            token_contract: env_string("USDT_CONTRACT").unwrap_or(d.token_contract),
            max_event_amount: d.max_event_amount,
            transfer_limit: env_or("TRANSFER_LIMIT", d.transfer_limit),
            counterparty_concurrency: env_or("COUNTERPARTY_CONCURRENCY", d.counterparty_concurrency).max(1),
            counterparty_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            dex_addresses: address_set("DEX_ADDRESSES"),
            exchange_addresses: address_set("EXCHANGE_ADDRESSES"),
        };

        info!(
            token = %config.token_contract,
            micro = %config.dust.micro,
            small = %config.dust.small,
            min_dust_events = config.dust.min_events,
            concurrency = config.counterparty_concurrency,
            "Engine configuration loaded"
        );

        config
    }

    /// Builder-style override used by tests and embedders
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_dust(mut self, dust: DustThresholds) -> Self {
        self.dust = dust;
        self
    }
}

/// Upstream provider settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub trongrid_base_url: String,
    pub tronscan_base_url: String,
    /// Key is NEVER logged
    pub trongrid_api_key: Option<String>,
    /// Key is NEVER logged
    pub tronscan_api_key: Option<String>,
    pub http_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            trongrid_base_url: TRONGRID_BASE_URL.to_string(),
            tronscan_base_url: TRONSCAN_BASE_URL.to_string(),
            trongrid_api_key: None,
            tronscan_api_key: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let tronscan_api_key = env_string("TRONSCAN_API_KEY");
        if tronscan_api_key.is_some() {
            info!("🔑 TRONSCAN_API_KEY configured (key hidden for security)");
        }
        Self {
            trongrid_base_url: env_string("TRONGRID_BASE_URL").unwrap_or(d.trongrid_base_url),
            tronscan_base_url: env_string("TRONSCAN_BASE_URL").unwrap_or(d.tronscan_base_url),
            trongrid_api_key: env_string("TRONGRID_API_KEY"),
            tronscan_api_key,
            http_timeout: Duration::from_secs(env_or("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps snapshots until they are consumed
    pub snapshot_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            snapshot_ttl: Some(Duration::from_secs(DEFAULT_SNAPSHOT_TTL_MINUTES * 60)),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        // Hosting platforms set PORT; RISK_PORT is for local runs
        let port = env_string("PORT")
            .or_else(|| env_string("RISK_PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(d.port);
        let ttl_minutes: u64 = env_or("SNAPSHOT_TTL_MINUTES", DEFAULT_SNAPSHOT_TTL_MINUTES);
        Self {
            host: env_string("RISK_HOST").unwrap_or(d.host),
            port,
            snapshot_ttl: (ttl_minutes > 0).then(|| Duration::from_secs(ttl_minutes * 60)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.weights.blacklist, 80);
        assert_eq!(config.weights.counterparty_cap, 30);
        assert_eq!(config.dust.micro, Decimal::new(1, 1));
        assert_eq!(config.dust.small, Decimal::ONE);
        assert_eq!(config.dust.min_events, 3);
        assert_eq!(config.max_event_amount, Decimal::from(1_000_000_000_000u64));
        assert_eq!(config.token_contract, USDT_TRC20_CONTRACT);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("TRON_RISK_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("TRON_RISK_TEST_GARBAGE", 7u32), 7);
        std::env::set_var("TRON_RISK_TEST_GARBAGE", " 12 ");
        assert_eq!(env_or("TRON_RISK_TEST_GARBAGE", 7u32), 12);
        std::env::remove_var("TRON_RISK_TEST_GARBAGE");
        assert_eq!(env_or("TRON_RISK_TEST_GARBAGE", 7u32), 7);
    }

    #[test]
    fn test_with_overrides() {
        let weights = ScoringWeights { dust_cap: 5, ..ScoringWeights::default() };
        let config = EngineConfig::default().with_weights(weights);
        assert_eq!(config.weights.dust_cap, 5);
    }
}
