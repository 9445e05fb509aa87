//! Constants Module - Single Source of Truth
//!
//! Upstream endpoints, token identifiers and default tuning values.
//! Other modules read defaults from here instead of hardcoding them.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "TronRisk";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for upstream HTTP requests
pub const USER_AGENT: &str = concat!("TronRisk/", env!("CARGO_PKG_VERSION"));

// ============================================
// UPSTREAM PROVIDERS
// ============================================

/// TronGrid REST base (ledger data)
pub const TRONGRID_BASE_URL: &str = "https://api.trongrid.io";

/// TronScan API base (compliance data)
pub const TRONSCAN_BASE_URL: &str = "https://apilist.tronscanapi.com";

/// Header carrying the TronScan / TronGrid API key
pub const TRON_API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Default timeout for upstream requests (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Transport retries on HTTP 429 / 5xx
pub const PROVIDER_MAX_RETRIES: u32 = 3;

/// First backoff step; doubles per attempt
pub const PROVIDER_BASE_RETRY_MS: u64 = 250;

/// Backoff ceiling
pub const PROVIDER_MAX_RETRY_MS: u64 = 4_000;

/// Jitter applied to each backoff step (percent, +/-)
pub const RETRY_JITTER_PERCENT: u64 = 20;

// ============================================
// TOKENS
// ============================================

/// Official USDT TRC20 contract
pub const USDT_TRC20_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Decimals assumed when a transfer record carries none
pub const DEFAULT_TOKEN_DECIMALS: u32 = 6;

/// Per-event sanity bound for normalized amounts (10^12)
pub const MAX_EVENT_AMOUNT: u64 = 1_000_000_000_000;

/// Transfers fetched per scoring call
pub const DEFAULT_TRANSFER_LIMIT: u32 = 200;

// ============================================
// ENGINE DEFAULTS
// ============================================

pub const DEFAULT_WEIGHT_BLACKLIST: u32 = 80;
pub const DEFAULT_WEIGHT_FRAUD: u32 = 30;
pub const DEFAULT_WEIGHT_COUNTERPARTY_HIT: u32 = 10;
pub const DEFAULT_WEIGHT_COUNTERPARTY_CAP: u32 = 30;
pub const DEFAULT_WEIGHT_DUST_BASE: u32 = 10;
pub const DEFAULT_WEIGHT_DUST_PER_EVENT: u32 = 2;
pub const DEFAULT_WEIGHT_DUST_CAP: u32 = 30;

/// Micro dust ceiling in USDT (inclusive)
pub const DEFAULT_DUST_MICRO: &str = "0.1";

/// Small dust ceiling in USDT (inclusive)
pub const DEFAULT_DUST_SMALL: &str = "1.0";

pub const DEFAULT_DUST_MIN_EVENTS: u32 = 3;

/// Parallel counterparty lookups
pub const DEFAULT_COUNTERPARTY_CONCURRENCY: usize = 8;

/// Per-counterparty lookup timeout (seconds)
pub const DEFAULT_COUNTERPARTY_TIMEOUT_SECS: u64 = 20;

/// Score at or above which a wallet is `High`
pub const HIGH_RISK_THRESHOLD: u32 = 70;

/// Score at or above which a wallet is `Medium`
pub const MEDIUM_RISK_THRESHOLD: u32 = 30;

// ============================================
// SERVER
// ============================================

pub const DEFAULT_PORT: u16 = 8080;

/// Snapshot lifetime for `/risk` results reused by `/report` (minutes)
pub const DEFAULT_SNAPSHOT_TTL_MINUTES: u64 = 120;

/// Interval of the expired-snapshot sweeper (seconds)
pub const SNAPSHOT_CLEANUP_INTERVAL_SECS: u64 = 60;

// ============================================
// TRON ADDRESS FORMAT
// ============================================

/// Mainnet address version byte
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// Version byte + 20-byte account id
pub const TRON_ADDRESS_BODY_LEN: usize = 21;

/// Base58Check checksum length
pub const TRON_CHECKSUM_LEN: usize = 4;

/// Parse a comma-separated address list (env style), skipping blanks
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
