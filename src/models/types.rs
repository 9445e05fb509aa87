//! Type definitions for the wallet risk engine
//!
//! Upstream records (TronGrid / TronScan JSON) are untrusted: every
//! constructor here reads fields defensively and substitutes neutral values
//! instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::errors::AppResult;

// ============================================
// JSON helpers
// ============================================

/// First present, non-null field among `keys`
fn first_field<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// String or number rendered as text; anything else is absent
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer from a JSON number or numeric string
fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Upstream flags arrive as bools, 0/1 or "true"/"false"
pub(crate) fn value_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    }
}

// ============================================
// Transfer records
// ============================================

/// One token movement as reported by the ledger provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub contract_address: String,
    /// Integer amount in the token's smallest unit, unparsed
    pub raw_value: String,
    /// `None` when the upstream value was present but unparseable
    pub decimals: Option<u32>,
    pub timestamp_millis: Option<i64>,
}

impl TransferRecord {
    /// Build a record from one TronGrid/TronScan TRC20 transfer object.
    ///
    /// Accepts both field spellings (`from`/`transfer_from`,
    /// `token_info.address`/`contract_address`, ...). Missing decimals fall
    /// back to `default_decimals`.
    pub fn from_value(item: &Value, default_decimals: u32) -> Self {
        let token_info = item.get("token_info").filter(|v| v.is_object());

        let text = |keys: &[&str]| {
            first_field(item, keys)
                .and_then(value_to_text)
                .unwrap_or_default()
        };

        let contract_address = token_info
            .and_then(|t| first_field(t, &["address"]))
            .or_else(|| first_field(item, &["contract_address"]))
            .and_then(value_to_text)
            .unwrap_or_default();

        let decimals = match token_info
            .and_then(|t| first_field(t, &["decimals"]))
            .or_else(|| first_field(item, &["decimals"]))
        {
            None => Some(default_decimals),
            Some(v) => value_to_i64(v).and_then(|d| u32::try_from(d).ok()),
        };

        let raw_value = first_field(item, &["value"])
            .map(|v| value_to_text(v).unwrap_or_else(|| v.to_string()))
            .unwrap_or_else(|| "0".to_string());

        Self {
            from: text(&["from", "transfer_from"]),
            to: text(&["to", "transfer_to"]),
            contract_address,
            raw_value,
            decimals,
            timestamp_millis: first_field(item, &["block_timestamp", "timestamp"])
                .and_then(value_to_i64),
        }
    }

    /// Parse a provider page: `{"data": [...]}` or a bare list.
    /// Anything else degrades to an empty list.
    pub fn list_from_value(body: &Value, default_decimals: u32) -> Vec<Self> {
        let items = match body {
            Value::Array(items) => items.as_slice(),
            Value::Object(_) => match body.get("data") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };

        items
            .iter()
            .filter(|it| it.is_object())
            .map(|it| Self::from_value(it, default_decimals))
            .collect()
    }

    /// Case-insensitive contract match
    #[inline]
    pub fn is_contract(&self, contract: &str) -> bool {
        self.contract_address.eq_ignore_ascii_case(contract)
    }
}

// ============================================
// Account overview
// ============================================

/// Canonical account metadata extracted from the ledger overview record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOverview {
    /// TRX balance in sun
    pub balance_sun: Option<u64>,
    pub create_time_ms: Option<i64>,
    pub latest_operation_ms: Option<i64>,
}

impl AccountOverview {
    /// Unwrap the overview shape TronGrid happens to return.
    ///
    /// A top-level list yields its first element; `{"data": {...}}` yields the
    /// inner object; `{"data": [x, ...]}` yields `x`; any other object is
    /// taken as-is. Zero timestamps count as absent.
    pub fn from_value(raw: &Value) -> Self {
        static NULL: Value = Value::Null;

        let outer = match raw {
            Value::Array(items) => items.first().unwrap_or(&NULL),
            other => other,
        };

        if !outer.is_object() {
            return Self::default();
        }

        let obj = match outer.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(Value::Array(items)) if !items.is_empty() => &items[0],
            _ => outer,
        };

        let timestamp = |keys: &[&str]| {
            first_field(obj, keys)
                .and_then(value_to_i64)
                .filter(|ts| *ts > 0)
        };

        Self {
            balance_sun: first_field(obj, &["balance"])
                .and_then(value_to_i64)
                .and_then(|b| u64::try_from(b).ok()),
            create_time_ms: timestamp(&["create_time", "createTime"]),
            latest_operation_ms: timestamp(&["latest_opration_time", "latest_operation_time"]),
        }
    }
}

// ============================================
// Compliance signals
// ============================================

/// Account security check as returned by the compliance provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityCheck {
    pub is_blacklisted: bool,
    pub has_fraud_flag: bool,
    /// Untouched provider body kept for audit
    pub raw: Value,
}

impl SecurityCheck {
    pub fn from_value(raw: Value) -> Self {
        Self {
            is_blacklisted: value_truthy(raw.get("is_black_list")),
            has_fraud_flag: value_truthy(raw.get("has_fraud_transaction")),
            raw,
        }
    }
}

/// Stablecoin blacklist evidence lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistEvidence {
    pub total: u64,
    pub raw: Value,
}

impl BlacklistEvidence {
    pub fn from_value(raw: Value) -> Self {
        let total = raw
            .get("total")
            .and_then(value_to_i64)
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(0);
        Self { total, raw }
    }
}

/// Combined per-address compliance signal consumed by the scorer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySignal {
    pub is_blacklisted: bool,
    pub has_fraud_flag: bool,
    pub blacklist_evidence_count: u64,
}

impl SecuritySignal {
    /// Merge the two lookups; a missing side contributes nothing
    pub fn from_parts(check: Option<&SecurityCheck>, evidence: Option<&BlacklistEvidence>) -> Self {
        Self {
            is_blacklisted: check.map(|c| c.is_blacklisted).unwrap_or(false),
            has_fraud_flag: check.map(|c| c.has_fraud_flag).unwrap_or(false),
            blacklist_evidence_count: evidence.map(|e| e.total).unwrap_or(0),
        }
    }

    /// Risky if flagged directly or any blacklist evidence exists
    pub fn is_risky(&self) -> bool {
        self.is_blacklisted || self.has_fraud_flag || self.blacklist_evidence_count > 0
    }
}

/// Outcome of a single upstream lookup.
///
/// Lookups never fail the scoring call; an unavailable outcome carries the
/// reason for logging and is treated as "no signal".
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<T> {
    Available(T),
    Unavailable(String),
}

impl<T> LookupOutcome<T> {
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

// ============================================
// Dust
// ============================================

/// Dust-tier activity for one wallet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustCounters {
    pub micro_in: u32,
    pub micro_out: u32,
    pub small_in: u32,
    pub small_out: u32,
    pub unique_sources: u32,
    pub unique_dests: u32,
}

impl DustCounters {
    pub fn inbound(&self) -> u32 {
        self.micro_in + self.small_in
    }

    pub fn outbound(&self) -> u32 {
        self.micro_out + self.small_out
    }

    pub fn total_events(&self) -> u32 {
        self.inbound() + self.outbound()
    }
}

// ============================================
// Scoring output
// ============================================

/// Three-tier risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    BlacklistUsdt,
    FraudFlag,
    BlacklistUsdtEvidence,
    CounterpartyHigh,
    DustActivity,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::BlacklistUsdt => "BLACKLIST_USDT",
            ReasonCode::FraudFlag => "FRAUD_FLAG",
            ReasonCode::BlacklistUsdtEvidence => "BLACKLIST_USDT_EVIDENCE",
            ReasonCode::CounterpartyHigh => "COUNTERPARTY_HIGH",
            ReasonCode::DustActivity => "DUST_ACTIVITY",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scoring contribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    /// Points applied by this rule, after caps
    pub weight: u32,
    pub detail: String,
}

/// Exposure categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureCategory {
    #[serde(rename = "Blacklist Indirect In")]
    BlacklistIndirectIn,
    #[serde(rename = "Blacklist Indirect Out")]
    BlacklistIndirectOut,
    #[serde(rename = "Dust In (USDT)")]
    DustIn,
    #[serde(rename = "Dust Out (USDT)")]
    DustOut,
    #[serde(rename = "DEX")]
    Dex,
    #[serde(rename = "Exchange")]
    Exchange,
}

impl ExposureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExposureCategory::BlacklistIndirectIn => "Blacklist Indirect In",
            ExposureCategory::BlacklistIndirectOut => "Blacklist Indirect Out",
            ExposureCategory::DustIn => "Dust In (USDT)",
            ExposureCategory::DustOut => "Dust Out (USDT)",
            ExposureCategory::Dex => "DEX",
            ExposureCategory::Exchange => "Exchange",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureEntry {
    pub category: ExposureCategory,
    /// Percentage of classified events, one decimal place
    pub share: f64,
}

/// Account info and formatted activity figures shown in the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub balance_sun: Option<u64>,
    pub created_at: Option<String>,
    pub last_operation_at: Option<String>,
    pub inflow_usdt: String,
    pub outflow_usdt: String,
    pub first_transfer: Option<String>,
    pub last_transfer: Option<String>,
    pub dust_in_events: u32,
    pub dust_out_events: u32,
    pub dust_total: u32,
    pub dust_unique_sources: u32,
    pub dust_unique_dests: u32,
}

/// Raw compliance responses retained for audit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub tronscan_security: Value,
    pub tronscan_blacklist: Value,
    /// Lookups that could not be completed, with their error
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<String>,
}

/// Final result of one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub address: String,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub reasons: Vec<Reason>,
    pub summary: String,
    pub basic_info: BasicInfo,
    pub evidence: Evidence,
    pub exposure: Vec<ExposureEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transfer_from_trongrid_shape() {
        let item = json!({
            "from": "TFrom",
            "to": "TTo",
            "value": "1500000",
            "block_timestamp": 1700000000000i64,
            "token_info": { "address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "decimals": 6 }
        });
        let rec = TransferRecord::from_value(&item, 6);
        assert_eq!(rec.from, "TFrom");
        assert_eq!(rec.to, "TTo");
        assert_eq!(rec.raw_value, "1500000");
        assert_eq!(rec.decimals, Some(6));
        assert_eq!(rec.timestamp_millis, Some(1_700_000_000_000));
        assert!(rec.is_contract("tr7nhqjekqxgtci8q8zy4pl8otszgjlj6t"));
    }

    #[test]
    fn test_transfer_alternate_fields_and_defaults() {
        let item = json!({
            "transfer_from": " TA ",
            "transfer_to": "TB",
            "contract_address": "TC",
            "value": 42,
            "timestamp": "1700000000000"
        });
        let rec = TransferRecord::from_value(&item, 6);
        assert_eq!(rec.from, "TA");
        assert_eq!(rec.contract_address, "TC");
        assert_eq!(rec.raw_value, "42");
        assert_eq!(rec.decimals, Some(6));
        assert_eq!(rec.timestamp_millis, Some(1_700_000_000_000));
    }

    #[test]
    fn test_transfer_malformed_decimals_and_timestamp() {
        let item = json!({ "value": "10", "decimals": "six", "timestamp": "yesterday" });
        let rec = TransferRecord::from_value(&item, 6);
        assert_eq!(rec.decimals, None);
        assert_eq!(rec.timestamp_millis, None);
        assert_eq!(rec.from, "");
    }

    #[test]
    fn test_transfer_list_degrades_to_empty() {
        assert!(TransferRecord::list_from_value(&json!({"data": "oops"}), 6).is_empty());
        assert!(TransferRecord::list_from_value(&json!(null), 6).is_empty());
        let page = json!({"data": [{"value": "1"}, 7, {"value": "2"}]});
        assert_eq!(TransferRecord::list_from_value(&page, 6).len(), 2);
    }

    #[test]
    fn test_overview_unwrap_shapes() {
        let flat = json!({"balance": 5, "create_time": 1000, "latest_opration_time": 2000});
        let wrapped_obj = json!({"data": {"balance": 5, "createTime": 1000, "latest_operation_time": 2000}});
        let wrapped_list = json!({"data": [{"balance": 5, "create_time": 1000, "latest_operation_time": 2000}], "success": true});
        let top_list = json!([{"balance": 5, "create_time": 1000, "latest_opration_time": 2000}]);

        let expected = AccountOverview {
            balance_sun: Some(5),
            create_time_ms: Some(1000),
            latest_operation_ms: Some(2000),
        };
        for raw in [flat, wrapped_obj, wrapped_list, top_list] {
            assert_eq!(AccountOverview::from_value(&raw), expected);
        }
    }

    #[test]
    fn test_overview_empty_and_garbage() {
        assert_eq!(AccountOverview::from_value(&json!({"data": []})), AccountOverview::default());
        assert_eq!(AccountOverview::from_value(&json!("nope")), AccountOverview::default());
        assert_eq!(
            AccountOverview::from_value(&json!({"create_time": 0})).create_time_ms,
            None
        );
    }

    #[test]
    fn test_security_signal_merge() {
        let check = SecurityCheck::from_value(json!({"is_black_list": true, "has_fraud_transaction": "false"}));
        let evidence = BlacklistEvidence::from_value(json!({"total": "2"}));
        let signal = SecuritySignal::from_parts(Some(&check), Some(&evidence));
        assert!(signal.is_blacklisted);
        assert!(!signal.has_fraud_flag);
        assert_eq!(signal.blacklist_evidence_count, 2);
        assert!(signal.is_risky());
        assert!(!SecuritySignal::from_parts(None, None).is_risky());
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_value(ReasonCode::BlacklistUsdtEvidence).unwrap(), json!("BLACKLIST_USDT_EVIDENCE"));
        assert_eq!(serde_json::to_value(RiskLevel::Medium).unwrap(), json!("Medium"));
        assert_eq!(serde_json::to_value(ExposureCategory::DustOut).unwrap(), json!("Dust Out (USDT)"));
    }
}
