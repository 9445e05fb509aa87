//! Flow Aggregator
//!
//! Sums inbound/outbound value of one token contract for a wallet and tracks
//! the first/last observed transfer timestamps across all contracts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalizer::transfer_amount;
use crate::models::types::TransferRecord;

/// Token flow totals and activity window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTotals {
    pub inflow: Decimal,
    pub outflow: Decimal,
    /// Earliest transfer timestamp (ms), any contract
    pub first_seen: Option<i64>,
    /// Latest transfer timestamp (ms), any contract
    pub last_seen: Option<i64>,
}

/// Aggregate flows for `subject` over `transfers`.
///
/// Order independent: a pure reduction over the list.
pub fn aggregate_flows(
    transfers: &[TransferRecord],
    subject: &str,
    contract_filter: &str,
    max_amount: Decimal,
) -> FlowTotals {
    transfers.iter().fold(FlowTotals::default(), |mut totals, record| {
        if let Some(ts) = record.timestamp_millis {
            totals.first_seen = Some(totals.first_seen.map_or(ts, |first| first.min(ts)));
            totals.last_seen = Some(totals.last_seen.map_or(ts, |last| last.max(ts)));
        }

        if !record.is_contract(contract_filter) {
            return totals;
        }

        let amount = transfer_amount(record, max_amount);
        if amount.is_zero() {
            return totals;
        }

        // A self-transfer counts both ways
        if record.to == subject {
            totals.inflow += amount;
        }
        if record.from == subject {
            totals.outflow += amount;
        }

        totals
    })
}
