//! Report Assembler
//!
//! Pure composition of scoring output, flow totals and account metadata into
//! the final `RiskReport`. No I/O.

use std::collections::BTreeSet;

use super::flows::FlowTotals;
use super::risk_score::ScoreResult;
use crate::models::types::{
    AccountOverview, BasicInfo, DustCounters, Evidence, ExposureCategory, ExposureEntry, Reason, RiskLevel,
    RiskReport,
};
use crate::utils::format::{format_amount, format_timestamp};

pub const NO_SIGNALS_SUMMARY: &str = "No risk signals were detected in the basic checks.";

/// Event counts feeding the exposure breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposureCounts {
    pub blacklist_in: u64,
    pub blacklist_out: u64,
    pub dust_in: u64,
    pub dust_out: u64,
    pub dex: u64,
    pub exchange: u64,
}

impl ExposureCounts {
    fn ordered(&self) -> [(ExposureCategory, u64); 6] {
        [
            (ExposureCategory::BlacklistIndirectIn, self.blacklist_in),
            (ExposureCategory::BlacklistIndirectOut, self.blacklist_out),
            (ExposureCategory::DustIn, self.dust_in),
            (ExposureCategory::DustOut, self.dust_out),
            (ExposureCategory::Dex, self.dex),
            (ExposureCategory::Exchange, self.exchange),
        ]
    }
}

/// One-line summary: level plus the sorted distinct reason codes
pub fn build_summary(level: RiskLevel, reasons: &[Reason]) -> String {
    if reasons.is_empty() {
        return NO_SIGNALS_SUMMARY.to_string();
    }

    let codes: BTreeSet<&'static str> = reasons.iter().map(|r| r.code.as_str()).collect();
    format!(
        "Level {}. Main signals: {}.",
        level,
        codes.into_iter().collect::<Vec<_>>().join(", ")
    )
}

/// `numerator / denominator` rounded to the nearest integer, ties to even
fn tenths_half_even(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let twice_rem = 2 * (numerator % denominator);
    if twice_rem > denominator || (twice_rem == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Percentage share per non-zero category, one decimal place.
///
/// Shares are computed in integer tenths, rounded half to even. Should
/// rounding push the total past 100.0, the entries rounded up the most give
/// back 0.1 each until it fits; a tie rounded up always goes first.
pub fn exposure_breakdown(counts: &ExposureCounts) -> Vec<ExposureEntry> {
    let present: Vec<(ExposureCategory, u64)> = counts.ordered().into_iter().filter(|(_, c)| *c > 0).collect();
    if present.is_empty() {
        return Vec::new();
    }

    let total: u128 = present.iter().map(|(_, c)| *c as u128).sum::<u128>().max(1);

    // (category, tenths, rounding excess scaled by total)
    let mut shares: Vec<(ExposureCategory, u128, i128)> = present
        .iter()
        .map(|(category, count)| {
            let count = *count as u128;
            let tenths = tenths_half_even(1000 * count, total);
            let excess = (tenths * total) as i128 - (1000 * count) as i128;
            (*category, tenths, excess)
        })
        .collect();

    let mut sum: u128 = shares.iter().map(|(_, t, _)| *t).sum();
    while sum > 1000 {
        let Some(idx) = shares
            .iter()
            .enumerate()
            .filter(|(_, (_, tenths, _))| *tenths > 0)
            .max_by(|(ia, a), (ib, b)| a.2.cmp(&b.2).then(ib.cmp(ia)))
            .map(|(i, _)| i)
        else {
            break;
        };
        shares[idx].1 -= 1;
        shares[idx].2 -= total as i128;
        sum -= 1;
    }

    shares
        .into_iter()
        .map(|(category, tenths, _)| ExposureEntry {
            category,
            share: tenths as f64 / 10.0,
        })
        .collect()
}

/// Account metadata merged with formatted flow and dust figures
pub fn build_basic_info(overview: &AccountOverview, flows: &FlowTotals, dust: &DustCounters) -> BasicInfo {
    BasicInfo {
        balance_sun: overview.balance_sun,
        created_at: overview.create_time_ms.and_then(format_timestamp),
        last_operation_at: overview.latest_operation_ms.and_then(format_timestamp),
        inflow_usdt: format_amount(flows.inflow),
        outflow_usdt: format_amount(flows.outflow),
        first_transfer: flows.first_seen.and_then(format_timestamp),
        last_transfer: flows.last_seen.and_then(format_timestamp),
        dust_in_events: dust.inbound(),
        dust_out_events: dust.outbound(),
        dust_total: dust.total_events(),
        dust_unique_sources: dust.unique_sources,
        dust_unique_dests: dust.unique_dests,
    }
}

/// Compose the final report
pub fn assemble(
    address: &str,
    result: ScoreResult,
    flows: &FlowTotals,
    dust: &DustCounters,
    overview: &AccountOverview,
    exposure: &ExposureCounts,
    evidence: Evidence,
) -> RiskReport {
    RiskReport {
        address: address.to_string(),
        risk_score: result.score,
        risk_level: result.level,
        summary: build_summary(result.level, &result.reasons),
        reasons: result.reasons,
        basic_info: build_basic_info(overview, flows, dust),
        evidence,
        exposure: exposure_breakdown(exposure),
    }
}
