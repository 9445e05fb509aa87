//! Dust Classifier
//!
//! Buckets token transfers into micro/small dust tiers per direction and
//! counts the distinct counterparties involved.

use rust_decimal::Decimal;
use std::collections::HashSet;

use super::normalizer::transfer_amount;
use crate::models::config::DustThresholds;
use crate::models::types::{DustCounters, TransferRecord};

#[derive(Clone, Copy)]
enum Tier {
    Micro,
    Small,
}

/// Classify dust activity of `subject`.
///
/// Only transfers of `contract_filter` with a non-zero normalized amount are
/// considered. `amount <= micro` is micro, `micro < amount <= small` is
/// small, larger amounts are not dust.
pub fn classify_dust(
    transfers: &[TransferRecord],
    subject: &str,
    contract_filter: &str,
    thresholds: &DustThresholds,
    max_amount: Decimal,
) -> DustCounters {
    let mut counters = DustCounters::default();
    let mut sources: HashSet<&str> = HashSet::new();
    let mut dests: HashSet<&str> = HashSet::new();

    for record in transfers.iter().filter(|r| r.is_contract(contract_filter)) {
        let amount = transfer_amount(record, max_amount);
        if amount.is_zero() {
            continue;
        }

        let tier = if amount <= thresholds.micro {
            Tier::Micro
        } else if amount <= thresholds.small {
            Tier::Small
        } else {
            continue;
        };

        if record.to == subject {
            match tier {
                Tier::Micro => counters.micro_in += 1,
                Tier::Small => counters.small_in += 1,
            }
            sources.insert(record.from.as_str());
        }
        if record.from == subject {
            match tier {
                Tier::Micro => counters.micro_out += 1,
                Tier::Small => counters.small_out += 1,
            }
            dests.insert(record.to.as_str());
        }
    }

    counters.unique_sources = sources.len() as u32;
    counters.unique_dests = dests.len() as u32;
    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::MAX_EVENT_AMOUNT;

    const ME: &str = "TSubject";
    const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    fn transfer(from: &str, to: &str, raw: &str) -> TransferRecord {
        TransferRecord {
            from: from.to_string(),
            to: to.to_string(),
            contract_address: USDT.to_string(),
            raw_value: raw.to_string(),
            decimals: Some(6),
            timestamp_millis: None,
        }
    }

    fn classify(transfers: &[TransferRecord]) -> DustCounters {
        classify_dust(
            transfers,
            ME,
            USDT,
            &DustThresholds::default(),
            Decimal::from(MAX_EVENT_AMOUNT),
        )
    }

    #[test]
    fn test_tier_boundaries() {
        let counters = classify(&[
            transfer("TA", ME, "100000"),  // 0.1 exactly: micro
            transfer("TB", ME, "100001"),  // just above micro: small
            transfer("TC", ME, "1000000"), // 1.0 exactly: small
            transfer("TD", ME, "1000001"), // above small: not dust
        ]);
        assert_eq!(counters.micro_in, 1);
        assert_eq!(counters.small_in, 2);
        assert_eq!(counters.unique_sources, 3);
        assert_eq!(counters.total_events(), 3);
    }

    #[test]
    fn test_directions_and_unique_counterparties() {
        let counters = classify(&[
            transfer("TA", ME, "1"),
            transfer("TA", ME, "500000"),
            transfer("TB", ME, "2"),
            transfer(ME, "TX", "3"),
            transfer(ME, "TX", "900000"),
        ]);
        assert_eq!(counters.micro_in, 2);
        assert_eq!(counters.small_in, 1);
        assert_eq!(counters.micro_out, 1);
        assert_eq!(counters.small_out, 1);
        assert_eq!(counters.unique_sources, 2);
        assert_eq!(counters.unique_dests, 1);
        assert_eq!(counters.inbound(), 3);
        assert_eq!(counters.outbound(), 2);
    }

    #[test]
    fn test_ignores_zero_and_other_contracts() {
        let mut other = transfer("TA", ME, "5");
        other.contract_address = "TOther".to_string();
        let counters = classify(&[
            other,
            transfer("TB", ME, "0"),
            transfer("TC", ME, "garbage"),
        ]);
        assert_eq!(counters, DustCounters::default());
    }

    #[test]
    fn test_self_transfer_counts_both_directions() {
        let counters = classify(&[transfer(ME, ME, "50000")]);
        assert_eq!(counters.micro_in, 1);
        assert_eq!(counters.micro_out, 1);
        assert_eq!(counters.unique_sources, 1);
        assert_eq!(counters.unique_dests, 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = DustThresholds {
            micro: Decimal::new(5, 0),
            small: Decimal::new(10, 0),
            min_events: 1,
        };
        let counters = classify_dust(
            &[transfer("TA", ME, "5000000"), transfer("TA", ME, "7000000")],
            ME,
            USDT,
            &thresholds,
            Decimal::from(MAX_EVENT_AMOUNT),
        );
        assert_eq!(counters.micro_in, 1);
        assert_eq!(counters.small_in, 1);
    }
}
