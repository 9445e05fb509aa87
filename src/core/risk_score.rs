//! Risk Scoring Module
//! Combines weighted compliance and behaviour signals into a 0-100 score
//!
//! Every applied rule leaves a `Reason` behind, so the score can always be
//! explained by summing (or maxing) the reasons list.

use serde::{Deserialize, Serialize};

use crate::models::config::{DustThresholds, ScoringWeights};
use crate::models::types::{DustCounters, Reason, ReasonCode, RiskLevel, SecuritySignal};
use crate::utils::constants::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// Upper bound of the score scale
pub const MAX_SCORE: u32 = 100;

impl RiskLevel {
    /// Fixed thresholds: 70+ High, 30+ Medium, else Low
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Score, level and the rules that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Clamped to 0-100
    pub score: u32,
    pub level: RiskLevel,
    /// In evaluation order
    pub reasons: Vec<Reason>,
}

/// Builder for creating risk scores from collected signals.
///
/// Rules are applied in call order; call them in the order the engine does
/// (direct blacklist, fraud, evidence, counterparties, dust) to keep the
/// reasons list stable.
pub struct RiskScoreBuilder<'a> {
    weights: &'a ScoringWeights,
    score: u32,
    reasons: Vec<Reason>,
}

impl<'a> RiskScoreBuilder<'a> {
    pub fn new(weights: &'a ScoringWeights) -> Self {
        Self {
            weights,
            score: 0,
            reasons: Vec::new(),
        }
    }

    /// Apply all subject-level compliance rules from one signal
    pub fn with_security_signal(self, signal: &SecuritySignal) -> Self {
        self.with_direct_blacklist(signal.is_blacklisted)
            .with_fraud_flag(signal.has_fraud_flag)
            .with_blacklist_evidence(signal.blacklist_evidence_count)
    }

    /// Directly blacklisted wallets are floored at the blacklist weight
    pub fn with_direct_blacklist(mut self, is_blacklisted: bool) -> Self {
        if is_blacklisted {
            self.score = self.score.max(self.weights.blacklist);
            self.reasons.push(Reason {
                code: ReasonCode::BlacklistUsdt,
                weight: self.weights.blacklist,
                detail: "TronScan security check: is_black_list=true".to_string(),
            });
        }
        self
    }

    pub fn with_fraud_flag(mut self, has_fraud_flag: bool) -> Self {
        if has_fraud_flag {
            self.score = self.score.saturating_add(self.weights.fraud);
            self.reasons.push(Reason {
                code: ReasonCode::FraudFlag,
                weight: self.weights.fraud,
                detail: "TronScan security check: has_fraud_transaction=true".to_string(),
            });
        }
        self
    }

    /// Stablecoin blacklist evidence; ignored when the direct flag already fired
    pub fn with_blacklist_evidence(mut self, evidence_count: u64) -> Self {
        if evidence_count > 0 && !self.has(ReasonCode::BlacklistUsdt) {
            self.score = self.score.max(self.weights.blacklist);
            self.reasons.push(Reason {
                code: ReasonCode::BlacklistUsdtEvidence,
                weight: self.weights.blacklist,
                detail: format!("Stablecoin blacklist reported {} matching record(s)", evidence_count),
            });
        }
        self
    }

    /// One-hop counterparties flagged risky
    pub fn with_counterparty_hits(mut self, hits: usize) -> Self {
        if hits > 0 {
            let hits_u32 = u32::try_from(hits).unwrap_or(u32::MAX);
            let addend = hits_u32
                .saturating_mul(self.weights.counterparty_hit)
                .min(self.weights.counterparty_cap);
            self.score = self.score.saturating_add(addend);
            self.reasons.push(Reason {
                code: ReasonCode::CounterpartyHigh,
                weight: addend,
                detail: format!("{} one-hop counterparties with risk signals", hits),
            });
        }
        self
    }

    /// Dust activity once the event count reaches the configured minimum
    pub fn with_dust_activity(mut self, dust: &DustCounters, thresholds: &DustThresholds) -> Self {
        let events = dust.total_events();
        if events >= thresholds.min_events {
            let extra = events - thresholds.min_events;
            let addend = self
                .weights
                .dust_base
                .saturating_add(extra.saturating_mul(self.weights.dust_per_event))
                .min(self.weights.dust_cap);
            self.score = self.score.saturating_add(addend);
            self.reasons.push(Reason {
                code: ReasonCode::DustActivity,
                weight: addend,
                detail: format!(
                    "{} USDT dust events (micro<=${}, small<=${}) in:{} out:{} unique_sources:{} unique_dests:{}",
                    events,
                    thresholds.micro.normalize(),
                    thresholds.small.normalize(),
                    dust.inbound(),
                    dust.outbound(),
                    dust.unique_sources,
                    dust.unique_dests,
                ),
            });
        }
        self
    }

    fn has(&self, code: ReasonCode) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }

    /// Build final risk score
    pub fn build(self) -> ScoreResult {
        let score = self.score.min(MAX_SCORE);
        ScoreResult {
            score,
            level: RiskLevel::from_score(score),
            reasons: self.reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dust(micro_in: u32, small_in: u32, micro_out: u32, small_out: u32) -> DustCounters {
        DustCounters {
            micro_in,
            small_in,
            micro_out,
            small_out,
            unique_sources: 1,
            unique_dests: 1,
        }
    }

    fn codes(result: &ScoreResult) -> Vec<ReasonCode> {
        result.reasons.iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_clean_wallet() {
        let weights = ScoringWeights::default();
        let result = RiskScoreBuilder::new(&weights)
            .with_security_signal(&SecuritySignal::default())
            .with_counterparty_hits(0)
            .with_dust_activity(&DustCounters::default(), &DustThresholds::default())
            .build();

        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Low);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_direct_blacklist_only() {
        let weights = ScoringWeights::default();
        let result = RiskScoreBuilder::new(&weights)
            .with_direct_blacklist(true)
            .build();

        assert_eq!(result.score, weights.blacklist);
        assert_eq!(codes(&result), vec![ReasonCode::BlacklistUsdt]);
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn test_evidence_suppressed_by_direct_flag() {
        let weights = ScoringWeights::default();
        let signal = SecuritySignal {
            is_blacklisted: true,
            has_fraud_flag: false,
            blacklist_evidence_count: 3,
        };
        let result = RiskScoreBuilder::new(&weights).with_security_signal(&signal).build();
        assert_eq!(codes(&result), vec![ReasonCode::BlacklistUsdt]);

        let signal = SecuritySignal { is_blacklisted: false, ..signal };
        let result = RiskScoreBuilder::new(&weights).with_security_signal(&signal).build();
        assert_eq!(codes(&result), vec![ReasonCode::BlacklistUsdtEvidence]);
        assert_eq!(result.reasons[0].weight, weights.blacklist);
        assert_eq!(result.score, weights.blacklist);
    }

    #[test]
    fn test_dust_weight_example() {
        // 3 in + 2 out => 10 + (5 - 3) * 2 = 14
        let weights = ScoringWeights::default();
        let result = RiskScoreBuilder::new(&weights)
            .with_dust_activity(&dust(2, 1, 1, 1), &DustThresholds::default())
            .build();

        assert_eq!(codes(&result), vec![ReasonCode::DustActivity]);
        assert_eq!(result.reasons[0].weight, 14);
        assert_eq!(result.score, 14);
        assert!(result.reasons[0].detail.starts_with("5 USDT dust events"));
    }

    #[test]
    fn test_dust_below_minimum() {
        let weights = ScoringWeights::default();
        let result = RiskScoreBuilder::new(&weights)
            .with_dust_activity(&dust(1, 0, 1, 0), &DustThresholds::default())
            .build();
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_caps() {
        let weights = ScoringWeights::default();
        let result = RiskScoreBuilder::new(&weights)
            .with_counterparty_hits(50)
            .with_dust_activity(&dust(100, 100, 100, 100), &DustThresholds::default())
            .build();

        assert_eq!(result.reasons[0].weight, weights.counterparty_cap);
        assert_eq!(result.reasons[1].weight, weights.dust_cap);
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_clamped_to_100_and_ordered() {
        let weights = ScoringWeights::default();
        let signal = SecuritySignal {
            is_blacklisted: true,
            has_fraud_flag: true,
            blacklist_evidence_count: 1,
        };
        let result = RiskScoreBuilder::new(&weights)
            .with_security_signal(&signal)
            .with_counterparty_hits(2)
            .with_dust_activity(&dust(3, 0, 0, 0), &DustThresholds::default())
            .build();

        assert_eq!(result.score, MAX_SCORE);
        assert_eq!(
            codes(&result),
            vec![
                ReasonCode::BlacklistUsdt,
                ReasonCode::FraudFlag,
                ReasonCode::CounterpartyHigh,
                ReasonCode::DustActivity,
            ]
        );
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_dust_score_monotonic_then_capped() {
        let weights = ScoringWeights::default();
        let thresholds = DustThresholds::default();
        let mut previous = 0;
        for events in 0..=20 {
            let result = RiskScoreBuilder::new(&weights)
                .with_dust_activity(&dust(events, 0, 0, 0), &thresholds)
                .build();
            assert!(result.score >= previous, "score dropped at {} events", events);
            previous = result.score;

            let uncapped = events
                .checked_sub(thresholds.min_events)
                .map(|extra| weights.dust_base + extra * weights.dust_per_event);
            match uncapped {
                None => assert!(result.reasons.is_empty()),
                Some(raw) if raw >= weights.dust_cap => {
                    assert_eq!(result.reasons[0].weight, weights.dust_cap, "{} events", events)
                }
                Some(raw) => assert_eq!(result.reasons[0].weight, raw),
            }
        }
        // 10 + (13 - 3) * 2 reaches the cap
        assert_eq!(previous, weights.dust_cap);
    }

    #[test]
    fn test_more_hits_never_lower_score() {
        let weights = ScoringWeights::default();
        let mut previous = 0;
        for hits in 0..10 {
            let score = RiskScoreBuilder::new(&weights)
                .with_fraud_flag(true)
                .with_counterparty_hits(hits)
                .build()
                .score;
            assert!(score >= previous);
            previous = score;
        }
    }
}
