//! Wallet Scoring Engine
//!
//! Orchestrates one scoring call: subject compliance lookups, ledger fetches,
//! flow and dust analysis, counterparty resolution, scoring and assembly.
//!
//! The engine is total. Upstream failures degrade to "no signal", an empty
//! transfer list or an empty overview, and are recorded in the evidence.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::counterparty::{extract_counterparties, resolve_counterparties};
use super::dust::classify_dust;
use super::flows::aggregate_flows;
use super::report::{assemble, ExposureCounts};
use super::risk_score::RiskScoreBuilder;
use crate::models::config::EngineConfig;
use crate::models::types::{
    AccountOverview, BlacklistEvidence, Evidence, LookupOutcome, RiskReport, SecurityCheck, SecuritySignal,
    TransferRecord,
};
use crate::providers::{ComplianceSource, LedgerSource};

/// Subject-level compliance lookups
#[derive(Debug, Clone)]
pub struct SubjectLookups {
    pub security: LookupOutcome<SecurityCheck>,
    pub evidence: LookupOutcome<BlacklistEvidence>,
}

impl SubjectLookups {
    pub fn signal(&self) -> SecuritySignal {
        SecuritySignal::from_parts(self.security.available(), self.evidence.available())
    }

    fn to_evidence(&self) -> Evidence {
        let mut unavailable = Vec::new();

        let tronscan_security = match &self.security {
            LookupOutcome::Available(check) => check.raw.clone(),
            LookupOutcome::Unavailable(reason) => {
                unavailable.push(format!("security: {}", reason));
                json!({})
            }
        };
        let tronscan_blacklist = match &self.evidence {
            LookupOutcome::Available(evidence) => evidence.raw.clone(),
            LookupOutcome::Unavailable(reason) => {
                unavailable.push(format!("blacklist: {}", reason));
                json!({})
            }
        };

        Evidence {
            tronscan_security,
            tronscan_blacklist,
            unavailable,
        }
    }
}

/// Scores TRON wallets against a ledger and a compliance source
#[derive(Clone)]
pub struct WalletScorer {
    config: Arc<EngineConfig>,
    ledger: Arc<dyn LedgerSource>,
    compliance: Arc<dyn ComplianceSource>,
}

impl WalletScorer {
    pub fn new(
        config: Arc<EngineConfig>,
        ledger: Arc<dyn LedgerSource>,
        compliance: Arc<dyn ComplianceSource>,
    ) -> Self {
        Self {
            config,
            ledger,
            compliance,
        }
    }

    /// Full scoring call for one address. Never fails.
    pub async fn score_wallet(&self, address: &str) -> RiskReport {
        let start = Instant::now();
        info!("🔍 Scoring wallet {}", address);

        let (security, evidence, overview, transfers) = tokio::join!(
            self.compliance.fetch_security_signal(address),
            self.compliance.fetch_blacklist_evidence(address),
            self.ledger.fetch_account_overview(address),
            self.ledger.fetch_token_transfers(address, self.config.transfer_limit),
        );

        let subject = SubjectLookups {
            security: LookupOutcome::from_result(security),
            evidence: LookupOutcome::from_result(evidence),
        };
        if let LookupOutcome::Unavailable(reason) = &subject.security {
            warn!("⚠️ Security check unavailable for {}: {}", address, reason);
        }
        if let LookupOutcome::Unavailable(reason) = &subject.evidence {
            warn!("⚠️ Blacklist evidence unavailable for {}: {}", address, reason);
        }

        let overview = overview.unwrap_or_else(|e| {
            warn!("⚠️ Account overview unavailable for {}: {}", address, e);
            json!({})
        });
        let transfers = transfers.unwrap_or_else(|e| {
            warn!("⚠️ Transfer history unavailable for {}: {}", address, e);
            Vec::new()
        });

        let report = self.score_records(address, &subject, &overview, &transfers).await;

        info!(
            "✅ Scored {} => {} ({}) in {:.1}ms, {} transfers",
            address,
            report.risk_score,
            report.risk_level,
            start.elapsed().as_secs_f64() * 1000.0,
            transfers.len()
        );

        report
    }

    /// Score already-fetched subject data.
    ///
    /// Only counterparty lookups touch the compliance source from here on.
    pub async fn score_records(
        &self,
        address: &str,
        subject: &SubjectLookups,
        overview_raw: &Value,
        transfers: &[TransferRecord],
    ) -> RiskReport {
        let cfg = &self.config;

        let flows = aggregate_flows(transfers, address, &cfg.token_contract, cfg.max_event_amount);
        let dust = classify_dust(transfers, address, &cfg.token_contract, &cfg.dust, cfg.max_event_amount);

        let parties = extract_counterparties(transfers, address);
        let risk = resolve_counterparties(
            self.compliance.as_ref(),
            &parties,
            cfg.counterparty_concurrency,
            cfg.counterparty_timeout,
        )
        .await;

        let everyone = parties.all();
        let dex = everyone.iter().filter(|a| cfg.dex_addresses.contains(*a)).count();
        let exchange = everyone.iter().filter(|a| cfg.exchange_addresses.contains(*a)).count();

        debug!(
            address,
            inbound = parties.inbound.len(),
            outbound = parties.outbound.len(),
            risky_in = risk.risky_in.len(),
            risky_out = risk.risky_out.len(),
            dust_events = dust.total_events(),
            dex,
            exchange,
            "Signals collected"
        );

        let result = RiskScoreBuilder::new(&cfg.weights)
            .with_security_signal(&subject.signal())
            .with_counterparty_hits(risk.hits())
            .with_dust_activity(&dust, &cfg.dust)
            .build();

        let exposure = ExposureCounts {
            blacklist_in: risk.risky_in.len() as u64,
            blacklist_out: risk.risky_out.len() as u64,
            dust_in: dust.inbound() as u64,
            dust_out: dust.outbound() as u64,
            dex: dex as u64,
            exchange: exchange as u64,
        };

        assemble(
            address,
            result,
            &flows,
            &dust,
            &AccountOverview::from_value(overview_raw),
            &exposure,
            subject.to_evidence(),
        )
    }
}
