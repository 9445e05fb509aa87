//! Counterparty Risk Resolver
//!
//! One-hop only: every address that sent to or received from the subject is
//! checked against the compliance source, independently of the subject.

use futures_util::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{LookupOutcome, SecuritySignal, TransferRecord};
use crate::providers::ComplianceSource;

/// Distinct one-hop counterparties split by direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counterparties {
    /// Addresses that sent to the subject
    pub inbound: BTreeSet<String>,
    /// Addresses the subject sent to
    pub outbound: BTreeSet<String>,
}

impl Counterparties {
    /// Deduplicated union of both directions
    pub fn all(&self) -> BTreeSet<String> {
        self.inbound.union(&self.outbound).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

/// Counterparties flagged risky, split by direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterpartyRisk {
    pub risky_in: BTreeSet<String>,
    pub risky_out: BTreeSet<String>,
    /// Per-address lookup outcome, for audit and logging
    pub outcomes: BTreeMap<String, LookupOutcome<SecuritySignal>>,
}

impl CounterpartyRisk {
    pub fn hits(&self) -> usize {
        self.risky_in.union(&self.risky_out).count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.outcomes.values().filter(|o| !o.is_available()).count()
    }
}

/// Collect counterparties from all transfers, regardless of token
pub fn extract_counterparties(transfers: &[TransferRecord], subject: &str) -> Counterparties {
    let mut parties = Counterparties::default();
    for record in transfers {
        if !record.from.is_empty() && record.from != subject {
            parties.inbound.insert(record.from.clone());
        }
        if !record.to.is_empty() && record.to != subject {
            parties.outbound.insert(record.to.clone());
        }
    }
    parties
}

async fn with_timeout<T>(
    timeout: Option<Duration>,
    what: &str,
    fut: impl std::future::Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .unwrap_or_else(|_| Err(AppError::upstream_timeout(format!("{} timed out after {:?}", what, limit)))),
        None => fut.await,
    }
}

/// Security signal for one address.
///
/// The evidence lookup is skipped once the security check already flags the
/// address; the risky verdict is the same either way.
pub async fn lookup_signal(
    source: &dyn ComplianceSource,
    address: &str,
    timeout: Option<Duration>,
) -> LookupOutcome<SecuritySignal> {
    let check = match with_timeout(timeout, "security check", source.fetch_security_signal(address)).await {
        Ok(check) => check,
        Err(e) => return LookupOutcome::Unavailable(e.to_string()),
    };

    if check.is_blacklisted || check.has_fraud_flag {
        return LookupOutcome::Available(SecuritySignal::from_parts(Some(&check), None));
    }

    match with_timeout(timeout, "blacklist evidence", source.fetch_blacklist_evidence(address)).await {
        Ok(evidence) => LookupOutcome::Available(SecuritySignal::from_parts(Some(&check), Some(&evidence))),
        Err(e) => LookupOutcome::Unavailable(e.to_string()),
    }
}

/// Look up every address with at most `concurrency` lookups in flight.
///
/// Each lookup yields its own outcome; a failure never cancels siblings and
/// the map is the same whatever the completion order.
pub async fn resolve_signals(
    source: &dyn ComplianceSource,
    addresses: &BTreeSet<String>,
    concurrency: usize,
    timeout: Option<Duration>,
) -> BTreeMap<String, LookupOutcome<SecuritySignal>> {
    stream::iter(addresses.iter().cloned())
        .map(|address| async move {
            let outcome = lookup_signal(source, &address, timeout).await;
            (address, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<BTreeMap<_, _>>()
        .await
}

/// Addresses whose outcome is an available, risky signal.
/// Unavailable lookups count as not risky.
pub fn risky_addresses(outcomes: &BTreeMap<String, LookupOutcome<SecuritySignal>>) -> BTreeSet<String> {
    outcomes
        .iter()
        .filter(|(_, outcome)| outcome.available().map(SecuritySignal::is_risky).unwrap_or(false))
        .map(|(address, _)| address.clone())
        .collect()
}

/// Resolve a set of addresses to the subset flagged risky
pub async fn resolve_counterparty_risk(
    source: &dyn ComplianceSource,
    addresses: &BTreeSet<String>,
    concurrency: usize,
    timeout: Option<Duration>,
) -> BTreeSet<String> {
    risky_addresses(&resolve_signals(source, addresses, concurrency, timeout).await)
}

/// Resolve both directions with one lookup per distinct address
pub async fn resolve_counterparties(
    source: &dyn ComplianceSource,
    parties: &Counterparties,
    concurrency: usize,
    timeout: Option<Duration>,
) -> CounterpartyRisk {
    let outcomes = resolve_signals(source, &parties.all(), concurrency, timeout).await;

    for (address, outcome) in &outcomes {
        if let LookupOutcome::Unavailable(reason) = outcome {
            warn!(counterparty = %address, %reason, "Counterparty lookup unavailable, treating as not risky");
        }
    }

    let risky = risky_addresses(&outcomes);
    let risk = CounterpartyRisk {
        risky_in: parties.inbound.intersection(&risky).cloned().collect(),
        risky_out: parties.outbound.intersection(&risky).cloned().collect(),
        outcomes,
    };

    debug!(
        checked = risk.outcomes.len(),
        risky = risk.hits(),
        unavailable = risk.unavailable_count(),
        "Counterparty resolution complete"
    );

    risk
}
