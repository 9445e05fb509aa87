//! Report Snapshot Cache
//!
//! Thread-safe store for the last `RiskReport` computed per address, so a
//! rendered report matches the JSON the caller just saw.
//! Uses DashMap for concurrent access without lock contention.
//!
//! Features:
//! - TTL-based expiration (`None` keeps entries until consumed)
//! - Keys are trimmed but case preserved (base58 is case-sensitive)
//! - Hit/miss counters for monitoring

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::types::RiskReport;

/// Snapshot with its creation time
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub report: RiskReport,
    pub created_at: Instant,
    pub ttl: Option<Duration>,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.created_at.elapsed() > ttl,
            None => false,
        }
    }

    /// Seconds left before expiry, `None` when entries never expire
    pub fn remaining_ttl(&self) -> Option<u64> {
        self.ttl
            .map(|ttl| ttl.as_secs().saturating_sub(self.created_at.elapsed().as_secs()))
    }
}

#[derive(Clone)]
pub struct ReportCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Option<Duration>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ReportCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn key(address: &str) -> String {
        address.trim().to_string()
    }

    /// Fresh snapshot for `address`, if any. Expired entries are dropped.
    pub fn get(&self, address: &str) -> Option<RiskReport> {
        let key = Self::key(address);

        let fresh = self.store.get(&key).and_then(|entry| {
            (!entry.is_expired()).then(|| (entry.report.clone(), entry.remaining_ttl()))
        });

        match fresh {
            Some((report, remaining)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("✅ SNAPSHOT HIT: {} (TTL remaining: {:?}s)", key, remaining);
                Some(report)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                if self.evict_if_expired(&key) {
                    debug!("📭 SNAPSHOT MISS (expired): {}", key);
                } else {
                    debug!("📭 SNAPSHOT MISS: {}", key);
                }
                None
            }
        }
    }

    /// Remove the entry only if it is still expired under the shard lock,
    /// so a snapshot stored concurrently survives
    fn evict_if_expired(&self, key: &str) -> bool {
        self.store.remove_if(key, |_, entry| entry.is_expired()).is_some()
    }

    /// Store or replace the snapshot for `address`
    pub fn set(&self, address: &str, report: RiskReport) {
        let key = Self::key(address);
        self.store.insert(
            key.clone(),
            CacheEntry {
                report,
                created_at: Instant::now(),
                ttl: self.ttl,
            },
        );
        debug!("💾 SNAPSHOT SET: {}", key);
    }

    pub fn invalidate(&self, address: &str) {
        let key = Self::key(address);
        self.store.remove(&key);
        debug!("🗑️ SNAPSHOT INVALIDATE: {}", key);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            info!("🧹 SNAPSHOT CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl.map(|t| t.as_secs()),
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// `None` when snapshots never expire
    pub ttl_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{BasicInfo, Evidence, RiskLevel};

    fn report(address: &str) -> RiskReport {
        RiskReport {
            address: address.to_string(),
            risk_score: 0,
            risk_level: RiskLevel::Low,
            reasons: vec![],
            summary: String::new(),
            basic_info: BasicInfo::default(),
            evidence: Evidence::default(),
            exposure: vec![],
        }
    }

    const ADDR: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    #[test]
    fn test_set_get_invalidate() {
        let cache = ReportCache::new(Some(Duration::from_secs(60)));
        cache.set(ADDR, report(ADDR));
        assert_eq!(cache.get(&format!(" {} ", ADDR)).map(|r| r.address), Some(ADDR.to_string()));
        cache.invalidate(ADDR);
        assert!(cache.get(ADDR).is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let cache = ReportCache::new(None);
        cache.set(ADDR, report(ADDR));
        assert!(cache.get(&ADDR.to_lowercase()).is_none());
    }

    #[test]
    fn test_expiry_and_cleanup() {
        let cache = ReportCache::new(Some(Duration::ZERO));
        cache.set(ADDR, report(ADDR));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.stats().entries, 0);

        cache.set(ADDR, report(ADDR));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(ADDR).is_none());
    }

    #[test]
    fn test_eviction_spares_fresh_snapshot() {
        let cache = ReportCache::new(Some(Duration::from_secs(60)));
        cache.set(ADDR, report(ADDR));
        assert!(!cache.evict_if_expired(ADDR));
        assert_eq!(cache.stats().entries, 1);

        let expiring = ReportCache::new(Some(Duration::ZERO));
        expiring.set(ADDR, report(ADDR));
        std::thread::sleep(Duration::from_millis(5));
        assert!(expiring.evict_if_expired(ADDR));
        assert_eq!(expiring.stats().entries, 0);
    }

    #[test]
    fn test_never_expires_without_ttl() {
        let cache = ReportCache::new(None);
        cache.set(ADDR, report(ADDR));
        assert_eq!(cache.cleanup_expired(), 0);
        assert!(cache.get(ADDR).is_some());
    }

    #[test]
    fn test_stats() {
        let cache = ReportCache::new(Some(Duration::from_secs(60)));
        cache.set(ADDR, report(ADDR));
        cache.get(ADDR);
        cache.get("TNothing");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 50.0);
        assert_eq!(stats.ttl_secs, Some(60));
    }
}
