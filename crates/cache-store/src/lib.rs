//! Read-through/write-through cache contract that shields providers from
//! redundant calls, plus the append-only signal audit log.
//!
//! Entries are keyed by (instrument, data kind) and are never updated in
//! place: a refreshed fetch writes a new entry and `get` returns the newest
//! one inside the kind's freshness window. The persistent engine itself is an
//! external collaborator; [`MemoryCacheStore`] implements the contract
//! in-process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signal_core::{CacheConfig, CacheEntry, CacheKind, PulseError, Signal, Transaction};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Entries deleted per kind by one reap pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub historical: usize,
    pub intraday: usize,
    pub real_time: usize,
}

impl ReapReport {
    pub fn total(&self) -> usize {
        self.historical + self.intraday + self.real_time
    }
}

/// Key-addressable append-only cache of provider payloads.
///
/// A cache miss is `None`, never an error. Reads and writes are atomic per
/// (symbol, kind) key; concurrent writers are last-write-wins since entries
/// are immutable.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Newest entry for the key within `window` of `now`, if any.
    async fn get(
        &self,
        symbol: &str,
        kind: CacheKind,
        window: chrono::Duration,
    ) -> Result<Option<CacheEntry>, PulseError>;

    /// Append a new entry. Existing entries for the key are superseded, not
    /// mutated.
    async fn put(&self, entry: CacheEntry) -> Result<(), PulseError>;

    /// Delete entries older than their kind's retention horizon. Idempotent;
    /// runs at process start.
    async fn reap(&self, now: DateTime<Utc>) -> Result<ReapReport, PulseError>;

    /// Entry counts per kind, for observability.
    async fn counts(&self) -> BTreeMap<CacheKind, usize>;
}

/// In-process implementation of the [`CacheStore`] contract.
pub struct MemoryCacheStore {
    config: CacheConfig,
    entries: RwLock<HashMap<(String, CacheKind), Vec<CacheEntry>>>,
}

impl MemoryCacheStore {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(
        &self,
        symbol: &str,
        kind: CacheKind,
        window: chrono::Duration,
    ) -> Result<Option<CacheEntry>, PulseError> {
        let cutoff = Utc::now() - window;
        let entries = self.entries.read().await;
        let hit = entries
            .get(&(symbol.to_string(), kind))
            .and_then(|list| {
                list.iter()
                    .filter(|e| e.fetched_at >= cutoff)
                    .max_by_key(|e| e.fetched_at)
            })
            .cloned();

        if let Some(ref entry) = hit {
            tracing::debug!(
                symbol,
                kind = kind.as_str(),
                source = %entry.source,
                "cache hit"
            );
        }
        Ok(hit)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), PulseError> {
        let mut entries = self.entries.write().await;
        entries
            .entry((entry.symbol.clone(), entry.kind))
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn reap(&self, now: DateTime<Utc>) -> Result<ReapReport, PulseError> {
        let mut report = ReapReport::default();
        let mut entries = self.entries.write().await;

        for ((_, kind), list) in entries.iter_mut() {
            let cutoff = now - self.config.retention_for(*kind);
            let before = list.len();
            list.retain(|e| e.fetched_at >= cutoff);
            let removed = before - list.len();
            match kind {
                CacheKind::Historical => report.historical += removed,
                CacheKind::Intraday => report.intraday += removed,
                CacheKind::RealTime => report.real_time += removed,
            }
        }
        entries.retain(|_, list| !list.is_empty());

        if report.total() > 0 {
            tracing::info!(
                historical = report.historical,
                intraday = report.intraday,
                real_time = report.real_time,
                "reaped expired cache entries"
            );
        }
        Ok(report)
    }

    async fn counts(&self) -> BTreeMap<CacheKind, usize> {
        let entries = self.entries.read().await;
        let mut counts = BTreeMap::new();
        for ((_, kind), list) in entries.iter() {
            *counts.entry(*kind).or_insert(0) += list.len();
        }
        counts
    }
}

/// Append-only audit log of generated signals.
#[async_trait]
pub trait SignalAudit: Send + Sync {
    async fn record(&self, signal: &Signal) -> Result<(), PulseError>;

    /// Most recent signals, newest first.
    async fn recent(&self, limit: usize) -> Vec<Signal>;
}

#[derive(Default)]
pub struct MemorySignalAudit {
    signals: RwLock<Vec<Signal>>,
}

#[async_trait]
impl SignalAudit for MemorySignalAudit {
    async fn record(&self, signal: &Signal) -> Result<(), PulseError> {
        self.signals.write().await.push(signal.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Vec<Signal> {
        let signals = self.signals.read().await;
        signals.iter().rev().take(limit).cloned().collect()
    }
}

/// Append-only record of executed trades.
#[async_trait]
pub trait TradeLog: Send + Sync {
    async fn record(&self, transaction: &Transaction) -> Result<(), PulseError>;

    /// Most recent transactions, newest first.
    async fn recent(&self, limit: usize) -> Vec<Transaction>;
}

#[derive(Default)]
pub struct MemoryTradeLog {
    transactions: RwLock<Vec<Transaction>>,
}

#[async_trait]
impl TradeLog for MemoryTradeLog {
    async fn record(&self, transaction: &Transaction) -> Result<(), PulseError> {
        self.transactions.write().await.push(transaction.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Vec<Transaction> {
        let transactions = self.transactions.read().await;
        transactions.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::{CachePayload, QuoteSnapshot};

    fn quote_entry(symbol: &str, age: chrono::Duration) -> CacheEntry {
        CacheEntry {
            symbol: symbol.to_string(),
            kind: CacheKind::RealTime,
            payload: CachePayload::Quote(QuoteSnapshot {
                symbol: symbol.to_string(),
                current_price: 100.0,
                previous_close: 99.0,
                change: 1.0,
                change_percent: 1.0101,
                volume: 1_000.0,
                timestamp: Utc::now() - age,
                error: None,
            }),
            source: "finnhub".to_string(),
            fetched_at: Utc::now() - age,
        }
    }

    #[tokio::test]
    async fn freshness_window_boundary() {
        let store = MemoryCacheStore::default();
        let window = chrono::Duration::minutes(60);

        store
            .put(quote_entry("XYZ", chrono::Duration::minutes(61)))
            .await
            .unwrap();
        assert!(store
            .get("XYZ", CacheKind::RealTime, window)
            .await
            .unwrap()
            .is_none());

        store
            .put(quote_entry("XYZ", chrono::Duration::minutes(59)))
            .await
            .unwrap();
        assert!(store
            .get("XYZ", CacheKind::RealTime, window)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn get_prefers_newest_entry_in_window() {
        let store = MemoryCacheStore::default();
        let window = chrono::Duration::minutes(60);

        store
            .put(quote_entry("AAPL", chrono::Duration::minutes(40)))
            .await
            .unwrap();
        let mut newer = quote_entry("AAPL", chrono::Duration::minutes(5));
        newer.source = "twelvedata".to_string();
        store.put(newer).await.unwrap();

        let hit = store
            .get("AAPL", CacheKind::RealTime, window)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.source, "twelvedata");
    }

    #[tokio::test]
    async fn reap_is_idempotent() {
        let store = MemoryCacheStore::default();
        // Real-time retention is 7 days.
        store
            .put(quote_entry("OLD", chrono::Duration::days(8)))
            .await
            .unwrap();
        store
            .put(quote_entry("NEW", chrono::Duration::minutes(1)))
            .await
            .unwrap();

        let first = store.reap(Utc::now()).await.unwrap();
        assert_eq!(first.real_time, 1);

        let second = store.reap(Utc::now()).await.unwrap();
        assert_eq!(second.total(), 0);

        let counts = store.counts().await;
        assert_eq!(counts.get(&CacheKind::RealTime), Some(&1));
    }

    #[tokio::test]
    async fn trade_log_is_append_only_newest_first() {
        let log = MemoryTradeLog::default();
        for (i, price) in [100.0, 101.0].iter().enumerate() {
            log.record(&Transaction {
                symbol: format!("T{i}"),
                action: signal_core::TradeAction::Buy,
                quantity: 1.0,
                price: *price,
                total_value: *price,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
        }

        let recent = log.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].symbol, "T1");
    }

    #[tokio::test]
    async fn audit_is_append_only_newest_first() {
        let audit = MemorySignalAudit::default();
        for (i, action) in [
            signal_core::TradeAction::Buy,
            signal_core::TradeAction::Hold,
        ]
        .iter()
        .enumerate()
        {
            audit
                .record(&Signal {
                    symbol: format!("S{i}"),
                    action: *action,
                    confidence: 0.5,
                    reason: "test".to_string(),
                    metrics: serde_json::Value::Null,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let recent = audit.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].symbol, "S1");
    }
}
