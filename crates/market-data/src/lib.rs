//! Cache-first price and quote service. Every read checks the cache store
//! inside the kind's freshness window before touching a provider, and every
//! live fetch is written back so the next caller inside the window never
//! leaves the process.

use cache_store::CacheStore;
use chrono::{DateTime, Utc};
use signal_core::{
    CacheConfig, CacheEntry, CacheKind, CachePayload, HistoricalProvider, IntradayProvider,
    PriceBar, QuoteProvider, QuoteSnapshot, RawQuote,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct MarketDataService {
    cache: Arc<dyn CacheStore>,
    config: CacheConfig,
    historical: Arc<dyn HistoricalProvider>,
    intraday: Arc<dyn IntradayProvider>,
    quotes: Arc<dyn QuoteProvider>,
}

impl MarketDataService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        config: CacheConfig,
        historical: Arc<dyn HistoricalProvider>,
        intraday: Arc<dyn IntradayProvider>,
        quotes: Arc<dyn QuoteProvider>,
    ) -> Self {
        Self {
            cache,
            config,
            historical,
            intraday,
            quotes,
        }
    }

    /// Daily bars per symbol for `[start, end]`. A failed symbol contributes
    /// an empty series; the batch always completes.
    pub async fn fetch_historical(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BTreeMap<String, Vec<PriceBar>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            let bars = self.historical_for(symbol, start, end).await;
            out.insert(symbol.clone(), bars);
        }
        out
    }

    /// 1-minute bars per symbol, freshest first from cache.
    pub async fn fetch_intraday(&self, symbols: &[String]) -> BTreeMap<String, Vec<PriceBar>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            let bars = self.intraday_for(symbol).await;
            out.insert(symbol.clone(), bars);
        }
        out
    }

    /// Real-time snapshots. A provider failure for one symbol yields a
    /// zeroed snapshot carrying the error marker rather than aborting the
    /// batch.
    pub async fn fetch_quotes(&self, symbols: &[String]) -> Vec<QuoteSnapshot> {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            out.push(self.quote_for(symbol).await);
        }
        out
    }

    async fn historical_for(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PriceBar> {
        let window = self.config.window_for(CacheKind::Historical);
        if let Some(bars) = self.cached_series(symbol, CacheKind::Historical, window).await {
            return bars;
        }

        match self.historical.fetch_daily(symbol, start, end).await {
            Ok(bars) => {
                let bars = normalize_series(bars);
                self.write_series(symbol, CacheKind::Historical, &bars, self.historical.tag())
                    .await;
                bars
            }
            Err(err) => {
                tracing::warn!(symbol, error = %err, "historical fetch failed");
                Vec::new()
            }
        }
    }

    async fn intraday_for(&self, symbol: &str) -> Vec<PriceBar> {
        let window = self.config.window_for(CacheKind::Intraday);
        if let Some(bars) = self.cached_series(symbol, CacheKind::Intraday, window).await {
            return bars;
        }

        match self.intraday.fetch_intraday(symbol).await {
            Ok(bars) => {
                let bars = normalize_series(bars);
                self.write_series(symbol, CacheKind::Intraday, &bars, self.intraday.tag())
                    .await;
                bars
            }
            Err(err) => {
                tracing::warn!(symbol, error = %err, "intraday fetch failed");
                Vec::new()
            }
        }
    }

    async fn quote_for(&self, symbol: &str) -> QuoteSnapshot {
        let window = self.config.window_for(CacheKind::RealTime);
        match self.cache.get(symbol, CacheKind::RealTime, window).await {
            Ok(Some(CacheEntry {
                payload: CachePayload::Quote(snapshot),
                ..
            })) => return snapshot,
            Ok(_) => {}
            Err(err) => tracing::warn!(symbol, error = %err, "cache read failed"),
        }

        match self.quotes.fetch_quote(symbol).await {
            Ok(raw) => {
                let snapshot = snapshot_from_raw(raw);
                let entry = CacheEntry {
                    symbol: symbol.to_string(),
                    kind: CacheKind::RealTime,
                    payload: CachePayload::Quote(snapshot.clone()),
                    source: self.quotes.tag().to_string(),
                    fetched_at: Utc::now(),
                };
                if let Err(err) = self.cache.put(entry).await {
                    tracing::warn!(symbol, error = %err, "cache write failed");
                }
                snapshot
            }
            Err(err) => {
                tracing::warn!(symbol, error = %err, "quote fetch failed");
                QuoteSnapshot::errored(symbol, err.to_string())
            }
        }
    }

    async fn cached_series(
        &self,
        symbol: &str,
        kind: CacheKind,
        window: chrono::Duration,
    ) -> Option<Vec<PriceBar>> {
        match self.cache.get(symbol, kind, window).await {
            Ok(Some(CacheEntry {
                payload: CachePayload::Series(bars),
                ..
            })) => Some(bars),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(symbol, kind = kind.as_str(), error = %err, "cache read failed");
                None
            }
        }
    }

    async fn write_series(&self, symbol: &str, kind: CacheKind, bars: &[PriceBar], source: &str) {
        // Empty fetches are not cached, so the next call retries live.
        if bars.is_empty() {
            return;
        }
        let entry = CacheEntry {
            symbol: symbol.to_string(),
            kind,
            payload: CachePayload::Series(bars.to_vec()),
            source: source.to_string(),
            fetched_at: Utc::now(),
        };
        if let Err(err) = self.cache.put(entry).await {
            tracing::warn!(symbol, kind = kind.as_str(), error = %err, "cache write failed");
        }
    }
}

/// Ascending by timestamp with duplicate timestamps collapsed.
fn normalize_series(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    bars
}

fn snapshot_from_raw(raw: RawQuote) -> QuoteSnapshot {
    let change = raw.current_price - raw.previous_close;
    let change_percent = if raw.previous_close == 0.0 {
        0.0
    } else {
        change / raw.previous_close * 100.0
    };
    QuoteSnapshot {
        symbol: raw.symbol,
        current_price: raw.current_price,
        previous_close: raw.previous_close,
        change,
        change_percent,
        volume: raw.volume,
        timestamp: raw.timestamp,
        error: None,
    }
}
