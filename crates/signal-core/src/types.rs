use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One news article, normalized from a provider-specific response shape.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    /// Publisher name as reported by the provider ("Reuters", "Yahoo", ...).
    pub source: String,
    pub url: String,
    pub published: DateTime<Utc>,
    pub symbol: String,
    /// Stable lowercase tag of the originating provider client.
    pub provider: String,
    /// Provider-supplied sentiment score, where the source offers one.
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

/// Result of one multi-source aggregation call. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedNews {
    /// Deduplicated articles in provider priority order, first-seen wins.
    pub articles: Vec<Article>,
    pub total_articles: usize,
    /// Articles collected before dedup.
    pub raw_count: usize,
    /// Per-provider article counts, 0 recorded for failed providers.
    pub source_breakdown: BTreeMap<String, usize>,
    pub generated_at: DateTime<Utc>,
}

/// OHLCV bar. Series are ordered ascending by timestamp with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Quote fields as returned by the provider, before derived values are
/// computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

/// Real-time quote snapshot. On a provider failure the numeric fields are
/// zeroed and `error` carries the marker so batch loops are never aborted
/// by one bad symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QuoteSnapshot {
    /// Snapshot carrying only an error marker.
    pub fn errored(symbol: &str, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            current_price: 0.0,
            previous_close: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0.0,
            timestamp: Utc::now(),
            error: Some(message.into()),
        }
    }
}

/// Cached payload kind, with its own freshness window and retention horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CacheKind {
    Historical,
    Intraday,
    RealTime,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Historical => "historical",
            CacheKind::Intraday => "intraday",
            CacheKind::RealTime => "real_time",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CachePayload {
    Series(Vec<PriceBar>),
    Quote(QuoteSnapshot),
}

/// Append-only cache record. A refreshed fetch writes a new entry; nothing
/// is updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub symbol: String,
    pub kind: CacheKind,
    pub payload: CachePayload,
    /// Provider tag the payload was fetched from.
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fused trading decision for one instrument. Persisted as an audit
/// record; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: TradeAction,
    /// Absolute value of the underlying score, in [0, 1].
    pub confidence: f64,
    /// Human-readable explanation embedding the metrics actually used.
    pub reason: String,
    /// Supporting metrics (price, SMA, RSI, sentiment score, ...).
    pub metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Per-aggregation sentiment rollup. Derived, not persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean per-article score, in [-1, 1].
    pub overall_score: f64,
    pub article_count: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Open position, upserted by symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_value: f64,
}

/// Append-only trade audit entry, created on every executed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: f64,
    pub price: f64,
    pub total_value: f64,
    pub timestamp: DateTime<Utc>,
}
