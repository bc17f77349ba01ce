use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Article, PriceBar, PulseError, RawQuote};

/// A news source. One implementation per external provider, iterated by the
/// aggregator in a fixed priority order. Implementations distinguish "no
/// credentials" (`ProviderUnavailable`) from a real call failure
/// (`ProviderError` / `RateLimitExceeded`); the aggregator maps both onto an
/// empty contribution so one misbehaving provider never blocks the others.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Stable lowercase provider tag ("finnhub", "alphavantage", ...).
    fn tag(&self) -> &'static str;

    async fn fetch_news(&self, symbol: &str, days_back: u32) -> Result<Vec<Article>, PulseError>;
}

/// Daily historical bar source.
#[async_trait]
pub trait HistoricalProvider: Send + Sync {
    fn tag(&self) -> &'static str;

    async fn fetch_daily(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>, PulseError>;
}

/// Intraday bar source.
#[async_trait]
pub trait IntradayProvider: Send + Sync {
    fn tag(&self) -> &'static str;

    async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<PriceBar>, PulseError>;
}

/// Real-time quote source. Returns raw provider fields; derived values
/// (change, change percent) are the Market Data Service's job.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn tag(&self) -> &'static str;

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, PulseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Signal,
    Trade,
    Error,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Signal => "signal",
            AlertKind::Trade => "trade",
            AlertKind::Error => "error",
        }
    }
}

/// Outbound alert capability. Delivery is an external collaborator; the core
/// only formats and hands off messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, message: &str, kind: AlertKind);
}
