use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fetch_gateway::FetchGateway;
use reqwest::Client;
use serde::Deserialize;
use signal_core::{Article, HistoricalProvider, NewsProvider, PriceBar, PulseError};
use std::collections::HashMap;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const NEWS_LIMIT: u32 = 20;

/// Alpha Vantage: news-sentiment feed (the one provider that ships its own
/// sentiment score) and daily historical bars.
#[derive(Clone)]
pub struct AlphaVantageClient {
    api_key: Option<String>,
    client: Client,
    gateway: FetchGateway,
}

impl AlphaVantageClient {
    pub fn new(api_key: Option<String>, gateway: FetchGateway) -> Self {
        Self {
            api_key,
            client: crate::http_client(),
            gateway,
        }
    }

    pub fn from_env(gateway: FetchGateway) -> Self {
        Self::new(std::env::var("ALPHA_VANTAGE_API_KEY").ok(), gateway)
    }
}

#[async_trait]
impl NewsProvider for AlphaVantageClient {
    fn tag(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_news(&self, symbol: &str, _days_back: u32) -> Result<Vec<Article>, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("Alpha Vantage API key not configured, skipping");
            return Ok(Vec::new());
        };

        let body: SentimentFeedResponse = self
            .gateway
            .call("alphavantage.news", || async {
                let response = self
                    .client
                    .get(BASE_URL)
                    .query(&[
                        ("function", "NEWS_SENTIMENT"),
                        ("tickers", symbol),
                        ("limit", &NEWS_LIMIT.to_string()),
                        ("apikey", api_key),
                    ])
                    .send()
                    .await
                    .map_err(crate::request_error)?;

                if !response.status().is_success() {
                    return Err(crate::status_error(response).await);
                }
                response.json().await.map_err(crate::request_error)
            })
            .await?;

        // Alpha Vantage signals throttling inside a 200 body.
        if let Some(note) = body.note.or(body.information) {
            return Err(PulseError::ProviderError(format!("rate limit: {note}")));
        }

        Ok(body
            .feed
            .into_iter()
            .map(|item| Article {
                title: item.title,
                summary: item.summary,
                source: if item.source.is_empty() {
                    "Alpha Vantage".to_string()
                } else {
                    item.source
                },
                url: item.url,
                published: parse_av_timestamp(&item.time_published).unwrap_or_else(Utc::now),
                symbol: symbol.to_string(),
                provider: NewsProvider::tag(self).to_string(),
                sentiment_score: item.overall_sentiment_score,
            })
            .collect())
    }
}

#[async_trait]
impl HistoricalProvider for AlphaVantageClient {
    fn tag(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_daily(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("Alpha Vantage API key not configured, skipping");
            return Ok(Vec::new());
        };

        let body: DailySeriesResponse = self
            .gateway
            .call("alphavantage.daily", || async {
                let response = self
                    .client
                    .get(BASE_URL)
                    .query(&[
                        ("function", "TIME_SERIES_DAILY"),
                        ("symbol", symbol),
                        ("outputsize", "full"),
                        ("apikey", api_key),
                    ])
                    .send()
                    .await
                    .map_err(crate::request_error)?;

                if !response.status().is_success() {
                    return Err(crate::status_error(response).await);
                }
                response.json().await.map_err(crate::request_error)
            })
            .await?;

        if let Some(note) = body.note.or(body.information) {
            return Err(PulseError::ProviderError(format!("rate limit: {note}")));
        }
        let Some(series) = body.series else {
            return Err(PulseError::ProviderError(format!(
                "no daily series for {symbol}"
            )));
        };

        let mut bars: Vec<PriceBar> = series
            .into_iter()
            .filter_map(|(date, row)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
                let timestamp = date.and_hms_opt(0, 0, 0)?.and_utc();
                Some(PriceBar {
                    timestamp,
                    open: row.open.parse().ok()?,
                    high: row.high.parse().ok()?,
                    low: row.low.parse().ok()?,
                    close: row.close.parse().ok()?,
                    volume: row.volume.parse().ok()?,
                })
            })
            .filter(|bar| bar.timestamp >= start && bar.timestamp <= end)
            .collect();

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

/// Alpha Vantage timestamps look like `20240102T153000`.
fn parse_av_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Deserialize)]
struct SentimentFeedResponse {
    #[serde(default)]
    feed: Vec<SentimentFeedItem>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentimentFeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    time_published: String,
    overall_sentiment_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, DailyRow>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alpha_vantage_timestamp() {
        let ts = parse_av_timestamp("20240102T153000").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-01-02 15:30");
        assert!(parse_av_timestamp("not-a-time").is_none());
    }
}
