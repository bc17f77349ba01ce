use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fetch_gateway::FetchGateway;
use reqwest::Client;
use serde::Deserialize;
use signal_core::{Article, NewsProvider, PulseError, QuoteProvider, RawQuote};

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Articles kept per call; Finnhub returns far more than the pipeline needs.
const ARTICLE_CAP: usize = 15;

/// Finnhub: company news plus real-time quotes.
#[derive(Clone)]
pub struct FinnhubClient {
    api_key: Option<String>,
    client: Client,
    gateway: FetchGateway,
}

impl FinnhubClient {
    pub fn new(api_key: Option<String>, gateway: FetchGateway) -> Self {
        Self {
            api_key,
            client: crate::http_client(),
            gateway,
        }
    }

    pub fn from_env(gateway: FetchGateway) -> Self {
        Self::new(std::env::var("FINNHUB_API_KEY").ok(), gateway)
    }
}

#[async_trait]
impl NewsProvider for FinnhubClient {
    fn tag(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_news(&self, symbol: &str, days_back: u32) -> Result<Vec<Article>, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("Finnhub API key not configured, skipping");
            return Ok(Vec::new());
        };

        let to = Utc::now();
        let from = to - Duration::days(days_back as i64);
        let url = format!("{BASE_URL}/company-news");

        let items: Vec<FinnhubArticle> = self
            .gateway
            .call("finnhub.news", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("symbol", symbol),
                        ("from", &from.format("%Y-%m-%d").to_string()),
                        ("to", &to.format("%Y-%m-%d").to_string()),
                        ("token", api_key),
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

        Ok(items
            .into_iter()
            .take(ARTICLE_CAP)
            .map(|a| Article {
                title: a.headline,
                summary: a.summary,
                source: if a.source.is_empty() {
                    "Finnhub".to_string()
                } else {
                    a.source
                },
                url: a.url,
                published: DateTime::from_timestamp(a.datetime, 0).unwrap_or_else(Utc::now),
                symbol: symbol.to_string(),
                provider: NewsProvider::tag(self).to_string(),
                sentiment_score: None,
            })
            .collect())
    }
}

#[async_trait]
impl QuoteProvider for FinnhubClient {
    fn tag(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuote, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(PulseError::ProviderUnavailable(
                "Finnhub API key not configured".to_string(),
            ));
        };

        let url = format!("{BASE_URL}/quote");
        let quote: FinnhubQuote = self
            .gateway
            .call("finnhub.quote", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[("symbol", symbol), ("token", api_key)])
                    .send()
                    .await
                    .map_err(crate::request_error)?;

                if !response.status().is_success() {
                    return Err(crate::status_error(response).await);
                }
                response.json().await.map_err(crate::request_error)
            })
            .await?;

        // Finnhub reports c=0 for unknown symbols rather than an HTTP error.
        if quote.current == 0.0 && quote.previous_close == 0.0 {
            return Err(PulseError::ProviderError(format!(
                "no quote data for {symbol}"
            )));
        }

        Ok(RawQuote {
            symbol: symbol.to_string(),
            current_price: quote.current,
            previous_close: quote.previous_close,
            volume: quote.volume.unwrap_or(0.0),
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FinnhubArticle {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    datetime: i64,
}

#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    #[serde(rename = "c", default)]
    current: f64,
    #[serde(rename = "pc", default)]
    previous_close: f64,
    #[serde(rename = "v", default)]
    volume: Option<f64>,
}
