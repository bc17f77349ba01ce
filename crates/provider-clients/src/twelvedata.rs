use async_trait::async_trait;
use chrono::NaiveDateTime;
use fetch_gateway::FetchGateway;
use reqwest::Client;
use serde::Deserialize;
use signal_core::{IntradayProvider, PriceBar, PulseError};

const BASE_URL: &str = "https://api.twelvedata.com";

/// Bars requested per call; roughly one full trading week of minutes.
const OUTPUT_SIZE: u32 = 500;

const DEFAULT_INTERVAL: &str = "1min";

/// Twelve Data: intraday bars at a configurable interval, 1-minute default.
#[derive(Clone)]
pub struct TwelveDataClient {
    api_key: Option<String>,
    interval: String,
    client: Client,
    gateway: FetchGateway,
}

impl TwelveDataClient {
    pub fn new(api_key: Option<String>, gateway: FetchGateway) -> Self {
        Self {
            api_key,
            interval: DEFAULT_INTERVAL.to_string(),
            client: crate::http_client(),
            gateway,
        }
    }

    /// Bar interval for the time series query ("1min", "5min", "1h", ...).
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn from_env(gateway: FetchGateway) -> Self {
        let client = Self::new(std::env::var("TWELVE_DATA_API_KEY").ok(), gateway);
        match std::env::var("TWELVE_DATA_INTERVAL") {
            Ok(interval) => client.with_interval(interval),
            Err(_) => client,
        }
    }
}

#[async_trait]
impl IntradayProvider for TwelveDataClient {
    fn tag(&self) -> &'static str {
        "twelvedata"
    }

    async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<PriceBar>, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("Twelve Data API key not configured, skipping");
            return Ok(Vec::new());
        };

        let url = format!("{BASE_URL}/time_series");
        let body: TimeSeriesResponse = self
            .gateway
            .call("twelvedata.intraday", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("symbol", symbol),
                        ("interval", self.interval.as_str()),
                        ("outputsize", &OUTPUT_SIZE.to_string()),
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

        if body.status.as_deref() == Some("error") {
            return Err(PulseError::ProviderError(
                body.message
                    .unwrap_or_else(|| format!("no intraday data for {symbol}")),
            ));
        }

        // Twelve Data returns newest-first; downstream indicators want
        // oldest-first.
        let mut bars: Vec<PriceBar> = body
            .values
            .into_iter()
            .filter_map(|row| {
                let timestamp = NaiveDateTime::parse_from_str(&row.datetime, "%Y-%m-%d %H:%M:%S")
                    .ok()?
                    .and_utc();
                Some(PriceBar {
                    timestamp,
                    open: row.open.parse().ok()?,
                    high: row.high.parse().ok()?,
                    low: row.low.parse().ok()?,
                    close: row.close.parse().ok()?,
                    volume: row.volume.parse().unwrap_or(0.0),
                })
            })
            .collect();

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    values: Vec<TimeSeriesRow>,
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesRow {
    #[serde(default)]
    datetime: String,
    #[serde(default)]
    open: String,
    #[serde(default)]
    high: String,
    #[serde(default)]
    low: String,
    #[serde(default)]
    close: String,
    #[serde(default)]
    volume: String,
}
