use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fetch_gateway::FetchGateway;
use reqwest::Client;
use serde::Deserialize;
use signal_core::{Article, NewsProvider, PulseError};

const BASE_URL: &str = "https://newsapi.org/v2";
const PAGE_SIZE: u32 = 20;

/// NewsAPI.org: keyword search over general financial press.
#[derive(Clone)]
pub struct NewsDataClient {
    api_key: Option<String>,
    client: Client,
    gateway: FetchGateway,
}

impl NewsDataClient {
    pub fn new(api_key: Option<String>, gateway: FetchGateway) -> Self {
        Self {
            api_key,
            client: crate::http_client(),
            gateway,
        }
    }

    pub fn from_env(gateway: FetchGateway) -> Self {
        Self::new(std::env::var("NEWSAPI_KEY").ok(), gateway)
    }
}

#[async_trait]
impl NewsProvider for NewsDataClient {
    fn tag(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_news(&self, symbol: &str, days_back: u32) -> Result<Vec<Article>, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("NewsAPI key not configured, skipping");
            return Ok(Vec::new());
        };

        let from = Utc::now() - Duration::days(days_back as i64);
        // Bias the search toward market coverage of the instrument rather
        // than any mention of the symbol string.
        let query = format!("\"{symbol}\" stock OR \"{symbol}\" shares OR \"{symbol}\" market");
        let url = format!("{BASE_URL}/everything");

        let body: NewsApiResponse = self
            .gateway
            .call("newsapi.news", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("q", query.as_str()),
                        ("from", &from.format("%Y-%m-%d").to_string()),
                        ("sortBy", "publishedAt"),
                        ("language", "en"),
                        ("pageSize", &PAGE_SIZE.to_string()),
                        ("apiKey", api_key),
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

        Ok(body
            .articles
            .into_iter()
            .map(|a| Article {
                title: a.title,
                summary: a.description.unwrap_or_default(),
                source: a.source.name.unwrap_or_else(|| "NewsAPI".to_string()),
                url: a.url,
                published: a
                    .published_at
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(Utc::now),
                symbol: symbol.to_string(),
                provider: self.tag().to_string(),
                sentiment_score: None,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: String,
    description: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    source: NewsApiSource,
}

#[derive(Debug, Default, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}
