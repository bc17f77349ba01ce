//! Multi-source news aggregation. Providers are queried one at a time in a
//! fixed priority order so the shared rate-limit budget is never hit by
//! overlapping requests, then the merged list is deduplicated by headline
//! similarity.

mod dedup;

pub use dedup::{dedup_articles, jaccard_similarity, DedupMode};

use chrono::Utc;
use signal_core::{AggregatedNews, Article, NewsProvider};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct NewsAggregator {
    /// Priority order; earlier providers win dedup ties.
    providers: Vec<Arc<dyn NewsProvider>>,
    dedup: DedupMode,
}

impl NewsAggregator {
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>) -> Self {
        Self {
            providers,
            dedup: DedupMode::Title,
        }
    }

    /// Compare title plus summary instead of headlines alone. For rosters of
    /// social-style sources whose headlines are too short to tell apart.
    pub fn with_dedup_mode(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    /// Collect news for one instrument from every configured provider.
    /// A provider failure is logged and recorded as a zero count; it never
    /// aborts the aggregation.
    pub async fn aggregate(&self, symbol: &str, days_back: u32) -> AggregatedNews {
        let mut collected: Vec<Article> = Vec::new();
        let mut source_breakdown: BTreeMap<String, usize> = BTreeMap::new();

        for provider in &self.providers {
            let tag = provider.tag();
            match provider.fetch_news(symbol, days_back).await {
                Ok(articles) => {
                    tracing::debug!(provider = tag, symbol, count = articles.len(), "news fetched");
                    source_breakdown.insert(tag.to_string(), articles.len());
                    collected.extend(articles);
                }
                Err(err) => {
                    tracing::warn!(provider = tag, symbol, error = %err, "news fetch failed");
                    source_breakdown.insert(tag.to_string(), 0);
                }
            }
        }

        let raw_count = collected.len();
        let articles = dedup_articles(collected, self.dedup);
        tracing::info!(
            symbol,
            raw = raw_count,
            kept = articles.len(),
            "news aggregation complete"
        );

        AggregatedNews {
            total_articles: articles.len(),
            articles,
            raw_count,
            source_breakdown,
            generated_at: Utc::now(),
        }
    }
}
