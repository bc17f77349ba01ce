//! Signal scoring and fusion. Two independent methods, a keyword sentiment
//! read over aggregated news and an indicator rule over daily bars, are
//! fused into one explainable decision per instrument. Too little evidence
//! on both sides means no signal at all, which callers must treat
//! differently from HOLD.

mod fusion;
mod indicators;
mod sentiment;
mod technical;

pub use fusion::fuse;
pub use indicators::{ema, rsi, sma};
pub use sentiment::{score_text, sentiment_signal, summarize};
pub use technical::technical_signal;

use signal_core::{AggregatedNews, FusionConfig, PriceBar, SentimentConfig, Signal};

pub struct SignalEngine {
    sentiment: SentimentConfig,
    fusion: FusionConfig,
}

impl SignalEngine {
    pub fn new(sentiment: SentimentConfig, fusion: FusionConfig) -> Self {
        Self { sentiment, fusion }
    }

    pub fn from_env() -> Self {
        Self::new(SentimentConfig::from_env(), FusionConfig::default())
    }

    /// Fused decision for one instrument. `None` when neither method has
    /// enough evidence to score.
    pub fn generate(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        news: &AggregatedNews,
    ) -> Option<Signal> {
        let technical = technical_signal(symbol, bars);
        let sentiment = sentiment_signal(symbol, news, &self.sentiment);

        let fused = fuse(technical, sentiment, &self.fusion);
        match &fused {
            Some(signal) => tracing::info!(
                symbol,
                action = signal.action.as_str(),
                confidence = signal.confidence,
                "signal generated"
            ),
            None => tracing::info!(symbol, "no signal, insufficient evidence"),
        }
        fused
    }

    pub fn sentiment_config(&self) -> &SentimentConfig {
        &self.sentiment
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(SentimentConfig::default(), FusionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use signal_core::{Article, TradeAction};
    use std::collections::BTreeMap;

    fn news_from_titles(titles: &[&str]) -> AggregatedNews {
        let articles: Vec<Article> = titles
            .iter()
            .map(|t| Article {
                title: t.to_string(),
                summary: String::new(),
                source: "Test".to_string(),
                url: String::new(),
                published: Utc::now(),
                symbol: "AAPL".to_string(),
                provider: "test".to_string(),
                sentiment_score: None,
            })
            .collect();
        AggregatedNews {
            total_articles: articles.len(),
            raw_count: articles.len(),
            articles,
            source_breakdown: BTreeMap::new(),
            generated_at: Utc::now(),
        }
    }

    fn flat_bars(count: usize) -> Vec<PriceBar> {
        let start = Utc::now() - Duration::days(count as i64);
        (0..count)
            .map(|i| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: 1_000.0,
            })
            .collect()
    }

    #[test]
    fn strong_sentiment_overrides_technical_hold() {
        let engine = SignalEngine::default();
        let news = news_from_titles(&[
            "shares rise on strong profit",
            "growth beat expectations",
            "bullish outlook as gains continue",
            "positive quarter with increase in revenue",
            "quarterly report published today",
        ]);

        // Flat bars score HOLD; four positive articles and one neutral
        // average out high confidence and win the fusion.
        let signal = engine.generate("AAPL", &flat_bars(30), &news).unwrap();
        assert_eq!(signal.action, TradeAction::Buy);
        assert!(signal.confidence > 0.7);
    }

    #[test]
    fn no_bars_and_too_few_articles_is_no_signal() {
        let engine = SignalEngine::default();
        let news = news_from_titles(&["strong profit", "weak loss"]);
        assert!(engine.generate("AAPL", &[], &news).is_none());
    }

    #[test]
    fn technical_alone_still_signals() {
        let engine = SignalEngine::default();
        let news = news_from_titles(&[]);
        let signal = engine.generate("SPY", &flat_bars(30), &news).unwrap();
        assert_eq!(signal.action, TradeAction::Hold);
    }
}
