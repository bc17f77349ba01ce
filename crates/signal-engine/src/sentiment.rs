use chrono::Utc;
use signal_core::{AggregatedNews, SentimentConfig, SentimentSummary, Signal, TradeAction};

/// Keyword score for one text: (positive hits − negative hits) over total
/// hits, 0 when no keyword matches at all.
pub fn score_text(text: &str, config: &SentimentConfig) -> f64 {
    let text = text.to_lowercase();
    let positive = config
        .positive_words
        .iter()
        .filter(|w| text.contains(w.as_str()))
        .count() as f64;
    let negative = config
        .negative_words
        .iter()
        .filter(|w| text.contains(w.as_str()))
        .count() as f64;

    if positive + negative == 0.0 {
        return 0.0;
    }
    (positive - negative) / (positive + negative)
}

/// Mean per-article score plus the positive/neutral/negative distribution.
pub fn summarize(news: &AggregatedNews, config: &SentimentConfig) -> SentimentSummary {
    let mut summary = SentimentSummary {
        overall_score: 0.0,
        article_count: news.articles.len(),
        positive: 0,
        neutral: 0,
        negative: 0,
    };
    if news.articles.is_empty() {
        return summary;
    }

    let mut total = 0.0;
    for article in &news.articles {
        let text = format!("{} {}", article.title, article.summary);
        let score = score_text(&text, config);
        total += score;

        if score > config.threshold {
            summary.positive += 1;
        } else if score < -config.threshold {
            summary.negative += 1;
        } else {
            summary.neutral += 1;
        }
    }
    summary.overall_score = total / news.articles.len() as f64;
    summary
}

/// Directional call from aggregated news. Below the minimum article count
/// the evidence is too thin and no signal is produced; that is not a HOLD.
pub fn sentiment_signal(
    symbol: &str,
    news: &AggregatedNews,
    config: &SentimentConfig,
) -> Option<Signal> {
    let summary = summarize(news, config);
    if summary.article_count < config.min_articles {
        tracing::info!(
            symbol,
            articles = summary.article_count,
            required = config.min_articles,
            "insufficient news articles for a sentiment signal"
        );
        return None;
    }

    let score = summary.overall_score;
    let (action, reason) = if score > config.threshold {
        (
            TradeAction::Buy,
            format!("Positive sentiment (score: {score:.3})"),
        )
    } else if score < -config.threshold {
        (
            TradeAction::Sell,
            format!("Negative sentiment (score: {score:.3})"),
        )
    } else {
        (
            TradeAction::Hold,
            format!("Neutral sentiment (score: {score:.3})"),
        )
    };

    Some(Signal {
        symbol: symbol.to_string(),
        action,
        confidence: score.abs(),
        reason,
        metrics: serde_json::json!({
            "method": "sentiment",
            "sentiment_score": score,
            "article_count": summary.article_count,
            "positive": summary.positive,
            "neutral": summary.neutral,
            "negative": summary.negative,
        }),
        created_at: Utc::now(),
    })
}
