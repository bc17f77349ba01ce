use signal_core::Article;
use std::collections::HashSet;

/// Which text fields feed the similarity comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupMode {
    /// Title only. Cross-provider press coverage tends to share headlines
    /// nearly verbatim.
    Title,
    /// Title plus summary, for sources where headlines alone are too short
    /// to compare.
    TitleAndSummary,
}

impl DedupMode {
    /// Similarity above this marks a duplicate.
    pub fn threshold(&self) -> f64 {
        match self {
            DedupMode::Title => 0.8,
            DedupMode::TitleAndSummary => 0.7,
        }
    }

    fn text_of(&self, article: &Article) -> String {
        match self {
            DedupMode::Title => article.title.clone(),
            DedupMode::TitleAndSummary => format!("{} {}", article.title, article.summary),
        }
    }
}

/// Jaccard index of the lowercased word sets of two texts.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let words_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();

    if words_a.is_empty() && words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// Drop near-duplicates, keeping the first occurrence in input order. The
/// input arrives in provider priority order, so earlier providers win ties.
/// Quadratic, fine for the bounded per-call article volume.
pub fn dedup_articles(articles: Vec<Article>, mode: DedupMode) -> Vec<Article> {
    let threshold = mode.threshold();
    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
    let mut kept_text: Vec<String> = Vec::with_capacity(articles.len());

    for article in articles {
        let text = mode.text_of(&article);
        let duplicate = kept_text
            .iter()
            .any(|seen| jaccard_similarity(seen, &text) > threshold);
        if !duplicate {
            kept_text.push(text);
            kept.push(article);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str, provider: &str) -> Article {
        Article {
            title: title.to_string(),
            summary: String::new(),
            source: "Test".to_string(),
            url: String::new(),
            published: Utc::now(),
            symbol: "AAPL".to_string(),
            provider: provider.to_string(),
            sentiment_score: None,
        }
    }

    #[test]
    fn identical_titles_collapse_to_first_seen() {
        let input = vec![
            article("Apple beats earnings expectations", "finnhub"),
            article("Apple beats earnings expectations", "newsapi"),
        ];
        let out = dedup_articles(input, DedupMode::Title);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].provider, "finnhub");
    }

    #[test]
    fn dissimilar_titles_both_survive() {
        let input = vec![
            article("Apple beats earnings expectations", "finnhub"),
            article("Tesla recalls vehicles over software bug", "finnhub"),
        ];
        let out = dedup_articles(input, DedupMode::Title);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let input = vec![
            article("Apple beats earnings expectations", "finnhub"),
            article("Apple beats earnings expectations today", "newsapi"),
            article("Fed holds rates steady", "alphavantage"),
        ];
        let once = dedup_articles(input, DedupMode::Title);
        let twice = dedup_articles(once.clone(), DedupMode::Title);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.title, b.title);
        }
    }

    #[test]
    fn jaccard_handles_empty_and_identical() {
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("one two three", "one two three"), 1.0);
        let half = jaccard_similarity("one two", "one three");
        assert!((half - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn combined_mode_uses_summary_text() {
        let mut a = article("Market update", "finnhub");
        a.summary = "Apple shares climbed after strong iPhone sales".to_string();
        let mut b = article("Market update", "newsapi");
        b.summary = "Oil prices fell on supply concerns in the gulf region".to_string();

        // Title-only sees identical headlines; combined mode keeps both.
        assert_eq!(dedup_articles(vec![a.clone(), b.clone()], DedupMode::Title).len(), 1);
        assert_eq!(
            dedup_articles(vec![a, b], DedupMode::TitleAndSummary).len(),
            2
        );
    }
}
