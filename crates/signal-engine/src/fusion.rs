use signal_core::{FusionConfig, Signal};

/// Combine the technical and sentiment calls into one decision.
///
/// Either method alone passes through untouched. With both present, a method
/// whose confidence clears the high-confidence cutoff wins outright;
/// otherwise the higher-confidence call wins regardless of agreement, and an
/// exact tie falls back to the technical call.
pub fn fuse(
    technical: Option<Signal>,
    sentiment: Option<Signal>,
    config: &FusionConfig,
) -> Option<Signal> {
    match (technical, sentiment) {
        (None, None) => None,
        (Some(t), None) => Some(t),
        (None, Some(s)) => Some(s),
        (Some(t), Some(s)) => {
            if t.confidence > config.high_confidence && t.confidence >= s.confidence {
                return Some(t);
            }
            if s.confidence > config.high_confidence && s.confidence > t.confidence {
                return Some(s);
            }
            if s.confidence > t.confidence {
                Some(s)
            } else {
                Some(t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use signal_core::TradeAction;

    fn signal(action: TradeAction, confidence: f64) -> Signal {
        Signal {
            symbol: "AAPL".to_string(),
            action,
            confidence,
            reason: format!("{action} test"),
            metrics: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn single_method_passes_through() {
        let t = signal(TradeAction::Buy, 0.6);
        let fused = fuse(Some(t), None, &FusionConfig::default()).unwrap();
        assert_eq!(fused.action, TradeAction::Buy);
        assert!(fuse(None, None, &FusionConfig::default()).is_none());
    }

    #[test]
    fn high_confidence_sentiment_wins_outright() {
        let t = signal(TradeAction::Sell, 0.6);
        let s = signal(TradeAction::Buy, 0.9);
        let fused = fuse(Some(t), Some(s), &FusionConfig::default()).unwrap();
        assert_eq!(fused.action, TradeAction::Buy);
    }

    #[test]
    fn disagreement_resolves_to_higher_confidence() {
        let t = signal(TradeAction::Buy, 0.6);
        let s = signal(TradeAction::Sell, 0.4);
        let fused = fuse(Some(t), Some(s), &FusionConfig::default()).unwrap();
        assert_eq!(fused.action, TradeAction::Buy);
        assert_eq!(fused.confidence, 0.6);
    }

    #[test]
    fn equal_confidence_prefers_technical() {
        let t = signal(TradeAction::Hold, 0.5);
        let s = signal(TradeAction::Buy, 0.5);
        let fused = fuse(Some(t), Some(s), &FusionConfig::default()).unwrap();
        assert_eq!(fused.action, TradeAction::Hold);
        assert_eq!(fused.metrics, serde_json::Value::Null);
    }
}
