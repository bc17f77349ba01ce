use chrono::Utc;
use signal_core::{PriceBar, Signal, TradeAction};

use crate::indicators::{ema, rsi, sma};

const SMA_PERIOD: usize = 20;
const EMA_PERIOD: usize = 20;
const RSI_PERIOD: usize = 14;

/// Bars required before the indicators are all defined.
const MIN_BARS: usize = SMA_PERIOD;

/// Baseline confidence of a rule-based technical call. The rule is coarse,
/// so directional calls never outrank a strong sentiment score on their own.
const DIRECTIONAL_CONFIDENCE: f64 = 0.6;
const HOLD_CONFIDENCE: f64 = 0.5;

/// Score the latest bar against SMA(20) and RSI(14). `None` when the series
/// is too short for the indicators, which callers treat as no signal rather
/// than HOLD.
pub fn technical_signal(symbol: &str, bars: &[PriceBar]) -> Option<Signal> {
    if bars.len() < MIN_BARS {
        tracing::debug!(symbol, bars = bars.len(), "too few bars for technical scoring");
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma_last = *sma(&closes, SMA_PERIOD).last()?;
    let ema_last = *ema(&closes, EMA_PERIOD).last()?;
    let rsi_last = *rsi(&closes, RSI_PERIOD).last()?;
    let close = *closes.last()?;

    let (action, confidence, reason) = if close > sma_last && rsi_last < 70.0 {
        (
            TradeAction::Buy,
            DIRECTIONAL_CONFIDENCE,
            format!(
                "Price ({close:.2}) above SMA ({sma_last:.2}) and RSI ({rsi_last:.2}) indicates potential upside"
            ),
        )
    } else if close < sma_last && rsi_last > 30.0 {
        (
            TradeAction::Sell,
            DIRECTIONAL_CONFIDENCE,
            format!(
                "Price ({close:.2}) below SMA ({sma_last:.2}) and RSI ({rsi_last:.2}) indicates potential downside"
            ),
        )
    } else {
        (
            TradeAction::Hold,
            HOLD_CONFIDENCE,
            format!(
                "Price ({close:.2}) relative to SMA ({sma_last:.2}) and RSI ({rsi_last:.2}) suggests holding"
            ),
        )
    };

    Some(Signal {
        symbol: symbol.to_string(),
        action,
        confidence,
        reason,
        metrics: serde_json::json!({
            "method": "technical",
            "close": close,
            "sma_20": sma_last,
            "ema_20": ema_last,
            "rsi_14": rsi_last,
        }),
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        let start = Utc::now() - Duration::days(closes.len() as i64);
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    #[test]
    fn too_few_bars_gives_no_signal() {
        let bars = bars_from_closes(&[100.0; 10]);
        assert!(technical_signal("AAPL", &bars).is_none());
    }

    #[test]
    fn close_above_sma_with_moderate_rsi_is_buy() {
        // Alternate small up and down moves to pin RSI near 50, then close
        // above the average.
        let mut closes: Vec<f64> = Vec::new();
        for i in 0..30 {
            closes.push(if i % 2 == 0 { 100.0 } else { 101.0 });
        }
        closes.push(105.0);

        let signal = technical_signal("AAPL", &bars_from_closes(&closes)).unwrap();
        assert_eq!(signal.action, TradeAction::Buy);
        assert!(signal.reason.contains("105.00"));
        assert!(signal.reason.contains("upside"));
    }

    #[test]
    fn close_below_sma_with_high_rsi_is_sell() {
        // Long rise keeps RSI elevated; a sharp final drop puts the close
        // under the SMA while RSI stays above 30.
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        closes.push(90.0);

        let signal = technical_signal("TSLA", &bars_from_closes(&closes)).unwrap();
        assert_eq!(signal.action, TradeAction::Sell);
        assert!(signal.reason.contains("downside"));
    }

    #[test]
    fn flat_series_holds() {
        // Flat closes sit exactly on the SMA, so neither branch fires.
        let signal = technical_signal("SPY", &bars_from_closes(&[100.0; 30])).unwrap();
        assert_eq!(signal.action, TradeAction::Hold);
    }

    #[test]
    fn metrics_carry_indicator_values() {
        let signal = technical_signal("SPY", &bars_from_closes(&[100.0; 30])).unwrap();
        assert_eq!(signal.metrics["close"], 100.0);
        assert_eq!(signal.metrics["sma_20"], 100.0);
        assert_eq!(signal.metrics["method"], "technical");
    }
}
