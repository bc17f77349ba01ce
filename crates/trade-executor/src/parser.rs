use signal_core::TradeAction;

/// Parsed form of `ACTION SYMBOL SL=<float> TP=<float> [VOL=<float>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSignal {
    pub action: TradeAction,
    pub symbol: String,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub volume: f64,
}

/// Parse a textual trade instruction. Unknown tokens are ignored; a missing
/// action/symbol/SL/TP, a non-numeric value, or an action other than
/// BUY/SELL is logged and yields `None`. This boundary never panics.
pub fn parse_signal(text: &str, default_volume: f64) -> Option<ParsedSignal> {
    let upper = text.to_uppercase();
    let parts: Vec<&str> = upper.split_whitespace().collect();

    if parts.len() < 2 {
        tracing::error!(text, "signal text too short");
        return None;
    }

    let action = match parts[0] {
        "BUY" => TradeAction::Buy,
        "SELL" => TradeAction::Sell,
        other => {
            tracing::error!(text, action = other, "unsupported action in signal text");
            return None;
        }
    };
    let symbol = parts[1].to_string();

    let mut stop_loss = None;
    let mut take_profit = None;
    let mut volume = default_volume;

    for part in &parts[2..] {
        if let Some(value) = part.strip_prefix("SL=") {
            stop_loss = Some(parse_number(value, text, "SL")?);
        } else if let Some(value) = part.strip_prefix("TP=") {
            take_profit = Some(parse_number(value, text, "TP")?);
        } else if let Some(value) = part.strip_prefix("VOL=") {
            volume = parse_number(value, text, "VOL")?;
        }
    }

    let (Some(stop_loss), Some(take_profit)) = (stop_loss, take_profit) else {
        tracing::error!(text, "signal text missing SL= or TP=");
        return None;
    };

    Some(ParsedSignal {
        action,
        symbol,
        stop_loss,
        take_profit,
        volume,
    })
}

fn parse_number(value: &str, text: &str, field: &str) -> Option<f64> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::error!(text, field, value, "non-numeric value in signal text");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_signal() {
        let parsed = parse_signal("BUY AAPL SL=150.00 TP=160.00", 0.01).unwrap();
        assert_eq!(parsed.action, TradeAction::Buy);
        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.stop_loss, 150.0);
        assert_eq!(parsed.take_profit, 160.0);
        assert_eq!(parsed.volume, 0.01);
    }

    #[test]
    fn explicit_volume_overrides_default() {
        let parsed = parse_signal("sell eurusd sl=1.10 tp=1.05 vol=0.5", 0.01).unwrap();
        assert_eq!(parsed.action, TradeAction::Sell);
        assert_eq!(parsed.symbol, "EURUSD");
        assert_eq!(parsed.volume, 0.5);
    }

    #[test]
    fn hold_action_is_rejected() {
        assert!(parse_signal("HOLD AAPL SL=150.00 TP=160.00", 0.01).is_none());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(parse_signal("BUY", 0.01).is_none());
        assert!(parse_signal("", 0.01).is_none());
        assert!(parse_signal("BUY AAPL SL=abc TP=160.00", 0.01).is_none());
        assert!(parse_signal("BUY AAPL TP=160.00", 0.01).is_none());
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let parsed = parse_signal("BUY AAPL NOW SL=150.00 TP=160.00 URGENT", 0.01).unwrap();
        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.stop_loss, 150.0);
    }
}
