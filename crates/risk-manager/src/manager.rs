use signal_core::{Position, RiskLimits, Signal};

use crate::session::TradingSession;

/// Base account fraction risked per trade, before volatility and confidence
/// scaling.
const RISK_PER_TRADE: f64 = 0.02;

/// Verdict of a risk check. Never an error: a rejected trade is a normal
/// outcome carrying its reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskCheck {
    pub approved: bool,
    pub reason: String,
}

impl RiskCheck {
    fn approved() -> Self {
        Self {
            approved: true,
            reason: "within risk limits".to_string(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: reason.into(),
        }
    }
}

pub struct RiskManager {
    limits: RiskLimits,
}

impl RiskManager {
    pub fn new(limits: RiskLimits) -> Self {
        Self { limits }
    }

    pub fn from_env() -> Self {
        Self::new(RiskLimits::from_env())
    }

    /// Gate one signal against the session's daily loss, the open-position
    /// ceiling, and duplicate exposure to the same instrument.
    pub async fn validate_trade(
        &self,
        signal: &Signal,
        open_positions: &[Position],
        session: &TradingSession,
    ) -> RiskCheck {
        let daily_pnl = session.daily_pnl().await;
        if daily_pnl < -self.limits.max_daily_loss {
            let check = RiskCheck::rejected(format!(
                "daily loss limit reached ({daily_pnl:.2} < -{:.2})",
                self.limits.max_daily_loss
            ));
            tracing::warn!(symbol = %signal.symbol, reason = %check.reason, "trade rejected");
            return check;
        }

        if open_positions.len() >= self.limits.max_open_positions {
            let check = RiskCheck::rejected(format!(
                "maximum open positions reached ({})",
                self.limits.max_open_positions
            ));
            tracing::warn!(symbol = %signal.symbol, reason = %check.reason, "trade rejected");
            return check;
        }

        if open_positions.iter().any(|p| p.symbol == signal.symbol) {
            let check =
                RiskCheck::rejected(format!("position already open for {}", signal.symbol));
            tracing::warn!(symbol = %signal.symbol, reason = %check.reason, "trade rejected");
            return check;
        }

        RiskCheck::approved()
    }

    /// Bounded position size: 2% of balance, scaled down by volatility and
    /// by the signal's confidence, capped at the configured balance
    /// fraction. Pure computation.
    pub fn size_position(&self, signal: &Signal, account_balance: f64, volatility: f64) -> f64 {
        let risk_amount = account_balance * RISK_PER_TRADE;
        let scaled = risk_amount * (1.0 / (1.0 + volatility)) * signal.confidence;
        let cap = account_balance * self.limits.max_position_fraction;
        scaled.min(cap)
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }
}
