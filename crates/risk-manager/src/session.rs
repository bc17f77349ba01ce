use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

/// Mutable per-day trading state. All reads and updates happen inside one
/// mutex scope; the state resets itself the first time it is touched after
/// the UTC day boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub trading_day: NaiveDate,
    pub daily_pnl: f64,
    pub trades_executed: usize,
}

impl SessionState {
    fn fresh(day: NaiveDate) -> Self {
        Self {
            trading_day: day,
            daily_pnl: 0.0,
            trades_executed: 0,
        }
    }
}

pub struct TradingSession {
    state: Mutex<SessionState>,
}

impl TradingSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState::fresh(Utc::now().date_naive())),
        }
    }

    /// Running realized P&L for the current UTC day.
    pub async fn daily_pnl(&self) -> f64 {
        let mut state = self.state.lock().await;
        Self::roll_over(&mut state);
        state.daily_pnl
    }

    /// Trades executed so far in the current UTC day.
    pub async fn trades_executed(&self) -> usize {
        let mut state = self.state.lock().await;
        Self::roll_over(&mut state);
        state.trades_executed
    }

    /// Add a realized profit or loss to the daily total.
    pub async fn record_realized_pnl(&self, delta: f64) {
        let mut state = self.state.lock().await;
        Self::roll_over(&mut state);
        state.daily_pnl += delta;
    }

    /// Count one executed trade against the daily total.
    pub async fn count_trade(&self) {
        let mut state = self.state.lock().await;
        Self::roll_over(&mut state);
        state.trades_executed += 1;
    }

    pub async fn snapshot(&self) -> SessionState {
        let mut state = self.state.lock().await;
        Self::roll_over(&mut state);
        state.clone()
    }

    #[cfg(test)]
    pub(crate) async fn force_day(&self, day: NaiveDate) {
        self.state.lock().await.trading_day = day;
    }

    fn roll_over(state: &mut SessionState) {
        let today = Utc::now().date_naive();
        if state.trading_day != today {
            tracing::info!(
                previous_day = %state.trading_day,
                pnl = state.daily_pnl,
                trades = state.trades_executed,
                "trading day rolled over, session reset"
            );
            *state = SessionState::fresh(today);
        }
    }
}

impl Default for TradingSession {
    fn default() -> Self {
        Self::new()
    }
}
