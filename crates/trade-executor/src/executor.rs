use risk_manager::TradingSession;
use signal_core::{ExecutorConfig, PulseError, TradeAction};
use std::sync::Arc;

use crate::parser::{parse_signal, ParsedSignal};
use crate::terminal::{BrokerTerminal, OrderRequest};

pub struct TradeExecutor {
    terminal: Arc<dyn BrokerTerminal>,
    session: Arc<TradingSession>,
    config: ExecutorConfig,
}

impl TradeExecutor {
    pub fn new(
        terminal: Arc<dyn BrokerTerminal>,
        session: Arc<TradingSession>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            terminal,
            session,
            config,
        }
    }

    /// Parse and execute one textual trade instruction. All failure modes
    /// are logged and reported as `false`; nothing escapes this boundary.
    pub async fn process_signal(&self, text: &str) -> bool {
        tracing::info!(text, "processing signal");

        let Some(parsed) = parse_signal(text, self.config.default_volume) else {
            return false;
        };

        if self.session.trades_executed().await >= self.config.max_daily_trades {
            tracing::warn!(
                symbol = %parsed.symbol,
                limit = self.config.max_daily_trades,
                "daily trade limit reached, signal dropped"
            );
            return false;
        }

        match self.execute(&parsed).await {
            Ok(price) => {
                self.session.count_trade().await;
                tracing::info!(
                    action = parsed.action.as_str(),
                    symbol = %parsed.symbol,
                    price,
                    volume = parsed.volume,
                    "trade executed"
                );
                true
            }
            Err(err) => {
                tracing::error!(symbol = %parsed.symbol, error = %err, "trade execution failed");
                false
            }
        }
    }

    async fn execute(&self, parsed: &ParsedSignal) -> Result<f64, PulseError> {
        let info = self
            .terminal
            .symbol_info(&parsed.symbol)
            .await
            .ok_or_else(|| {
                PulseError::InvalidSignalText(format!("symbol {} not found", parsed.symbol))
            })?;

        if !info.visible && !self.terminal.select_symbol(&parsed.symbol).await {
            return Err(PulseError::InvalidSignalText(format!(
                "failed to select symbol {}",
                parsed.symbol
            )));
        }

        let tick = self.terminal.tick(&parsed.symbol).await.ok_or_else(|| {
            PulseError::BrokerOrderFailed {
                code: 0,
                message: format!("no tick for {}", parsed.symbol),
            }
        })?;

        let price = match parsed.action {
            TradeAction::Buy => tick.ask,
            _ => tick.bid,
        };

        let request = OrderRequest {
            symbol: parsed.symbol.clone(),
            action: parsed.action,
            volume: parsed.volume,
            price,
            stop_loss: parsed.stop_loss,
            take_profit: parsed.take_profit,
        };

        let result = self.terminal.order_send(&request).await;
        if !result.is_done() {
            return Err(PulseError::BrokerOrderFailed {
                code: result.retcode,
                message: result.comment,
            });
        }
        Ok(price)
    }
}
