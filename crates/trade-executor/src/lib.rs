//! Textual signal parsing and brokerage submission. The executor is the one
//! boundary that talks to a terminal session; everything it can get wrong is
//! logged and reported as a failed outcome, never a panic.

mod executor;
pub mod paper;
mod parser;
pub mod terminal;

pub use executor::TradeExecutor;
pub use paper::PaperTerminal;
pub use parser::{parse_signal, ParsedSignal};
pub use terminal::{
    AccountInfo, BrokerTerminal, OrderRequest, OrderResult, SymbolInfo, TerminalPosition, Tick,
    RETCODE_DONE,
};

#[cfg(test)]
mod tests {
    use super::*;
    use risk_manager::TradingSession;
    use signal_core::{ExecutorConfig, TradeAction};
    use std::sync::Arc;

    fn executor_with(terminal: Arc<PaperTerminal>, max_daily_trades: usize) -> TradeExecutor {
        TradeExecutor::new(
            terminal,
            Arc::new(TradingSession::new()),
            ExecutorConfig {
                max_daily_trades,
                default_volume: 0.01,
            },
        )
    }

    #[tokio::test]
    async fn buy_fills_at_ask_with_stops_attached() {
        let terminal = Arc::new(PaperTerminal::new(10_000.0).with_symbol("AAPL", 154.9, 155.1));
        let executor = executor_with(terminal.clone(), 10);

        assert!(executor.process_signal("BUY AAPL SL=150.00 TP=160.00").await);

        let orders = terminal.submitted_orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].action, TradeAction::Buy);
        assert_eq!(orders[0].price, 155.1);
        assert_eq!(orders[0].stop_loss, 150.0);
        assert_eq!(orders[0].take_profit, 160.0);
        assert_eq!(orders[0].volume, 0.01);
    }

    #[tokio::test]
    async fn sell_fills_at_bid() {
        let terminal = Arc::new(PaperTerminal::new(10_000.0).with_symbol("EURUSD", 1.0850, 1.0852));
        let executor = executor_with(terminal.clone(), 10);

        assert!(
            executor
                .process_signal("SELL EURUSD SL=1.10 TP=1.05 VOL=0.5")
                .await
        );

        let orders = terminal.submitted_orders().await;
        assert_eq!(orders[0].price, 1.0850);
        assert_eq!(orders[0].volume, 0.5);
    }

    #[tokio::test]
    async fn malformed_text_fails_without_orders() {
        let terminal = Arc::new(PaperTerminal::new(10_000.0).with_symbol("AAPL", 154.9, 155.1));
        let executor = executor_with(terminal.clone(), 10);

        assert!(!executor.process_signal("HOLD AAPL SL=150 TP=160").await);
        assert!(!executor.process_signal("BUY AAPL SL=oops TP=160").await);
        assert!(terminal.submitted_orders().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_symbol_fails() {
        let terminal = Arc::new(PaperTerminal::new(10_000.0));
        let executor = executor_with(terminal.clone(), 10);

        assert!(!executor.process_signal("BUY GHOST SL=1.0 TP=2.0").await);
        assert!(terminal.submitted_orders().await.is_empty());
    }

    #[tokio::test]
    async fn daily_trade_ceiling_blocks_further_signals() {
        let terminal = Arc::new(PaperTerminal::new(10_000.0).with_symbol("AAPL", 154.9, 155.1));
        let executor = executor_with(terminal.clone(), 2);

        assert!(executor.process_signal("BUY AAPL SL=150 TP=160").await);
        assert!(executor.process_signal("BUY AAPL SL=150 TP=160").await);
        assert!(!executor.process_signal("BUY AAPL SL=150 TP=160").await);
        assert_eq!(terminal.submitted_orders().await.len(), 2);
    }
}
