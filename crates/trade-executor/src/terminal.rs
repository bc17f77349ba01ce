use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use signal_core::TradeAction;

/// Return code the terminal reports for a filled order. Anything else is a
/// failure, whatever the accompanying message says.
pub const RETCODE_DONE: i32 = 10009;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    /// Whether the symbol is enabled for trading in the terminal session.
    pub visible: bool,
}

/// Current top-of-book prices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tick {
    pub bid: f64,
    pub ask: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub action: TradeAction,
    pub volume: f64,
    /// Fill price: ask for BUY, bid for SELL.
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub retcode: i32,
    pub comment: String,
}

impl OrderResult {
    pub fn is_done(&self) -> bool {
        self.retcode == RETCODE_DONE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub balance: f64,
    pub equity: f64,
    pub margin: f64,
    pub margin_free: f64,
    pub profit: f64,
}

/// Open position as the terminal reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalPosition {
    pub ticket: u64,
    pub symbol: String,
    pub action: TradeAction,
    pub volume: f64,
    pub price_open: f64,
    pub price_current: f64,
    pub profit: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Stateful brokerage terminal session. One implementation per terminal
/// vendor; tests use the in-process paper terminal.
#[async_trait]
pub trait BrokerTerminal: Send + Sync {
    /// Symbol metadata, `None` when the terminal does not know the symbol.
    async fn symbol_info(&self, symbol: &str) -> Option<SymbolInfo>;

    /// Enable a symbol that exists but is not currently visible.
    async fn select_symbol(&self, symbol: &str) -> bool;

    async fn tick(&self, symbol: &str) -> Option<Tick>;

    /// Submit a market order. The result's return code decides success.
    async fn order_send(&self, request: &OrderRequest) -> OrderResult;

    async fn account_info(&self) -> Option<AccountInfo>;

    async fn open_positions(&self) -> Vec<TerminalPosition>;
}
