use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::terminal::{
    AccountInfo, BrokerTerminal, OrderRequest, OrderResult, SymbolInfo, TerminalPosition, Tick,
    RETCODE_DONE,
};

/// In-process terminal that fills every order at the submitted price.
/// Used by tests and dry runs; it keeps positions in memory and never
/// touches a real brokerage.
pub struct PaperTerminal {
    ticks: HashMap<String, Tick>,
    balance: f64,
    state: Mutex<PaperState>,
}

#[derive(Default)]
struct PaperState {
    positions: Vec<TerminalPosition>,
    next_ticket: u64,
    orders: Vec<OrderRequest>,
}

impl PaperTerminal {
    pub fn new(balance: f64) -> Self {
        Self {
            ticks: HashMap::new(),
            balance,
            state: Mutex::new(PaperState::default()),
        }
    }

    /// Register a tradable symbol with fixed top-of-book prices.
    pub fn with_symbol(mut self, symbol: &str, bid: f64, ask: f64) -> Self {
        self.ticks.insert(symbol.to_string(), Tick { bid, ask });
        self
    }

    /// Orders accepted so far, oldest first.
    pub async fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.state.lock().await.orders.clone()
    }
}

#[async_trait]
impl BrokerTerminal for PaperTerminal {
    async fn symbol_info(&self, symbol: &str) -> Option<SymbolInfo> {
        self.ticks.get(symbol).map(|_| SymbolInfo {
            name: symbol.to_string(),
            visible: true,
        })
    }

    async fn select_symbol(&self, symbol: &str) -> bool {
        self.ticks.contains_key(symbol)
    }

    async fn tick(&self, symbol: &str) -> Option<Tick> {
        self.ticks.get(symbol).copied()
    }

    async fn order_send(&self, request: &OrderRequest) -> OrderResult {
        if !self.ticks.contains_key(&request.symbol) {
            return OrderResult {
                retcode: 10013,
                comment: format!("unknown symbol {}", request.symbol),
            };
        }

        let mut state = self.state.lock().await;
        state.next_ticket += 1;
        let ticket = state.next_ticket;
        state.positions.push(TerminalPosition {
            ticket,
            symbol: request.symbol.clone(),
            action: request.action,
            volume: request.volume,
            price_open: request.price,
            price_current: request.price,
            profit: 0.0,
            stop_loss: request.stop_loss,
            take_profit: request.take_profit,
        });
        state.orders.push(request.clone());

        OrderResult {
            retcode: RETCODE_DONE,
            comment: "done".to_string(),
        }
    }

    async fn account_info(&self) -> Option<AccountInfo> {
        Some(AccountInfo {
            balance: self.balance,
            equity: self.balance,
            margin: 0.0,
            margin_free: self.balance,
            profit: 0.0,
        })
    }

    async fn open_positions(&self) -> Vec<TerminalPosition> {
        self.state.lock().await.positions.clone()
    }
}
