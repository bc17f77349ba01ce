//! Trade validation and position sizing. Every trade passes one gate:
//! daily realized loss, open-position count, and duplicate-instrument checks
//! against a mutex-guarded [`TradingSession`] that resets when the UTC
//! trading day rolls over.

pub mod manager;
pub mod session;
#[cfg(test)]
mod tests;

pub use manager::{RiskCheck, RiskManager};
pub use session::TradingSession;
