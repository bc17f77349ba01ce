use chrono::Utc;
use signal_core::{Position, RiskLimits, Signal, TradeAction};

use crate::manager::RiskManager;
use crate::session::TradingSession;

fn signal(symbol: &str, confidence: f64) -> Signal {
    Signal {
        symbol: symbol.to_string(),
        action: TradeAction::Buy,
        confidence,
        reason: "test".to_string(),
        metrics: serde_json::Value::Null,
        created_at: Utc::now(),
    }
}

fn position(symbol: &str) -> Position {
    Position {
        symbol: symbol.to_string(),
        quantity: 10.0,
        avg_price: 100.0,
        current_value: 1_000.0,
    }
}

#[tokio::test]
async fn clean_session_approves() {
    let manager = RiskManager::new(RiskLimits::default());
    let session = TradingSession::new();
    let check = manager
        .validate_trade(&signal("AAPL", 0.8), &[], &session)
        .await;
    assert!(check.approved);
}

#[tokio::test]
async fn daily_loss_limit_rejects() {
    let manager = RiskManager::new(RiskLimits::default());
    let session = TradingSession::new();
    session.record_realized_pnl(-150.0).await;

    let check = manager
        .validate_trade(&signal("AAPL", 0.8), &[], &session)
        .await;
    assert!(!check.approved);
    assert!(check.reason.contains("daily loss limit"));
}

#[tokio::test]
async fn open_position_ceiling_rejects() {
    let manager = RiskManager::new(RiskLimits::default());
    let session = TradingSession::new();
    let positions = vec![position("MSFT"), position("TSLA"), position("NVDA")];

    let check = manager
        .validate_trade(&signal("AAPL", 0.8), &positions, &session)
        .await;
    assert!(!check.approved);
    assert!(check.reason.contains("maximum open positions"));
}

#[tokio::test]
async fn duplicate_position_rejects() {
    let manager = RiskManager::new(RiskLimits::default());
    let session = TradingSession::new();
    let positions = vec![position("AAPL")];

    let check = manager
        .validate_trade(&signal("AAPL", 0.8), &positions, &session)
        .await;
    assert!(!check.approved);
    assert!(check.reason.contains("already open"));
}

#[tokio::test]
async fn day_rollover_resets_session() {
    let manager = RiskManager::new(RiskLimits::default());
    let session = TradingSession::new();
    session.record_realized_pnl(-500.0).await;
    session.force_day(Utc::now().date_naive().pred_opt().unwrap()).await;

    // Yesterday's loss no longer counts against today.
    let check = manager
        .validate_trade(&signal("AAPL", 0.8), &[], &session)
        .await;
    assert!(check.approved);
    assert_eq!(session.daily_pnl().await, 0.0);
}

#[tokio::test]
async fn trade_count_accumulates() {
    let session = TradingSession::new();
    session.count_trade().await;
    session.count_trade().await;
    assert_eq!(session.trades_executed().await, 2);
}

#[test]
fn position_size_scales_and_caps() {
    let manager = RiskManager::new(RiskLimits::default());

    // 10_000 * 0.02 * 1/(1+0.5) * 0.75 = 100.
    let sized = manager.size_position(&signal("AAPL", 0.75), 10_000.0, 0.5);
    assert!((sized - 100.0).abs() < 1e-9);

    // Zero volatility and full confidence stays under the 10% cap.
    let max = manager.size_position(&signal("AAPL", 1.0), 10_000.0, 0.0);
    assert!((max - 200.0).abs() < 1e-9);
    assert!(max <= 10_000.0 * 0.1);
}
