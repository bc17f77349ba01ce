use anyhow::Result;
use std::sync::Arc;
use trade_executor::PaperTerminal;
use trading_engine::{engine_from_env, init_tracing};

/// One analysis pass over the monitored symbols: aggregate news, score, and
/// log the resulting signals. Execution needs a real terminal session and is
/// left to the embedding service.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let symbols: Vec<String> = std::env::var("MONITOR_SYMBOLS")
        .unwrap_or_else(|_| "AAPL,GOOGL,MSFT,TSLA".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let engine = engine_from_env(Arc::new(PaperTerminal::new(10_000.0)));
    engine.maintain_cache().await?;

    let signals = engine.generate_signals(&symbols).await;
    for (symbol, signal) in &signals {
        match signal {
            Some(signal) => tracing::info!(
                symbol,
                action = signal.action.as_str(),
                confidence = signal.confidence,
                reason = %signal.reason,
                "signal ready"
            ),
            None => tracing::info!(symbol, "no signal, insufficient evidence"),
        }
    }

    Ok(())
}
