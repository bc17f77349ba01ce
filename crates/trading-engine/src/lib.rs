//! Caller-facing trading pipeline. Wires the provider clients, aggregator,
//! market data service, signal engine, risk gate and executor into one
//! [`TradingEngine`] consumed by outer surfaces (HTTP layers, bots,
//! schedulers) that live outside this workspace.

mod alerts;
mod engine;

pub use alerts::TracingAlertSink;
pub use engine::{MarketDataReport, TradeOutcome, TradingEngine};

use cache_store::{CacheStore, MemoryCacheStore, MemorySignalAudit, MemoryTradeLog};
use fetch_gateway::FetchGateway;
use market_data::MarketDataService;
use news_aggregator::NewsAggregator;
use provider_clients::{AlphaVantageClient, FinnhubClient, NewsDataClient, TwelveDataClient};
use risk_manager::{RiskManager, TradingSession};
use signal_core::{CacheConfig, ExecutorConfig, GatewayConfig};
use signal_engine::SignalEngine;
use std::sync::Arc;
use trade_executor::{BrokerTerminal, TradeExecutor};

/// Build a fully wired engine from environment configuration. Providers with
/// no credentials configured degrade to silent empty contributions.
pub fn engine_from_env(terminal: Arc<dyn BrokerTerminal>) -> TradingEngine {
    dotenvy::dotenv().ok();

    let gateway = FetchGateway::new(GatewayConfig::from_env());
    let finnhub = FinnhubClient::from_env(gateway.clone());
    let newsapi = NewsDataClient::from_env(gateway.clone());
    let alphavantage = AlphaVantageClient::from_env(gateway.clone());
    let twelvedata = TwelveDataClient::from_env(gateway);

    let cache_config = CacheConfig::from_env();
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new(cache_config.clone()));
    let session = Arc::new(TradingSession::new());

    let market_data = MarketDataService::new(
        cache.clone(),
        cache_config,
        Arc::new(alphavantage.clone()),
        Arc::new(twelvedata),
        Arc::new(finnhub.clone()),
    );

    // Priority order decides dedup tie-breaks: direct company feeds first,
    // keyword search last.
    let aggregator = NewsAggregator::new(vec![
        Arc::new(finnhub),
        Arc::new(alphavantage),
        Arc::new(newsapi),
    ]);

    TradingEngine::new(
        aggregator,
        market_data,
        SignalEngine::from_env(),
        RiskManager::from_env(),
        TradeExecutor::new(terminal.clone(), session.clone(), ExecutorConfig::from_env()),
        terminal,
        session,
        cache,
        Arc::new(MemorySignalAudit::default()),
        Arc::new(MemoryTradeLog::default()),
        Arc::new(TracingAlertSink),
    )
}

/// Install the process-wide log subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
