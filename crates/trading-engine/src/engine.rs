use cache_store::{CacheStore, SignalAudit, TradeLog};
use chrono::{DateTime, Utc};
use market_data::MarketDataService;
use news_aggregator::NewsAggregator;
use risk_manager::{RiskManager, TradingSession};
use signal_core::{
    AggregatedNews, AlertKind, AlertSink, Position, PriceBar, PulseError, QuoteSnapshot, Signal,
    TradeAction, Transaction,
};
use signal_engine::SignalEngine;
use std::collections::BTreeMap;
use std::sync::Arc;
use trade_executor::{BrokerTerminal, TradeExecutor};

/// Daily history pulled for indicator scoring and volatility estimation.
const HISTORY_DAYS: i64 = 90;

/// Protective band attached to generated orders, as fractions of the fill
/// price.
const STOP_LOSS_FRACTION: f64 = 0.05;
const TAKE_PROFIT_FRACTION: f64 = 0.10;

/// Smallest lot the executor will submit.
const MIN_VOLUME: f64 = 0.01;

/// Outcome of one execution attempt. A rejected or failed trade is a normal
/// result carrying its reason, not an error.
#[derive(Debug, Clone)]
pub struct TradeOutcome {
    pub executed: bool,
    pub reason: String,
    /// The order text handed to the executor, when the attempt got that far.
    pub order_text: Option<String>,
}

impl TradeOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            executed: false,
            reason: reason.into(),
            order_text: None,
        }
    }
}

/// Combined price view for a set of instruments.
#[derive(Debug, Clone)]
pub struct MarketDataReport {
    pub historical: BTreeMap<String, Vec<PriceBar>>,
    pub quotes: Vec<QuoteSnapshot>,
    pub generated_at: DateTime<Utc>,
}

/// Caller-facing pipeline: news aggregation, signal generation, market data
/// and risk-gated execution, wired over the component crates. The excluded
/// HTTP layer consumes exactly these operations.
pub struct TradingEngine {
    aggregator: NewsAggregator,
    market_data: MarketDataService,
    signal_engine: SignalEngine,
    risk: RiskManager,
    executor: TradeExecutor,
    terminal: Arc<dyn BrokerTerminal>,
    session: Arc<TradingSession>,
    cache: Arc<dyn CacheStore>,
    audit: Arc<dyn SignalAudit>,
    trades: Arc<dyn TradeLog>,
    alerts: Arc<dyn AlertSink>,
}

impl TradingEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        aggregator: NewsAggregator,
        market_data: MarketDataService,
        signal_engine: SignalEngine,
        risk: RiskManager,
        executor: TradeExecutor,
        terminal: Arc<dyn BrokerTerminal>,
        session: Arc<TradingSession>,
        cache: Arc<dyn CacheStore>,
        audit: Arc<dyn SignalAudit>,
        trades: Arc<dyn TradeLog>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            aggregator,
            market_data,
            signal_engine,
            risk,
            executor,
            terminal,
            session,
            cache,
            audit,
            trades,
            alerts,
        }
    }

    /// Drop cache entries past their retention horizon. Run at process
    /// start; safe to repeat.
    pub async fn maintain_cache(&self) -> Result<cache_store::ReapReport, PulseError> {
        let report = self.cache.reap(Utc::now()).await?;
        let counts = self.cache.counts().await;
        tracing::info!(reaped = report.total(), ?counts, "cache maintenance complete");
        Ok(report)
    }

    /// Deduplicated multi-source news for one instrument.
    pub async fn aggregate_news(&self, symbol: &str, days_back: u32) -> AggregatedNews {
        self.aggregator.aggregate(symbol, days_back).await
    }

    /// Fused signal for one instrument, recorded in the audit log and
    /// announced through the alert sink. `None` means insufficient evidence.
    pub async fn generate_signal(&self, symbol: &str, days_back: u32) -> Option<Signal> {
        let news = self.aggregator.aggregate(symbol, days_back).await;

        let end = Utc::now();
        let start = end - chrono::Duration::days(HISTORY_DAYS);
        let history = self
            .market_data
            .fetch_historical(&[symbol.to_string()], start, end)
            .await;
        let bars = history.get(symbol).map(Vec::as_slice).unwrap_or(&[]);

        let signal = self.signal_engine.generate(symbol, bars, &news);
        if let Some(signal) = &signal {
            if let Err(err) = self.audit.record(signal).await {
                tracing::warn!(symbol, error = %err, "failed to record signal audit entry");
            }
            self.alerts
                .send_alert(
                    &format!(
                        "{} {} (confidence {:.2}): {}",
                        signal.action, signal.symbol, signal.confidence, signal.reason
                    ),
                    AlertKind::Signal,
                )
                .await;
        }
        signal
    }

    /// Signals for a batch of instruments; an instrument with too little
    /// evidence maps to `None` rather than dropping out of the result.
    pub async fn generate_signals(&self, symbols: &[String]) -> BTreeMap<String, Option<Signal>> {
        let days_back = self.signal_engine.sentiment_config().lookback_days;
        let mut out = BTreeMap::new();
        for symbol in symbols {
            out.insert(symbol.clone(), self.generate_signal(symbol, days_back).await);
        }
        out
    }

    /// Historical bars plus real-time quotes for a batch of instruments.
    /// Always complete: failed symbols carry empty series or error-marked
    /// snapshots.
    pub async fn fetch_market_data(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> MarketDataReport {
        MarketDataReport {
            historical: self.market_data.fetch_historical(symbols, start, end).await,
            quotes: self.market_data.fetch_quotes(symbols).await,
            generated_at: Utc::now(),
        }
    }

    /// Risk-gate a signal and, when approved, size and submit the order.
    pub async fn execute_trade(&self, signal: &Signal) -> TradeOutcome {
        if signal.action == TradeAction::Hold {
            return TradeOutcome::skipped("HOLD signal, nothing to execute");
        }

        let open_positions = self.open_positions().await;
        let check = self
            .risk
            .validate_trade(signal, &open_positions, &self.session)
            .await;
        if !check.approved {
            self.alerts
                .send_alert(
                    &format!("trade rejected for {}: {}", signal.symbol, check.reason),
                    AlertKind::Error,
                )
                .await;
            return TradeOutcome::skipped(check.reason);
        }

        let quotes = self.market_data.fetch_quotes(&[signal.symbol.clone()]).await;
        let quote = match quotes.first() {
            Some(q) if q.error.is_none() && q.current_price > 0.0 => q,
            _ => {
                return TradeOutcome::skipped(format!("no market price for {}", signal.symbol));
            }
        };
        let price = quote.current_price;

        let Some(account) = self.terminal.account_info().await else {
            return TradeOutcome::skipped("terminal reported no account info");
        };

        let end = Utc::now();
        let start = end - chrono::Duration::days(HISTORY_DAYS);
        let history = self
            .market_data
            .fetch_historical(&[signal.symbol.clone()], start, end)
            .await;
        let volatility = history
            .get(&signal.symbol)
            .map(|bars| realized_volatility(bars))
            .unwrap_or(0.0);

        let sized_value = self.risk.size_position(signal, account.balance, volatility);
        let volume = ((sized_value / price).max(MIN_VOLUME) * 100.0).round() / 100.0;

        let (stop_loss, take_profit) = match signal.action {
            TradeAction::Buy => (
                price * (1.0 - STOP_LOSS_FRACTION),
                price * (1.0 + TAKE_PROFIT_FRACTION),
            ),
            _ => (
                price * (1.0 + STOP_LOSS_FRACTION),
                price * (1.0 - TAKE_PROFIT_FRACTION),
            ),
        };

        let order_text = format!(
            "{} {} SL={stop_loss:.2} TP={take_profit:.2} VOL={volume:.2}",
            signal.action, signal.symbol
        );

        let executed = self.executor.process_signal(&order_text).await;
        if executed {
            let transaction = Transaction {
                symbol: signal.symbol.clone(),
                action: signal.action,
                quantity: volume,
                price,
                total_value: price * volume,
                timestamp: Utc::now(),
            };
            if let Err(err) = self.trades.record(&transaction).await {
                tracing::warn!(symbol = %signal.symbol, error = %err, "failed to record transaction");
            }
            self.alerts
                .send_alert(
                    &format!("executed {} at {price:.2}", order_text),
                    AlertKind::Trade,
                )
                .await;
        }

        TradeOutcome {
            executed,
            reason: if executed {
                "trade executed".to_string()
            } else {
                "order submission failed".to_string()
            },
            order_text: Some(order_text),
        }
    }

    /// Recent audit-log entries, newest first.
    pub async fn recent_signals(&self, limit: usize) -> Vec<Signal> {
        self.audit.recent(limit).await
    }

    /// Recent executed trades, newest first.
    pub async fn recent_transactions(&self, limit: usize) -> Vec<Transaction> {
        self.trades.recent(limit).await
    }

    async fn open_positions(&self) -> Vec<Position> {
        self.terminal
            .open_positions()
            .await
            .into_iter()
            .map(|p| Position {
                symbol: p.symbol,
                quantity: p.volume,
                avg_price: p.price_open,
                current_value: p.price_current * p.volume,
            })
            .collect()
    }
}

/// Standard deviation of simple daily returns.
fn realized_volatility(bars: &[PriceBar]) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }
    let returns: Vec<f64> = bars
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}
