use std::env;
use std::time::Duration;

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Fetch Gateway tuning. Defaults match the conservative free-tier budget;
/// tests zero the delays.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Jittered pre-attempt delay bounds.
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Retry ceiling for rate-limited calls.
    pub max_retries: u32,
    /// Exponential backoff base: wait = 2^attempt * base + jitter.
    pub backoff_base: Duration,
    /// Upper bound of the random jitter added to each backoff.
    pub backoff_jitter: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(10),
            max_retries: 3,
            backoff_base: Duration::from_secs(60),
            backoff_jitter: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            min_delay: Duration::from_secs(env_u64("FETCH_MIN_DELAY_SECS", 5)),
            max_delay: Duration::from_secs(env_u64("FETCH_MAX_DELAY_SECS", 10)),
            max_retries: env_u64("FETCH_MAX_RETRIES", 3) as u32,
            backoff_base: Duration::from_secs(env_u64("FETCH_BACKOFF_BASE_SECS", 60)),
            backoff_jitter: Duration::from_secs(env_u64("FETCH_BACKOFF_JITTER_SECS", 30)),
        }
    }

    /// No sleeping at all. For tests and paper runs.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_retries: 3,
            backoff_base: Duration::ZERO,
            backoff_jitter: Duration::ZERO,
        }
    }
}

/// Freshness windows and retention horizons per cache kind.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub historical_window: chrono::Duration,
    pub intraday_window: chrono::Duration,
    pub realtime_window: chrono::Duration,
    /// General retention; entries older than this are reaped.
    pub retention: chrono::Duration,
    /// Real-time quotes keep much less history.
    pub realtime_retention: chrono::Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            historical_window: chrono::Duration::days(30),
            intraday_window: chrono::Duration::hours(24),
            realtime_window: chrono::Duration::minutes(60),
            retention: chrono::Duration::days(90),
            realtime_retention: chrono::Duration::days(7),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            historical_window: chrono::Duration::days(env_u64("CACHE_HISTORICAL_DAYS", 30) as i64),
            intraday_window: chrono::Duration::hours(env_u64("CACHE_INTRADAY_HOURS", 24) as i64),
            realtime_window: chrono::Duration::minutes(env_u64("CACHE_REALTIME_MINUTES", 60) as i64),
            retention: chrono::Duration::days(env_u64("CACHE_RETENTION_DAYS", 90) as i64),
            realtime_retention: chrono::Duration::days(env_u64("CACHE_REALTIME_RETENTION_DAYS", 7) as i64),
        }
    }

    pub fn window_for(&self, kind: crate::CacheKind) -> chrono::Duration {
        match kind {
            crate::CacheKind::Historical => self.historical_window,
            crate::CacheKind::Intraday => self.intraday_window,
            crate::CacheKind::RealTime => self.realtime_window,
        }
    }

    pub fn retention_for(&self, kind: crate::CacheKind) -> chrono::Duration {
        match kind {
            crate::CacheKind::RealTime => self.realtime_retention,
            _ => self.retention,
        }
    }
}

/// Keyword lists stay plain data so they can be swapped without recompiling.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    /// Score magnitude required for a directional call.
    pub threshold: f64,
    /// Minimum article count for a reliable signal; below this the engine
    /// returns no signal at all.
    pub min_articles: usize,
    pub lookback_days: u32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        let positive = [
            "rise", "gain", "up", "increase", "growth", "profit", "bullish",
            "positive", "strong", "beat",
        ];
        let negative = [
            "fall", "drop", "down", "decrease", "loss", "decline", "bearish",
            "negative", "weak", "miss",
        ];
        Self {
            positive_words: positive.iter().map(|s| s.to_string()).collect(),
            negative_words: negative.iter().map(|s| s.to_string()).collect(),
            threshold: 0.1,
            min_articles: 3,
            lookback_days: 7,
        }
    }
}

impl SentimentConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.threshold = env_f64("SENTIMENT_THRESHOLD", cfg.threshold);
        cfg.min_articles = env_usize("MIN_NEWS_ARTICLES", cfg.min_articles);
        cfg.lookback_days = env_u64("NEWS_LOOKBACK_DAYS", cfg.lookback_days as u64) as u32;
        cfg
    }
}

/// Signal fusion tuning.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// A method whose confidence exceeds this wins outright.
    pub high_confidence: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self { high_confidence: 0.7 }
    }
}

/// Process-wide risk limits, read-only at runtime.
#[derive(Debug, Clone)]
pub struct RiskLimits {
    /// Maximum daily realized loss in account currency.
    pub max_daily_loss: f64,
    /// Maximum position size as a fraction of account balance.
    pub max_position_fraction: f64,
    pub max_open_positions: usize,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_daily_loss: 100.0,
            max_position_fraction: 0.1,
            max_open_positions: 3,
        }
    }
}

impl RiskLimits {
    pub fn from_env() -> Self {
        Self {
            max_daily_loss: env_f64("MAX_DAILY_LOSS", 100.0),
            max_position_fraction: env_f64("MAX_POSITION_SIZE", 0.1),
            max_open_positions: env_usize("MAX_OPEN_POSITIONS", 3),
        }
    }
}

/// Execution adapter limits, independent of the Risk Manager's.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub max_daily_trades: usize,
    /// Lot size used when the signal text does not carry VOL=.
    pub default_volume: f64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_daily_trades: 10,
            default_volume: 0.01,
        }
    }
}

impl ExecutorConfig {
    pub fn from_env() -> Self {
        Self {
            max_daily_trades: env_usize("MAX_DAILY_TRADES", 10),
            default_volume: env_f64("DEFAULT_TRADE_VOLUME", 0.01),
        }
    }
}
