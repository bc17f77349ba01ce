use thiserror::Error;

/// Pipeline-wide error taxonomy. Provider-level failures are isolated by the
/// aggregation and batch layers and never abort sibling work; only an
/// exhausted retry budget on a required single-instrument call surfaces to
/// that instrument's caller.
#[derive(Error, Debug)]
pub enum PulseError {
    /// No credentials configured for the provider. Callers treat this as a
    /// silent empty result, not a failure.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Network or parse failure on a provider call.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Retry budget exhausted against a rate-limiting provider.
    #[error("Rate limit exceeded after {attempts} attempts: {message}")]
    RateLimitExceeded { attempts: u32, message: String },

    /// Caller-imposed deadline fired before the call (or its backoff chain)
    /// completed.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Malformed execution input. Returned as a failure, never raised past
    /// the execution boundary.
    #[error("Invalid signal text: {0}")]
    InvalidSignalText(String),

    /// Brokerage terminal returned a non-done result code.
    #[error("Broker order failed (code {code}): {message}")]
    BrokerOrderFailed { code: i32, message: String },

    /// Read or write failure in a cache store implementation. The market
    /// data service degrades to a live fetch rather than surfacing it.
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl PulseError {
    /// Whether this error was caused by provider rate limiting, either
    /// classified up front or after retries were exhausted.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PulseError::RateLimitExceeded { .. })
    }
}
