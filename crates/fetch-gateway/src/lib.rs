//! Rate-limited, retrying wrapper around outbound provider calls.
//!
//! Every external invocation goes through [`FetchGateway::call`]: a jittered
//! delay precedes each attempt to stay under shared provider budgets, errors
//! classified as rate limiting back off exponentially, and anything else
//! propagates immediately. The retry loop is an explicit state machine so a
//! caller-imposed deadline can abort a backoff chain early instead of
//! sleeping it out.

use rand::Rng;
use signal_core::{GatewayConfig, PulseError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Phrases that identify a rate-limiting response across providers.
const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "too many requests", "429"];

/// Whether a provider error should be retried with backoff.
pub fn is_rate_limit_error(err: &PulseError) -> bool {
    if err.is_rate_limited() {
        return true;
    }
    match err {
        PulseError::ProviderError(msg) => {
            let msg = msg.to_lowercase();
            RATE_LIMIT_MARKERS.iter().any(|m| msg.contains(m))
        }
        _ => false,
    }
}

/// Retry progression for one wrapped call.
#[derive(Debug)]
enum RetryState {
    /// About to run attempt `n` (0-based) after the jittered pre-delay.
    Attempting(u32),
    /// Attempt `n` hit a rate limit; waiting `wait` before the next one.
    BackingOff { attempt: u32, wait: Duration },
    /// Retry budget spent.
    Exhausted { attempts: u32, message: String },
}

#[derive(Debug, Clone)]
pub struct FetchGateway {
    config: GatewayConfig,
}

impl FetchGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Gateway that never sleeps. For tests and dry runs.
    pub fn immediate() -> Self {
        Self::new(GatewayConfig::immediate())
    }

    /// Run `op` under the gateway's delay/retry policy with no deadline.
    pub async fn call<T, F, Fut>(&self, label: &str, op: F) -> Result<T, PulseError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PulseError>>,
    {
        self.call_with_deadline(label, None, op).await
    }

    /// Run `op` under the delay/retry policy. If `deadline` is set, any wait
    /// that would overrun it fails fast with `DeadlineExceeded` rather than
    /// completing a multi-minute backoff chain.
    pub async fn call_with_deadline<T, F, Fut>(
        &self,
        label: &str,
        deadline: Option<Instant>,
        op: F,
    ) -> Result<T, PulseError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PulseError>>,
    {
        let mut state = RetryState::Attempting(0);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    self.pause(self.jittered_delay(), deadline, label).await?;
                    if attempt > 0 {
                        tracing::info!(label, attempt = attempt + 1, "retrying provider call");
                    }
                    match op().await {
                        Ok(value) => return Ok(value),
                        Err(err) if is_rate_limit_error(&err) => {
                            if attempt + 1 >= self.config.max_retries {
                                RetryState::Exhausted {
                                    attempts: attempt + 1,
                                    message: err.to_string(),
                                }
                            } else {
                                RetryState::BackingOff {
                                    attempt,
                                    wait: self.backoff_delay(attempt),
                                }
                            }
                        }
                        // Anything not classified as rate limiting fails the
                        // call immediately.
                        Err(err) => return Err(err),
                    }
                }
                RetryState::BackingOff { attempt, wait } => {
                    tracing::warn!(
                        label,
                        wait_secs = wait.as_secs_f64(),
                        attempt = attempt + 1,
                        max = self.config.max_retries,
                        "rate limit hit, backing off"
                    );
                    self.pause(wait, deadline, label).await?;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Exhausted { attempts, message } => {
                    tracing::error!(label, attempts, "rate limit retries exhausted");
                    return Err(PulseError::RateLimitExceeded { attempts, message });
                }
            };
        }
    }

    /// Uniform random delay inside [min_delay, max_delay].
    fn jittered_delay(&self) -> Duration {
        let min = self.config.min_delay.as_millis() as u64;
        let max = self.config.max_delay.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max.max(min)))
    }

    /// Exponential backoff: 2^attempt * base + random jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.config.backoff_base.as_millis() as u64;
        let jitter_cap = self.config.backoff_jitter.as_millis() as u64;
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_cap)
        };
        Duration::from_millis(base.saturating_mul(1u64 << attempt.min(16)) + jitter)
    }

    /// Sleep unless doing so would overrun the deadline.
    async fn pause(
        &self,
        wait: Duration,
        deadline: Option<Instant>,
        label: &str,
    ) -> Result<(), PulseError> {
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now >= deadline || now + wait > deadline {
                return Err(PulseError::DeadlineExceeded(format!(
                    "{label}: {:.1}s wait would overrun caller deadline",
                    wait.as_secs_f64()
                )));
            }
        }
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        Ok(())
    }
}
