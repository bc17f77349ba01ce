//! One client per external data source. Every outbound call is routed
//! through the Fetch Gateway; a client with no credentials configured
//! contributes a silent empty result rather than an error, so a
//! half-configured deployment still aggregates whatever it can reach.

mod alphavantage;
mod finnhub;
mod newsdata;
mod twelvedata;

pub use alphavantage::AlphaVantageClient;
pub use finnhub::FinnhubClient;
pub use newsdata::NewsDataClient;
pub use twelvedata::TwelveDataClient;

use reqwest::Client;
use signal_core::PulseError;
use std::time::Duration;

/// Per-call HTTP timeout for all providers.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a non-success HTTP response to a provider error carrying the status
/// text, so the gateway can classify 429s for backoff.
pub(crate) async fn status_error(response: reqwest::Response) -> PulseError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    PulseError::ProviderError(format!("HTTP {status}: {body}"))
}

pub(crate) fn request_error(err: reqwest::Error) -> PulseError {
    PulseError::ProviderError(err.to_string())
}
