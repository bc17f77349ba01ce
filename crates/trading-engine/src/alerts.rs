use async_trait::async_trait;
use signal_core::{AlertKind, AlertSink};

/// Default alert sink that writes alerts to the log stream. Real delivery
/// channels (chat, webhooks) live outside the core and implement
/// [`AlertSink`] themselves.
pub struct TracingAlertSink;

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn send_alert(&self, message: &str, kind: AlertKind) {
        tracing::info!(kind = kind.as_str(), message, "alert");
    }
}
