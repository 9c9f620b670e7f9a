//! Outbound notification seam.
//!
//! The chat transport (Telegram webhook, etc.) lives outside this workspace;
//! it plugs in by implementing [`Notifier`]. Delivery is always best-effort:
//! failures and timeouts are logged and dropped, never retried, never
//! propagated to the scheduling caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("delivery timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Delivers one notification to one chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// Deliver `text` to `chat_id` with a bounded timeout, swallowing failures.
pub(crate) async fn deliver(
    notifier: &Arc<dyn Notifier>,
    timeout: Duration,
    chat_id: i64,
    text: &str,
) {
    match tokio::time::timeout(timeout, notifier.notify(chat_id, text)).await {
        Ok(Ok(())) => debug!(chat_id, "notification delivered"),
        Ok(Err(e)) => warn!(chat_id, error = %e, "notification delivery failed, dropping"),
        Err(_) => warn!(
            chat_id,
            timeout_ms = timeout.as_millis() as u64,
            "notification delivery timed out, dropping"
        ),
    }
}
