//! Provider that only logs messages. Used for local development and dry runs.

use super::provider::{EmailMessage, EmailProvider, ProviderError, SendReceipt};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LogProvider {
    sent: AtomicU64,
}

impl LogProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages acknowledged so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
        let seq = self.sent.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::info!(
            from = %message.from,
            to = ?message.to,
            reply_to = ?message.reply_to,
            subject = %message.subject,
            html_bytes = message.html.len(),
            "Email logged instead of sent"
        );

        Ok(SendReceipt {
            provider: self.name().to_string(),
            message_id: Some(format!("log-{}", seq)),
            duration_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
