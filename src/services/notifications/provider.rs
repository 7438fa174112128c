//! Email provider abstraction.
//!
//! Dispatch talks to an `Arc<dyn EmailProvider>` so the delivery backend is
//! picked by configuration and can be replaced in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgment that a message was accepted for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub provider: String,
    /// Provider-assigned id, when the provider returns one
    pub message_id: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider misconfigured: {0}")]
    Configuration(String),
}

/// Trait for email delivery backends
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl EmailProvider for SmtpProvider {
///     async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
///         // Implementation here
///     }
///
///     fn name(&self) -> &'static str {
///         "smtp"
///     }
/// }
/// ```
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Hand one message to the provider. Success means accepted, not delivered.
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError>;

    /// Provider name for logs and receipts
    fn name(&self) -> &'static str;

    /// Checks provider configuration (optional, default no-op)
    async fn validate_config(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
