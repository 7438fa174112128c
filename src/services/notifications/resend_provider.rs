//! Resend email provider.
//!
//! API Reference: https://resend.com/docs/api-reference/emails/send-email

use super::provider::{EmailMessage, EmailProvider, ProviderError, SendReceipt};
use crate::external::build_client;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::{Duration, Instant};

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Sends email through the Resend HTTP API
#[derive(Clone)]
pub struct ResendProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendProvider {
    /// Creates a provider posting to `{api_base_url}/emails`.
    ///
    /// Fails when the API key is blank or the client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        api_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Resend API key cannot be empty".to_string(),
            ));
        }

        let client = build_client(timeout)
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/emails", api_base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(SendReceipt {
            provider: self.name().to_string(),
            message_id: parsed.id,
            duration_ms,
        })
    }

    fn name(&self) -> &'static str {
        "resend"
    }

    async fn validate_config(&self) -> Result<(), ProviderError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ProviderError::Configuration(format!("Invalid API URL: {}", e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ProviderError::Configuration(
                "API URL must use http or https protocol".to_string(),
            ));
        }

        Ok(())
    }
}
