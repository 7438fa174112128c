//! Forwards URL lists to the IndexNow search-index notification API.
//!
//! Protocol: https://www.indexnow.org/documentation

use crate::config::{ConfigError, IndexNowConfig};
use crate::external::HTTP_CLIENT;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexNowError {
    #[error("IndexNow is not configured (set indexnow.host and indexnow.key)")]
    NotConfigured,

    #[error("No URLs to submit")]
    EmptyUrlList,

    #[error("IndexNow request failed: {0}")]
    Forward(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitPayload<'a> {
    host: &'a str,
    key: &'a str,
    /// Without it the key file is expected at `https://{host}/{key}.txt`
    #[serde(skip_serializing_if = "str::is_empty")]
    key_location: &'a str,
    url_list: &'a [String],
}

#[derive(Clone)]
pub struct IndexNowService {
    config: IndexNowConfig,
    client: reqwest::Client,
}

impl IndexNowService {
    /// Uses the shared HTTP client; fails if that client could not be built.
    pub fn new(config: IndexNowConfig) -> Result<Self, ConfigError> {
        let client = shared_client(HTTP_CLIENT.as_ref())?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: IndexNowConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Post the URLs to the configured endpoint. 200 and 202 count as accepted.
    pub async fn submit(&self, urls: Vec<String>) -> Result<(), IndexNowError> {
        if !self.is_configured() {
            return Err(IndexNowError::NotConfigured);
        }
        if urls.is_empty() {
            return Err(IndexNowError::EmptyUrlList);
        }

        let payload = SubmitPayload {
            host: &self.config.host,
            key: &self.config.key,
            key_location: &self.config.key_location,
            url_list: &urls,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| IndexNowError::Forward(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 | 202 => {
                tracing::info!(count = urls.len(), status, "URLs submitted to IndexNow");
                Ok(())
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status, body = %body, "IndexNow rejected submission");
                Err(IndexNowError::Forward(format!(
                    "IndexNow responded with status {}",
                    status
                )))
            }
        }
    }
}

fn shared_client(
    client: Result<&reqwest::Client, &reqwest::Error>,
) -> Result<reqwest::Client, ConfigError> {
    client
        .cloned()
        .map_err(|e| ConfigError::validation("indexnow", format!("HTTP client unavailable: {}", e)))
}
