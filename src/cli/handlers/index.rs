//! Index command handler: submit URLs to IndexNow from the command line.

use crate::config::{ConfigError, Settings};
use crate::services::IndexNowService;

pub struct IndexCommandHandler {
    service: IndexNowService,
}

impl IndexCommandHandler {
    pub fn new(config: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            service: IndexNowService::new(config.indexnow.clone())?,
        })
    }

    pub async fn execute(&self, urls: Vec<String>) -> anyhow::Result<()> {
        let count = urls.len();
        self.service.submit(urls).await?;
        println!("✓ Submitted {} URL(s) to IndexNow", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::post};

    #[tokio::test]
    async fn test_execute_submits_urls() {
        let app = Router::new().route("/indexnow", post(|| async { StatusCode::ACCEPTED }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut config = Settings::default();
        config.indexnow.endpoint = format!("http://{}/indexnow", addr);
        config.indexnow.host = "www.example.com".to_string();
        config.indexnow.key = "abc123".to_string();

        let handler = IndexCommandHandler::new(&config).unwrap();
        assert!(handler
            .execute(vec!["https://www.example.com/".to_string()])
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_execute_requires_configuration() {
        let handler = IndexCommandHandler::new(&Settings::default()).unwrap();
        let err = handler
            .execute(vec!["https://www.example.com/".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
