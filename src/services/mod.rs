//! Service layer.
//!
//! Services hold the business logic and are shared by HTTP handlers and CLI
//! commands through [`Services`].

mod indexnow_service;
pub mod notifications;

pub use indexnow_service::{IndexNowError, IndexNowService};
pub use notifications::{DispatchService, EmailProvider};

use crate::config::{ConfigError, EmailConfig, EmailProviderKind, Settings};
use notifications::{DispatchConfig, LogProvider, ResendProvider};
use std::sync::Arc;
use std::time::Duration;

/// Aggregates all services. Cloning is cheap (everything is `Arc`-backed).
#[derive(Clone)]
pub struct Services {
    pub dispatch: DispatchService,
    pub indexnow: IndexNowService,
}

impl Services {
    /// Build services from validated settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let provider = build_email_provider(&settings.email)?;
        Self::with_provider(provider, settings)
    }

    /// Build services around an explicit provider.
    pub fn with_provider(
        provider: Arc<dyn EmailProvider>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            dispatch: DispatchService::new(provider, DispatchConfig::from(&settings.email))?,
            indexnow: IndexNowService::new(settings.indexnow.clone())?,
        })
    }
}

/// Pick the email backend named by `email.provider`.
pub fn build_email_provider(config: &EmailConfig) -> Result<Arc<dyn EmailProvider>, ConfigError> {
    match config.provider {
        EmailProviderKind::Resend => {
            let provider = ResendProvider::new(
                config.api_key.clone(),
                &config.api_base_url,
                Duration::from_secs(config.timeout),
            )
            .map_err(|e| ConfigError::validation("email.api_key", e.to_string()))?;
            Ok(Arc::new(provider))
        }
        EmailProviderKind::Log => Ok(Arc::new(LogProvider::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: EmailProviderKind) -> Settings {
        let mut settings = Settings::default();
        settings.email.provider = provider;
        settings.email.from = "hello@relay.dev".to_string();
        settings.email.internal_recipients = vec!["team@relay.dev".to_string()];
        settings
    }

    #[test]
    fn test_log_provider_selected() {
        let services = Services::from_settings(&settings(EmailProviderKind::Log)).unwrap();
        assert_eq!(services.dispatch.provider().name(), "log");
    }

    #[test]
    fn test_resend_requires_api_key() {
        let err = Services::from_settings(&settings(EmailProviderKind::Resend)).err();
        assert!(matches!(err, Some(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_resend_selected_with_key() {
        let mut settings = settings(EmailProviderKind::Resend);
        settings.email.api_key = "re_test".to_string();

        let services = Services::from_settings(&settings).unwrap();
        assert_eq!(services.dispatch.provider().name(), "resend");
    }

    #[test]
    fn test_missing_recipients_rejected() {
        let mut settings = settings(EmailProviderKind::Log);
        settings.email.internal_recipients.clear();
        assert!(Services::from_settings(&settings).is_err());
    }
}
