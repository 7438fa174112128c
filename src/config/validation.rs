//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` returns the first error.

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::{
    EmailConfig, EmailProviderKind, FileSettings, IndexNowConfig, LoggerSettings, ServerConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - CORS origins must be http(s) origins
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if let Some(origin) = self
            .cors_origins
            .iter()
            .find(|o| !is_http_url(o))
        {
            return Err(ConfigError::validation(
                "server.cors_origins",
                format!("Invalid origin '{}'. Expected http:// or https:// origin.", origin),
            ));
        }

        Ok(())
    }
}

impl EmailConfig {
    /// # Validation Rules
    /// - `from` and at least one internal recipient are required
    /// - Internal recipients must not be blank
    /// - The Resend provider needs an API key and an http(s) base URL
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from.trim().is_empty() {
            return Err(ConfigError::validation(
                "email.from",
                "Sender address is required, e.g. \"Acme <hello@acme.dev>\".",
            ));
        }

        if self.internal_recipients.is_empty() {
            return Err(ConfigError::validation(
                "email.internal_recipients",
                "At least one internal recipient address is required.",
            ));
        }

        if self.internal_recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::validation(
                "email.internal_recipients",
                "Internal recipient addresses cannot be blank.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "email.timeout",
                "Provider timeout must be greater than 0 seconds.",
            ));
        }

        if self.provider == EmailProviderKind::Resend {
            if self.api_key.trim().is_empty() {
                return Err(ConfigError::validation(
                    "email.api_key",
                    "API key is required for the resend provider. Set RELAY_EMAIL__API_KEY.",
                ));
            }

            if !is_http_url(&self.api_base_url) {
                return Err(ConfigError::validation(
                    "email.api_base_url",
                    "API base URL must start with http:// or https://.",
                ));
            }
        }

        Ok(())
    }
}

impl IndexNowConfig {
    /// Whether enough is configured to forward submissions.
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty() && !self.key.trim().is_empty()
    }

    /// The section is optional; it is only checked once `host` or `key` is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() && self.key.trim().is_empty() {
            return Ok(());
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "indexnow.host",
                "Host is required when an IndexNow key is configured.",
            ));
        }

        if self.key.trim().is_empty() {
            return Err(ConfigError::validation(
                "indexnow.key",
                "Key is required when an IndexNow host is configured.",
            ));
        }

        if !is_http_url(&self.endpoint) {
            return Err(ConfigError::validation(
                "indexnow.endpoint",
                "Endpoint must start with http:// or https://.",
            ));
        }

        if !self.key_location.is_empty() && !is_http_url(&self.key_location) {
            return Err(ConfigError::validation(
                "indexnow.key_location",
                "Key location must be an http(s) URL.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.enabled && (self.rotation.max_size == 0 || self.rotation.max_files == 0) {
            return Err(ConfigError::validation(
                "logger.file.rotation",
                "Rotation max_size and max_files must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// # Validation Rules
    /// - Level must be a plain level or a parseable filter directive
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        let is_plain_level = VALID_LOG_LEVELS.contains(&level.as_str());
        let is_directive =
            level.contains('=') && tracing_subscriber::EnvFilter::try_new(&self.level).is_ok();
        if !is_plain_level && !is_directive {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings for the environment read from `RELAY_APP_ENV`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(Environment::from_env())
    }

    /// Validate all configuration settings for an explicit environment.
    ///
    /// The log-only email provider is refused in production.
    pub fn validate_for(&self, environment: Environment) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.email.validate()?;
        self.indexnow.validate()?;

        if environment.is_production() && self.email.provider == EmailProviderKind::Log {
            return Err(ConfigError::validation(
                "email.provider",
                "The log provider cannot be used in production.",
            ));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.email.api_key = "re_test_key".to_string();
        settings.email.from = "Acme <noreply@acme.dev>".to_string();
        settings.email.internal_recipients = vec!["team@acme.dev".to_string()];
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(valid_settings().validate_for(Environment::Development).is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_bad_cors_origin_rejected() {
        let mut settings = valid_settings();
        settings.server.cors_origins = vec!["acme.dev".to_string()];
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("server.cors_origins"));
    }

    #[test]
    fn test_missing_from_rejected() {
        let mut settings = valid_settings();
        settings.email.from = "  ".to_string();
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("email.from"));
    }

    #[test]
    fn test_missing_internal_recipients_rejected() {
        let mut settings = valid_settings();
        settings.email.internal_recipients.clear();
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("email.internal_recipients"));
    }

    #[test]
    fn test_resend_requires_api_key() {
        let mut settings = valid_settings();
        settings.email.api_key = String::new();
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("email.api_key"));
    }

    #[test]
    fn test_log_provider_needs_no_api_key() {
        let mut settings = valid_settings();
        settings.email.provider = EmailProviderKind::Log;
        settings.email.api_key = String::new();
        assert!(settings.validate_for(Environment::Development).is_ok());
    }

    #[test]
    fn test_log_provider_refused_in_production() {
        let mut settings = valid_settings();
        settings.email.provider = EmailProviderKind::Log;
        let err = settings.validate_for(Environment::Production).unwrap_err();
        assert!(err.to_string().contains("email.provider"));
    }

    #[test]
    fn test_indexnow_optional_when_unset() {
        let settings = valid_settings();
        assert!(!settings.indexnow.is_configured());
        assert!(settings.indexnow.validate().is_ok());
    }

    #[test]
    fn test_indexnow_key_without_host_rejected() {
        let mut settings = valid_settings();
        settings.indexnow.key = "abc123".to_string();
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("indexnow.host"));
    }

    #[test]
    fn test_logger_accepts_filter_directive() {
        let mut settings = valid_settings();
        settings.logger.level = "relay_rs=debug,tower_http=warn".to_string();
        assert!(settings.validate_for(Environment::Development).is_ok());
    }

    #[test]
    fn test_logger_rejects_unknown_level() {
        let mut settings = valid_settings();
        settings.logger.level = "verbose".to_string();
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("logger.level"));
    }

    #[test]
    fn test_logger_requires_an_output() {
        let mut settings = valid_settings();
        settings.logger.console.enabled = false;
        settings.logger.file.enabled = false;
        let err = settings.validate_for(Environment::Development).unwrap_err();
        assert!(err.to_string().contains("logger"));
    }
}
