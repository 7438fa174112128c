//! Merges CLI overrides into file configuration.
//!
//! Precedence (highest first): `serve` flags, global flags, environment
//! variables, configuration files.

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Environment, Settings};
use std::path::Path;

pub struct ConfigurationMerger {
    base_config: Settings,
    environment: Environment,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings, environment: Environment) -> Self {
        Self {
            base_config,
            environment,
        }
    }

    /// Load the base configuration for `cli`: a single file when `--config` is
    /// given, the layered directory otherwise.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_deref() {
            Some(path) => Self::file_loader(path)?,
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        let environment = loader.environment();
        Ok(Self::new(loader.load()?, environment))
    }

    fn file_loader(path: &Path) -> Result<ConfigLoader, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Ok(ConfigLoader::for_file(path))
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Apply CLI overrides and validate the result for the resolved environment.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(level) = cli.global_log_level() {
            config.logger.level = level.as_str().to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate_for(self.environment)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailProviderKind;
    use clap::Parser;

    fn base() -> Settings {
        let mut settings = Settings::default();
        settings.email.provider = EmailProviderKind::Log;
        settings.email.from = "hello@relay.dev".to_string();
        settings.email.internal_recipients = vec!["team@relay.dev".to_string()];
        settings
    }

    fn merge(args: &[&str], environment: Environment) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(base(), environment).merge_cli_args(&cli)
    }

    #[test]
    fn test_serve_overrides_applied() {
        let settings = merge(
            &["relay-rs", "serve", "--host", "0.0.0.0", "--port", "8080"],
            Environment::Development,
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_log_level_precedence() {
        let settings = merge(&["relay-rs", "--verbose"], Environment::Development).unwrap();
        assert_eq!(settings.logger.level, "debug");

        let settings = merge(
            &["relay-rs", "--quiet", "serve", "--log-level", "trace"],
            Environment::Development,
        )
        .unwrap();
        assert_eq!(settings.logger.level, "trace");
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let settings = merge(&["relay-rs"], Environment::Development).unwrap();
        assert_eq!(settings, base());
    }

    #[test]
    fn test_merged_settings_are_validated() {
        let err = merge(&["relay-rs"], Environment::Production).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConfigurationMerger::file_loader(Path::new("/nope/relay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
