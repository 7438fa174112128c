//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Notification dispatch and search-index relay
#[derive(Parser, Debug)]
#[command(name = "relay-rs")]
#[command(about = "Notification dispatch and search-index relay for a marketing site")]
#[command(long_about = "
relay-rs turns website contact forms and analysis requests into transactional
emails, and forwards changed URLs to IndexNow.

EXAMPLES:
    # Start the server with default configuration
    relay-rs serve

    # Start server on custom host and port
    relay-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    relay-rs --config /etc/relay-rs/production.toml serve

    # Check configuration without starting the server
    relay-rs --env production serve --dry-run

    # Ask search engines to re-crawl pages
    relay-rs index https://www.example.com/ https://www.example.com/pricing
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// Environment variables still apply on top.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (`RELAY_APP_ENV`)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   relay-rs serve                           # Start with defaults
    ///   relay-rs serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   relay-rs serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override; wins over --verbose/--quiet and the config file
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration, build the email provider, and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Submit URLs to IndexNow and exit
    Index {
        /// Absolute http(s) URLs on the configured host
        #[arg(required = true, value_name = "URL", value_parser = super::validation::validate_url)]
        urls: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Checks clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Serve {
            host: Some(host),
            port: Some(port),
            ..
        }) = &self.command
        {
            if host == "0.0.0.0" && *port < 1024 {
                return Err(
                    "Binding to 0.0.0.0 on a privileged port (< 1024) typically requires root privileges"
                        .to_string(),
                );
            }
        }

        Ok(())
    }

    /// Global log level from -v/-q, if any.
    pub fn global_log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else {
            None
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
