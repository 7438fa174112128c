//! Logging built on `tracing-subscriber`
//!
//! Console output with optional colors, file output in full, compact or json
//! format with size-based rotation and gzip of rotated files, and a reload
//! handle for changing the level filter at runtime.

pub mod compression;
pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};
use writer::RotatingFileWriter;

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Changes the active level filter of an installed logger
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replace the filter with a level or `EnvFilter` directive.
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        let filter = EnvFilter::try_new(level)
            .map_err(|e| LoggerError::config(format!("Invalid log level '{}': {}", level, e)))?;
        self.inner.reload(filter).map_err(|e| LoggerError::Reload {
            message: e.to_string(),
        })
    }

    pub fn current_level(&self) -> Option<String> {
        self.inner.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber.
pub fn init_logger(config: &LoggerConfig) -> Result<LogLevelHandle, LoggerError> {
    config.validate()?;

    let (filter, handle) = reload::Layer::new(config.env_filter()?);
    let layers = build_layers(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggerError::Init {
            message: e.to_string(),
        })?;

    Ok(LogLevelHandle { inner: handle })
}

// File layer goes first so console ANSI settings never reach the file output
fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers = Vec::with_capacity(2);

    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    Ok(layers)
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();
    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(config)?;
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_layers_respects_outputs() {
        let dir = tempdir().unwrap();
        let mut config = LoggerConfig::default();
        config.file.enabled = true;
        config.file.path = dir.path().join("relay.log");

        assert_eq!(build_layers(&config).unwrap().len(), 2);

        config.console.enabled = false;
        assert_eq!(build_layers(&config).unwrap().len(), 1);
        assert!(config.file.path.exists());
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let mut config = LoggerConfig::default();
        config.console.enabled = false;
        assert!(matches!(
            init_logger(&config),
            Err(LoggerError::Config { .. })
        ));
    }

    #[test]
    fn test_level_handle_reloads_filter() {
        let (layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));
        let subscriber = tracing_subscriber::registry().with(layer);
        let handle = LogLevelHandle { inner: handle };

        tracing::subscriber::with_default(subscriber, || {
            handle.set_level("relay_rs=debug").unwrap();
            assert!(handle.current_level().unwrap().contains("relay_rs"));
            assert!(handle.set_level("relay_rs=loud").is_err());
        });
    }
}
