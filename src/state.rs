//! Application state shared by all request handlers.

use crate::config::Settings;
use crate::services::Services;
use std::sync::Arc;

/// Cloning is cheap: services are `Arc`-backed and settings are shared.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(services: Services, settings: Settings) -> Self {
        Self {
            services,
            settings: Arc::new(settings),
        }
    }

    /// Build services from settings and wrap them into state.
    ///
    /// # Example
    /// ```ignore
    /// let state = AppState::from_settings(settings)?;
    /// ```
    pub fn from_settings(settings: Settings) -> Result<Self, crate::config::ConfigError> {
        let services = Services::from_settings(&settings)?;
        Ok(Self::new(services, settings))
    }
}
