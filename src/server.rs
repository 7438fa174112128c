//! HTTP server lifecycle: state construction, binding and graceful shutdown.

use crate::api::create_router;
use crate::config::{Environment, Settings};
use crate::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;

pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until a shutdown signal.
    ///
    /// # Errors
    /// - Service construction errors (email provider configuration)
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment.as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            cors_origins = ?self.settings.server.cors_origins,
            "Server configuration loaded"
        );

        // Never log the API key itself
        tracing::info!(
            provider = %self.settings.email.provider.as_str(),
            from = %self.settings.email.from,
            internal_recipients = self.settings.email.internal_recipients.len(),
            api_key_configured = !self.settings.email.api_key.is_empty(),
            "Email configuration loaded"
        );

        tracing::info!(
            configured = self.settings.indexnow.is_configured(),
            endpoint = %self.settings.indexnow.endpoint,
            "IndexNow configuration loaded"
        );

        let address = self.settings.server.address();

        let state = AppState::from_settings(self.settings).map_err(|e| {
            tracing::error!(error = %e, "Failed to build services");
            anyhow::anyhow!("Failed to build services: {}", e)
        })?;

        let router = create_router(state);
        tracing::info!("Router configured");

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM. If a handler cannot be installed the
/// corresponding branch never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
