//! Serve command handler: dry-run validation.
//!
//! Starting the server itself is done by `main` through [`crate::server::Server`].

use crate::config::{Environment, Settings};
use crate::services::Services;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Validate configuration and build every service without binding a port.
    pub async fn dry_run(&self) -> anyhow::Result<()> {
        self.config.validate_for(self.environment)?;
        println!("✓ Configuration is valid ({})", self.environment);

        let services = Services::from_settings(&self.config)?;
        let provider = services.dispatch.provider();
        provider
            .validate_config()
            .await
            .map_err(|e| anyhow::anyhow!("Email provider '{}': {}", provider.name(), e))?;
        println!("✓ Email provider '{}' is configured", provider.name());
        println!(
            "✓ Internal recipients: {}",
            self.config.email.internal_recipients.join(", ")
        );

        if services.indexnow.is_configured() {
            println!("✓ IndexNow is configured for {}", self.config.indexnow.host);
        } else {
            println!("- IndexNow is not configured; /api/indexnow will fail");
        }

        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("Dry run completed successfully");
        Ok(())
    }
}
