//! Dispatches parsed CLI commands.

use super::handlers::{IndexCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};

/// What `main` should do after a command ran
#[derive(Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server with the merged settings
    StartServer,
    /// The command finished; exit
    Done,
}

pub async fn execute_command(
    cli: &Cli,
    settings: &Settings,
    environment: Environment,
) -> anyhow::Result<CommandOutcome> {
    cli.validate().map_err(|msg| anyhow::anyhow!(msg))?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings.clone(), environment)
                .dry_run()
                .await?;
            Ok(CommandOutcome::Done)
        }
        Some(Commands::Serve { .. }) | None => Ok(CommandOutcome::StartServer),
        Some(Commands::Index { urls }) => {
            IndexCommandHandler::new(settings)?
                .execute(urls.clone())
                .await?;
            Ok(CommandOutcome::Done)
        }
    }
}
