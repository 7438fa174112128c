use clap::Parser;
use relay_rs::cli::{
    Cli, CommandOutcome, execute_command, init_logger_from_settings, load_and_merge_config,
};
use relay_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = load_and_merge_config(&cli)?;

    let _log_handle = init_logger_from_settings(&settings)?;

    match execute_command(&cli, &settings, environment).await {
        Ok(CommandOutcome::StartServer) => Server::new(settings, environment).run().await,
        Ok(CommandOutcome::Done) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
