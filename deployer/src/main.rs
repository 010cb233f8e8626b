use clap::Parser;
use tracing_subscriber::EnvFilter;
use vault_deployer::{cli::Cli, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { network, command } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    command.run(network).await
}
