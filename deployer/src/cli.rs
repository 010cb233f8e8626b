//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, predict, validate},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_RPC_URL},
    errors::ScriptError,
    network::Network,
};

/// Deploy yield vaults and their strategies to EVM chains
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, env = "NETWORK", default_value = "localhost")]
    pub network: Network,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy and configure a vault and its strategy
    Deploy(DeployArgs),
    /// Print the addresses the next deployment from an account would use
    Predict(PredictArgs),
    /// Validate a deployment config without touching the network
    Validate(ValidateArgs),
}

impl Command {
    /// Run the command against the given network
    pub async fn run(self, network: Network) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, network).await,
            Command::Predict(args) => predict(args).await,
            Command::Validate(args) => validate(args),
        }
    }
}

/// Deploy a vault and strategy pair.
///
/// The strategy address is predicted from the deployer's nonce so that the
/// vault can be constructed with it; the strategy is then constructed with
/// the vault's address.
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the vault's deployment config
    #[arg(short, long)]
    pub config: PathBuf,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// Root of the contracts project
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Directory containing compiled artifacts, relative to the project root
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Use the existing artifacts instead of compiling
    #[arg(long)]
    pub skip_compile: bool,

    /// Skip block explorer verification regardless of the config
    #[arg(long)]
    pub no_verify: bool,

    /// Block explorer API key used for verification
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Address of the subsidy registry, required on networks with subsidies
    #[arg(long, env = "SUBSIDY_REGISTRY")]
    pub subsidy_registry: Option<String>,

    /// Path of the file recording deployed addresses
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Deploy without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Predict deployment addresses for an account
#[derive(Args)]
pub struct PredictArgs {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The deploying account, prompted for if absent
    #[arg(long)]
    pub creator: Option<String>,

    /// Predict from this nonce instead of the account's pending nonce
    #[arg(long)]
    pub nonce: Option<u64>,
}

/// Validate a deployment config
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the vault's deployment config
    #[arg(short, long)]
    pub config: PathBuf,
}
