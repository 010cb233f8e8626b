//! Implementations of the various deploy scripts

use alloy::providers::Provider;
use tool_utils::{prompt_for_confirmation, prompt_for_eth_address};
use tracing::{info, warn};

use crate::{
    artifacts::{compile_contracts, ContractArtifacts},
    cli::{DeployArgs, PredictArgs, ValidateArgs},
    client::{setup_client, setup_read_only_provider, ChainClient},
    config::{parse_address, DeploymentConfig},
    deploy::VaultDeployer,
    errors::ScriptError,
    network::Network,
    utils::{predict_addresses, write_deployment},
    verify::ForgeVerifier,
};

/// Compile, deploy, configure and record a vault and its strategy
pub async fn deploy(args: DeployArgs, network: Network) -> Result<(), ScriptError> {
    // Nothing touches the network until the config is complete
    let mut config = DeploymentConfig::load(&args.config)?;
    if args.no_verify {
        config.flags.verify = false;
    }
    let subsidy_registry = args
        .subsidy_registry
        .as_deref()
        .map(parse_address)
        .transpose()
        .map_err(ScriptError::InvalidConfig)?;

    if args.skip_compile {
        warn!("Skipping compilation, using existing artifacts");
    } else {
        info!("Compiling contracts in {}", args.project_root.display());
        compile_contracts(&args.project_root)?;
    }
    let artifacts = ContractArtifacts::load(
        &args.project_root.join(&args.artifacts_dir),
        &config.contracts,
    )?;
    artifacts.check_interfaces(&config.flags)?;

    let client = setup_client(&args.priv_key, &args.rpc_url)?;
    if !args.yes {
        let prompt = format!(
            "Deploy {} to {} from {:#x}?",
            config.vault.name,
            network,
            client.deployer_address()
        );
        if !prompt_for_confirmation(&prompt).map_err(|e| ScriptError::Prompt(e.to_string()))? {
            return Err(ScriptError::Aborted);
        }
    }

    let verifier = ForgeVerifier::new(
        args.project_root.clone(),
        network.chain_id(),
        args.etherscan_api_key.clone(),
    );
    let outcome = VaultDeployer::new(
        &client,
        &verifier,
        network,
        &config,
        &artifacts,
        subsidy_registry,
    )
    .run()
    .await?;

    write_deployment(
        &args.deployments_path,
        network,
        &config.vault.symbol,
        &config.strategy,
        &outcome,
    )?;
    info!(
        "Deployment of {} recorded in {}",
        config.vault.symbol,
        args.deployments_path.display()
    );

    Ok(())
}

/// Log the addresses the next vault deployment from an account would use
pub async fn predict(args: PredictArgs) -> Result<(), ScriptError> {
    let creator = match args.creator {
        Some(creator) => creator,
        None => prompt_for_eth_address("Enter the deployer address")
            .map_err(|e| ScriptError::Prompt(e.to_string()))?,
    };
    let creator = parse_address(&creator).map_err(ScriptError::InvalidConfig)?;

    let nonce = match args.nonce {
        Some(nonce) => nonce,
        None => setup_read_only_provider(&args.rpc_url)?
            .get_transaction_count(creator)
            .pending()
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))?,
    };

    let predicted = predict_addresses(creator, nonce)?;
    info!("Nonce: {}", nonce);
    info!("Vault: {:#x}", predicted.vault);
    info!("Strategy: {:#x}", predicted.strategy);

    Ok(())
}

/// Check a deployment config for missing and invalid fields
pub fn validate(args: ValidateArgs) -> Result<(), ScriptError> {
    let config = DeploymentConfig::load(&args.config)?;
    info!(
        "{} ({}) is ready to deploy as {} + {}",
        config.vault.name, config.vault.symbol, config.contracts.vault, config.contracts.strategy
    );

    Ok(())
}
