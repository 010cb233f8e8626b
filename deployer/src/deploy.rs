//! Deployment of a vault and its strategy
//!
//! The vault and strategy each take the other's address in their constructor.
//! The cycle is broken by predicting the strategy's address from the
//! deployer's nonce: the vault is created first, pointing at the address the
//! strategy will occupy, and the strategy is then created with the vault's
//! actual address.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use futures::{join, try_join};
use tracing::{debug, info};

use crate::{
    artifacts::ContractArtifacts,
    client::ChainClient,
    config::DeploymentConfig,
    errors::ScriptError,
    network::Network,
    solidity::{
        strategy_constructor_args, vault_constructor_args, ISubsidyRegistry, IStrategy, IVault,
    },
    types::DeploymentOutcome,
    utils::predict_addresses,
    verify::{ContractVerifier, VerificationRequest},
};

/// Deploys and configures one vault/strategy pair
pub struct VaultDeployer<'a, C, V> {
    /// The chain to deploy to
    client: &'a C,
    /// The block explorer verification service
    verifier: &'a V,
    /// The target network
    network: Network,
    /// The validated deployment config
    config: &'a DeploymentConfig,
    /// The compiled vault and strategy
    artifacts: &'a ContractArtifacts,
    /// The subsidy registry, required on the subsidy chain
    subsidy_registry: Option<Address>,
}

impl<'a, C: ChainClient, V: ContractVerifier> VaultDeployer<'a, C, V> {
    /// Constructor
    pub fn new(
        client: &'a C,
        verifier: &'a V,
        network: Network,
        config: &'a DeploymentConfig,
        artifacts: &'a ContractArtifacts,
        subsidy_registry: Option<Address>,
    ) -> Self {
        Self {
            client,
            verifier,
            network,
            config,
            artifacts,
            subsidy_registry,
        }
    }

    /// Run the whole deployment
    ///
    /// Any failure aborts the remaining steps, except that a failed
    /// verification lets the configuration calls finish first. Contracts
    /// deployed before a failure are left as they are.
    pub async fn run(&self) -> Result<DeploymentOutcome, ScriptError> {
        let subsidy_registry = self.preflight().await?;

        info!("Deploying: {}", self.config.vault.name);
        let deployer = self.client.deployer_address();
        let nonce = self.client.nonce().await?;
        let predicted = predict_addresses(deployer, nonce)?;
        debug!(
            "Predicted vault {:#x} and strategy {:#x} for deployer {:#x} at nonce {}",
            predicted.vault, predicted.strategy, deployer, nonce
        );

        let vault_constructor_args = vault_constructor_args(predicted.strategy, &self.config.vault);
        let vault = self
            .client
            .deploy(self.artifacts.vault.init_code(&vault_constructor_args))
            .await?;
        check_prediction("vault", predicted.vault, vault)?;
        debug!("Vault deployed at {:#x}", vault);

        let strategy_constructor_args = strategy_constructor_args(&self.config.strategy, vault);
        let strategy = self
            .client
            .deploy(self.artifacts.strategy.init_code(&strategy_constructor_args))
            .await?;
        check_prediction("strategy", predicted.strategy, strategy)?;
        debug!("Strategy deployed at {:#x}", strategy);

        info!("Vault: {:#x}", vault);
        info!("Strategy: {:#x}", strategy);
        info!("Want: {:#x}", self.config.strategy.want);
        info!("Pool ID: {}", self.config.strategy.pool_id);

        info!("Running post deployment");
        let vault_request = VerificationRequest {
            address: vault,
            contract_name: self.artifacts.vault.name.clone(),
            constructor_args: vault_constructor_args.clone(),
        };
        let strategy_request = VerificationRequest {
            address: strategy,
            contract_name: self.artifacts.strategy.name.clone(),
            constructor_args: strategy_constructor_args.clone(),
        };

        // Verification is slow, so the configuration calls proceed meanwhile.
        // Configuration always runs to completion; a verification error is
        // reported after it.
        let (verified, configured) = join!(
            self.verify_contracts(&vault_request, &strategy_request),
            self.configure(vault, strategy),
        );
        let vault_owner = configured?;
        verified?;

        if let Some(registry) = subsidy_registry {
            register_subsidy(self.client, registry, vault).await?;
            register_subsidy(self.client, registry, strategy).await?;
        }

        Ok(DeploymentOutcome {
            vault,
            strategy,
            vault_constructor_args,
            strategy_constructor_args,
            vault_owner,
        })
    }

    /// Checks made before anything is sent to the chain
    ///
    /// Returns the subsidy registry to register with, if the network requires it.
    async fn preflight(&self) -> Result<Option<Address>, ScriptError> {
        let chain_id = self.client.chain_id().await?;
        if chain_id != self.network.chain_id() {
            return Err(ScriptError::ChainMismatch {
                expected: self.network.chain_id(),
                actual: chain_id,
            });
        }

        if !self.network.is_subsidy_chain() {
            return Ok(None);
        }

        self.subsidy_registry.map(Some).ok_or_else(|| {
            ScriptError::SubsidyRegistration(format!(
                "a subsidy registry is required on {}",
                self.network
            ))
        })
    }

    /// Verify both contracts, if enabled
    async fn verify_contracts(
        &self,
        vault: &VerificationRequest,
        strategy: &VerificationRequest,
    ) -> Result<(), ScriptError> {
        if !self.config.flags.verify {
            debug!("Skipping verification");
            return Ok(());
        }

        try_join!(self.verifier.verify(vault), self.verifier.verify(strategy))?;
        Ok(())
    }

    /// Apply the post-deployment configuration calls, in order
    ///
    /// Returns the new vault owner if ownership was transferred.
    async fn configure(
        &self,
        vault: Address,
        strategy: Address,
    ) -> Result<Option<Address>, ScriptError> {
        let flags = &self.config.flags;

        if flags.set_pending_rewards_function_name {
            let name = &self.config.strategy.pending_rewards_function_name;
            let call = IStrategy::setPendingRewardsFunctionNameCall {
                pendingRewardsFunctionName: name.clone(),
            };
            self.client
                .send(strategy, call.abi_encode().into())
                .await?;
            info!("Set pending rewards function name to {}", name);
        }

        set_correct_call_fee(self.client, strategy, self.network).await?;

        if flags.harvest_on_deposit {
            let call = IStrategy::setHarvestOnDepositCall {
                harvestOnDeposit: true,
            };
            self.client
                .send(strategy, call.abi_encode().into())
                .await?;
            info!("Enabled harvest on deposit");
        }

        if !flags.transfer_owner {
            return Ok(None);
        }
        let owner = self.config.owners.vault.ok_or_else(|| {
            ScriptError::InvalidConfig("no vault owner to transfer ownership to".to_string())
        })?;

        info!("Transferring vault owner to {:#x}", owner);
        let call = IVault::transferOwnershipCall { newOwner: owner };
        self.client.send(vault, call.abi_encode().into()).await?;

        Ok(Some(owner))
    }
}

/// Set the strategy's call fee to the network's expected value, if it differs
///
/// Returns whether the call fee was changed.
pub async fn set_correct_call_fee<C: ChainClient>(
    client: &C,
    strategy: Address,
    network: Network,
) -> Result<bool, ScriptError> {
    let expected = U256::from(network.call_fee());

    let ret = client
        .call(strategy, IStrategy::callFeeCall {}.abi_encode().into())
        .await?;
    let current = IStrategy::callFeeCall::abi_decode_returns(&ret)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if current == expected {
        debug!("Call fee already {} on {}", current, network);
        return Ok(false);
    }

    let call = IStrategy::setCallFeeCall { fee: expected };
    client.send(strategy, call.abi_encode().into()).await?;
    info!("Call fee set from {} to {} for {}", current, expected, network);

    Ok(true)
}

/// Register a deployed contract with the subsidy registry
pub async fn register_subsidy<C: ChainClient>(
    client: &C,
    registry: Address,
    contract: Address,
) -> Result<(), ScriptError> {
    let call = ISubsidyRegistry::registerContractCall {
        contractAddress: contract,
    };
    client
        .send(registry, call.abi_encode().into())
        .await
        .map_err(|e| ScriptError::SubsidyRegistration(e.to_string()))?;
    info!("Registered {:#x} for subsidy", contract);

    Ok(())
}

/// Fail if a contract was not created at its predicted address
fn check_prediction(
    contract: &str,
    predicted: Address,
    deployed: Address,
) -> Result<(), ScriptError> {
    if predicted != deployed {
        return Err(ScriptError::AddressPrediction(format!(
            "{} deployed at {:#x}, predicted {:#x}",
            contract, deployed, predicted
        )));
    }

    Ok(())
}
