//! Source verification of deployed contracts on a block explorer

use std::path::PathBuf;

use alloy_primitives::{hex, Address, Bytes};
use async_trait::async_trait;
use tool_utils::run_command_async;
use tracing::info;

use crate::{
    constants::{FORGE_COMMAND, ROOT_FLAG, VERIFY_COMMAND},
    errors::ScriptError,
};

/// A request to verify one deployed contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    /// The deployed address
    pub address: Address,
    /// The name of the compiled contract
    pub contract_name: String,
    /// The ABI-encoded constructor arguments the contract was deployed with
    pub constructor_args: Bytes,
}

/// A service verifying contract sources on a block explorer
#[async_trait]
pub trait ContractVerifier: Send + Sync {
    /// Submit the request and wait for the explorer to accept it
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError>;
}

/// Verifies contracts through `forge verify-contract`
#[derive(Clone, Debug)]
pub struct ForgeVerifier {
    /// The root of the project the contracts were compiled from
    project_root: PathBuf,
    /// The chain the contracts are deployed on
    chain_id: u64,
    /// The block explorer API key, forge falls back to its own config if unset
    etherscan_api_key: Option<String>,
}

impl ForgeVerifier {
    /// Constructor
    pub fn new(project_root: PathBuf, chain_id: u64, etherscan_api_key: Option<String>) -> Self {
        Self {
            project_root,
            chain_id,
            etherscan_api_key,
        }
    }

    /// The arguments passed to `forge` for the given request
    fn args(&self, request: &VerificationRequest) -> Vec<String> {
        let mut args = vec![
            VERIFY_COMMAND.to_string(),
            ROOT_FLAG.to_string(),
            self.project_root.display().to_string(),
            "--chain".to_string(),
            self.chain_id.to_string(),
            "--constructor-args".to_string(),
            hex::encode_prefixed(&request.constructor_args),
            // Wait for the explorer to finish verifying
            "--watch".to_string(),
        ];
        if let Some(key) = &self.etherscan_api_key {
            args.push("--etherscan-api-key".to_string());
            args.push(key.clone());
        }
        args.push(format!("{:#x}", request.address));
        args.push(request.contract_name.clone());

        args
    }
}

#[async_trait]
impl ContractVerifier for ForgeVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError> {
        info!(
            "Verifying {} at {:#x}",
            request.contract_name, request.address
        );

        let mut verify_cmd = tokio::process::Command::new(FORGE_COMMAND);
        verify_cmd.args(self.args(request));

        run_command_async(verify_cmd).await.map_err(|e| {
            ScriptError::ContractVerification(format!("{}: {}", request.contract_name, e))
        })?;

        info!("Verified {} at {:#x}", request.contract_name, request.address);
        Ok(())
    }
}
