//! The chain access used by the deploy scripts

use std::str::FromStr;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tracing::debug;

use crate::errors::ScriptError;

/// The operations the deployment needs from a chain
///
/// Implemented over JSON-RPC by [`RpcClient`]; tests substitute their own.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The address deploying and configuring the contracts
    fn deployer_address(&self) -> Address;

    /// The chain ID of the connected network
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// The next nonce of the deployer, including pending transactions
    async fn nonce(&self) -> Result<u64, ScriptError>;

    /// Send a contract creation transaction, returning the created address
    async fn deploy(&self, init_code: Bytes) -> Result<Address, ScriptError>;

    /// Send a transaction and wait for it to succeed
    async fn send(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError>;

    /// Execute a read-only call
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ScriptError>;
}

/// A [`ChainClient`] signing with a local private key over HTTP JSON-RPC
#[derive(Clone)]
pub struct RpcClient {
    /// The signing provider
    provider: DynProvider<Ethereum>,
    /// The address of the signer
    deployer: Address,
}

/// Sets up the signing client with which to deploy and configure the contracts
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let deployer = signer.address();
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok(RpcClient {
        provider: DynProvider::new(provider),
        deployer,
    })
}

/// Sets up a read-only provider, for commands that send no transactions
pub fn setup_read_only_provider(rpc_url: &str) -> Result<DynProvider<Ethereum>, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(DynProvider::new(provider))
}

impl RpcClient {
    /// Send a transaction and wait for its receipt, failing on revert
    async fn send_and_confirm(
        &self,
        tx: TransactionRequest,
        wrap_err: fn(String) -> ScriptError,
    ) -> Result<TransactionReceipt, ScriptError> {
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| wrap_err(e.to_string()))?;
        debug!("Sent transaction {:#x}", pending_tx.tx_hash());

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| wrap_err(e.to_string()))?;
        if !receipt.status() {
            return Err(wrap_err(format!(
                "transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        Ok(receipt)
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn nonce(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_transaction_count(self.deployer)
            .pending()
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let receipt = self
            .send_and_confirm(tx, ScriptError::ContractDeployment)
            .await?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in receipt of {:#x}",
                receipt.transaction_hash
            ))
        })
    }

    async fn send(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        let receipt = self
            .send_and_confirm(tx, ScriptError::ContractInteraction)
            .await?;

        Ok(receipt.transaction_hash)
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ScriptError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);

        self.provider
            .call(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}
