//! Type definitions used throughout the scripts

use alloy_primitives::{Address, Bytes};

/// The addresses the next two contract creations of a deployer will occupy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictedAddresses {
    /// The vault address, created at the deployer's current nonce
    pub vault: Address,
    /// The strategy address, created at the following nonce
    pub strategy: Address,
}

/// The result of a successful deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentOutcome {
    /// The deployed vault
    pub vault: Address,
    /// The deployed strategy
    pub strategy: Address,
    /// The ABI-encoded vault constructor arguments
    pub vault_constructor_args: Bytes,
    /// The ABI-encoded strategy constructor arguments
    pub strategy_constructor_args: Bytes,
    /// The new vault owner, if ownership was transferred
    pub vault_owner: Option<Address>,
}
