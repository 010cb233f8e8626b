//! Definitions of Solidity functions called during deployment

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolValue};

use crate::config::{StrategyParams, VaultParams};

sol! {
    /// The vault methods used after deployment
    interface IVault {
        function transferOwnership(address newOwner) external;
    }

    /// The strategy methods used after deployment
    interface IStrategy {
        function callFee() external view returns (uint256);
        function setCallFee(uint256 fee) external;
        function setHarvestOnDeposit(bool harvestOnDeposit) external;
        function setPendingRewardsFunctionName(string pendingRewardsFunctionName) external;
    }

    /// The registry tracking contracts eligible for gas subsidies
    interface ISubsidyRegistry {
        function registerContract(address contractAddress) external;
    }
}

/// ABI-encode the vault constructor arguments
///
/// `constructor(address strategy, string name, string symbol, uint256 approvalDelay)`
pub fn vault_constructor_args(strategy: Address, params: &VaultParams) -> Bytes {
    (
        strategy,
        params.name.clone(),
        params.symbol.clone(),
        U256::from(params.delay),
    )
        .abi_encode_params()
        .into()
}

/// ABI-encode the strategy constructor arguments
///
/// `constructor(address want, uint256 poolId, address chef, address vault,
/// address unirouter, address keeper, address strategist,
/// address feeRecipient, address[] outputToNativeRoute,
/// address[] outputToLp0Route, address[] outputToLp1Route)`
pub fn strategy_constructor_args(params: &StrategyParams, vault: Address) -> Bytes {
    (
        params.want,
        U256::from(params.pool_id),
        params.chef,
        vault,
        params.unirouter,
        params.keeper,
        params.strategist,
        params.fee_recipient,
        params.output_to_native_route.clone(),
        params.output_to_lp0_route.clone(),
        params.output_to_lp1_route.clone(),
    )
        .abi_encode_params()
        .into()
}
