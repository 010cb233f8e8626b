//! Utilities for the deploy scripts.

use std::{fs, path::Path};

use alloy_primitives::Address;
use serde_json::{json, Map, Value};

use crate::{
    config::StrategyParams,
    constants::{DEPLOYMENTS_KEY, POOL_ID_KEY, STRATEGY_KEY, VAULT_KEY, WANT_KEY},
    errors::ScriptError,
    network::Network,
    types::{DeploymentOutcome, PredictedAddresses},
};

/// Predict the vault and strategy addresses for a deployer at the given nonce
///
/// The vault is created first, so it takes `nonce` and the strategy `nonce + 1`.
pub fn predict_addresses(
    creator: Address,
    nonce: u64,
) -> Result<PredictedAddresses, ScriptError> {
    let strategy_nonce = nonce.checked_add(1).ok_or_else(|| {
        ScriptError::AddressPrediction(format!("no nonce follows {} for the strategy", nonce))
    })?;

    Ok(PredictedAddresses {
        vault: creator.create(nonce),
        strategy: creator.create(strategy_nonce),
    })
}

/// Read the deployments file, treating a missing file as empty
pub fn read_deployments(file_path: &Path) -> Result<Value, ScriptError> {
    if !file_path.exists() {
        return Ok(json!({}));
    }

    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployment under `deployments.<network>.<vault symbol>`,
/// preserving all other entries
pub fn write_deployment(
    file_path: &Path,
    network: Network,
    vault_symbol: &str,
    strategy_params: &StrategyParams,
    outcome: &DeploymentOutcome,
) -> Result<(), ScriptError> {
    let mut parsed_json = read_deployments(file_path)?;

    let entry = json!({
        VAULT_KEY: format!("{:#x}", outcome.vault),
        STRATEGY_KEY: format!("{:#x}", outcome.strategy),
        WANT_KEY: format!("{:#x}", strategy_params.want),
        POOL_ID_KEY: strategy_params.pool_id,
    });

    let network_entries = parsed_json
        .as_object_mut()
        .and_then(|root| object_entry(root, DEPLOYMENTS_KEY))
        .and_then(|deployments| object_entry(deployments, &network.to_string()))
        .ok_or_else(|| {
            ScriptError::WriteDeployments("deployments file has an unexpected shape".to_string())
        })?;
    network_entries.insert(vault_symbol.to_string(), entry);

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Get the object under `key`, creating it if absent
///
/// Returns `None` if the existing entry is not an object.
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    map.entry(key)
        .or_insert_with(|| json!({}))
        .as_object_mut()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Bytes};

    use super::*;

    #[test]
    fn test_predict_addresses() {
        // The first two contracts created by the default Anvil account
        let deployer = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let predicted = predict_addresses(deployer, 0).unwrap();

        assert_eq!(
            predicted.vault,
            address!("5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(
            predicted.strategy,
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
    }

    #[test]
    fn test_predict_addresses_offset_nonce() {
        let deployer = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let predicted = predict_addresses(deployer, 1).unwrap();

        assert_eq!(
            predicted.vault,
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
        assert_eq!(
            predicted.strategy,
            address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")
        );
    }

    #[test]
    fn test_predict_addresses_last_nonce() {
        let deployer = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let res = predict_addresses(deployer, u64::MAX);

        assert!(matches!(res, Err(ScriptError::AddressPrediction(_))));
    }

    fn outcome(vault: Address, strategy: Address) -> DeploymentOutcome {
        DeploymentOutcome {
            vault,
            strategy,
            vault_constructor_args: Bytes::new(),
            strategy_constructor_args: Bytes::new(),
            vault_owner: None,
        }
    }

    fn strategy_params() -> StrategyParams {
        let token = address!("60781C2586D68229fde47564546784ab3fACA982");
        StrategyParams {
            want: address!("D4CBC976E1a1A2bf6F4FeA86DEB3308d68638211"),
            chef: Address::ZERO,
            pool_id: 3,
            unirouter: Address::ZERO,
            strategist: Address::ZERO,
            keeper: Address::ZERO,
            fee_recipient: Address::ZERO,
            output_to_native_route: vec![token],
            output_to_lp0_route: vec![token],
            output_to_lp1_route: vec![token],
            pending_rewards_function_name: "pendingReward".to_string(),
        }
    }

    #[test]
    fn test_write_deployment_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let params = strategy_params();

        let first = outcome(Address::repeat_byte(1), Address::repeat_byte(2));
        write_deployment(&path, Network::Avax, "mooA", &params, &first).unwrap();
        let second = outcome(Address::repeat_byte(3), Address::repeat_byte(4));
        write_deployment(&path, Network::Avax, "mooB", &params, &second).unwrap();
        write_deployment(&path, Network::Bsc, "mooA", &params, &second).unwrap();

        let json = read_deployments(&path).unwrap();
        let avax = &json[DEPLOYMENTS_KEY]["avax"];
        assert_eq!(
            avax["mooA"][VAULT_KEY],
            format!("{:#x}", Address::repeat_byte(1))
        );
        assert_eq!(
            avax["mooB"][STRATEGY_KEY],
            format!("{:#x}", Address::repeat_byte(4))
        );
        assert_eq!(avax["mooB"][POOL_ID_KEY], 3);
        assert_eq!(
            json[DEPLOYMENTS_KEY]["bsc"]["mooA"][VAULT_KEY],
            format!("{:#x}", Address::repeat_byte(3))
        );
    }

    #[test]
    fn test_write_deployment_rejects_bad_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, r#"{ "deployments": [] }"#).unwrap();

        let res = write_deployment(
            &path,
            Network::Avax,
            "mooA",
            &strategy_params(),
            &outcome(Address::ZERO, Address::ZERO),
        );
        assert!(matches!(res, Err(ScriptError::WriteDeployments(_))));
    }
}
