//! Parsing and validation of per-vault deployment configs
//!
//! A config file is first deserialized into a "raw" form in which every field
//! is optional, so that absent fields can be reported by name rather than as a
//! deserialization failure. Validation then converts the raw form into a
//! [`DeploymentConfig`], which is the only form the deployment logic accepts.

use std::{fs, path::Path, str::FromStr};

use alloy_primitives::Address;
use itertools::Itertools;
use serde::Deserialize;

use crate::errors::ScriptError;

// -------------------
// | Validated Types |
// -------------------

/// The parameters of the vault contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultParams {
    /// The display name of the vault's receipt token
    pub name: String,
    /// The symbol of the vault's receipt token
    pub symbol: String,
    /// The timelock delay on strategy upgrades, in seconds
    pub delay: u64,
}

/// The parameters of the strategy contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyParams {
    /// The token the strategy accepts
    pub want: Address,
    /// The farm the strategy deposits into
    pub chef: Address,
    /// The ID of the farm's pool
    pub pool_id: u64,
    /// The router used for swaps
    pub unirouter: Address,
    /// The strategist address
    pub strategist: Address,
    /// The keeper address
    pub keeper: Address,
    /// The protocol fee recipient
    pub fee_recipient: Address,
    /// The swap route from the reward token to the native token
    pub output_to_native_route: Vec<Address>,
    /// The swap route from the reward token to the first LP token
    pub output_to_lp0_route: Vec<Address>,
    /// The swap route from the reward token to the second LP token
    pub output_to_lp1_route: Vec<Address>,
    /// The name of the farm's pending rewards view function
    pub pending_rewards_function_name: String,
}

/// The names under which the compiled contracts are found
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractNames {
    /// The vault contract name
    pub vault: String,
    /// The strategy contract name
    pub strategy: String,
}

/// The addresses ownership is transferred to after deployment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Owners {
    /// The new owner of the vault
    pub vault: Option<Address>,
}

/// Switches for the optional post-deployment steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployFlags {
    /// Verify both contracts on the block explorer
    pub verify: bool,
    /// Transfer the vault's ownership to `owners.vault`
    pub transfer_owner: bool,
    /// Set the strategy's pending rewards function name
    pub set_pending_rewards_function_name: bool,
    /// Harvest on every deposit, used on low fee chains
    pub harvest_on_deposit: bool,
}

impl Default for DeployFlags {
    fn default() -> Self {
        Self {
            verify: true,
            transfer_owner: true,
            set_pending_rewards_function_name: false,
            harvest_on_deposit: false,
        }
    }
}

/// A fully populated deployment config
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// The vault parameters
    pub vault: VaultParams,
    /// The strategy parameters
    pub strategy: StrategyParams,
    /// The compiled contract names
    pub contracts: ContractNames,
    /// The post-deployment owners
    pub owners: Owners,
    /// The post-deployment switches
    pub flags: DeployFlags,
}

impl DeploymentConfig {
    /// Read and validate the config at the given path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        RawDeploymentConfig::from_file(path)?.validate()
    }
}

// -------------
// | Raw Types |
// -------------

/// A deployment config as it appears on disk
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeploymentConfig {
    /// The vault section
    pub vault: Option<RawVaultParams>,
    /// The strategy section
    pub strategy: Option<RawStrategyParams>,
    /// The contract names section
    pub contracts: Option<RawContractNames>,
    /// The owners section
    #[serde(default)]
    pub owners: RawOwners,
    /// The flags section
    #[serde(default)]
    pub flags: DeployFlags,
}

/// The vault section of a raw config
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVaultParams {
    /// The receipt token name
    pub name: Option<String>,
    /// The receipt token symbol
    pub symbol: Option<String>,
    /// The strategy upgrade delay, in seconds
    pub delay: Option<u64>,
}

/// The strategy section of a raw config
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStrategyParams {
    /// The want token
    pub want: Option<String>,
    /// The farm contract
    pub chef: Option<String>,
    /// The farm pool ID
    pub pool_id: Option<u64>,
    /// The swap router
    pub unirouter: Option<String>,
    /// The strategist
    pub strategist: Option<String>,
    /// The keeper
    pub keeper: Option<String>,
    /// The protocol fee recipient
    #[serde(alias = "beefyFeeRecipient")]
    pub fee_recipient: Option<String>,
    /// Reward token to native token route
    pub output_to_native_route: Option<Vec<String>>,
    /// Reward token to LP token 0 route
    pub output_to_lp0_route: Option<Vec<String>>,
    /// Reward token to LP token 1 route
    pub output_to_lp1_route: Option<Vec<String>>,
    /// The pending rewards view function name
    pub pending_rewards_function_name: Option<String>,
}

/// The contract names section of a raw config
#[derive(Debug, Default, Deserialize)]
pub struct RawContractNames {
    /// The vault contract name
    pub vault: Option<String>,
    /// The strategy contract name
    pub strategy: Option<String>,
}

/// The owners section of a raw config
#[derive(Debug, Default, Deserialize)]
pub struct RawOwners {
    /// The new owner of the vault
    pub vault: Option<String>,
}

impl RawDeploymentConfig {
    /// Read a raw config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadConfig(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Parse a raw config from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(contents).map_err(|e| ScriptError::ReadConfig(e.to_string()))
    }

    /// Validate the raw config, reporting every absent field at once
    pub fn validate(self) -> Result<DeploymentConfig, ScriptError> {
        let mut fields = FieldChecker::default();

        let vault = validate_vault(self.vault.unwrap_or_default(), &mut fields);
        let strategy = validate_strategy(self.strategy.unwrap_or_default(), &mut fields);
        let contracts = validate_contract_names(self.contracts.unwrap_or_default(), &mut fields);
        let owners = validate_owners(self.owners, &self.flags, &mut fields);
        fields.finish()?;

        match (vault, strategy, contracts, owners) {
            (Some(vault), Some(strategy), Some(contracts), Some(owners)) => Ok(DeploymentConfig {
                vault,
                strategy,
                contracts,
                owners,
                flags: self.flags,
            }),
            _ => Err(ScriptError::InvalidConfig("incomplete config".to_string())),
        }
    }
}

// --------------
// | Validation |
// --------------

/// Accumulates absent and invalid fields across a whole config
#[derive(Default)]
struct FieldChecker {
    /// Dotted paths of absent fields
    missing: Vec<String>,
    /// Descriptions of invalid fields
    invalid: Vec<String>,
}

impl FieldChecker {
    /// Record the field as missing if absent
    fn required<T>(&mut self, path: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(path.to_string());
        }
        value
    }

    /// A required string, where the empty string counts as absent
    fn string(&mut self, path: &str, value: Option<String>) -> Option<String> {
        let value = value.filter(|s| !s.trim().is_empty());
        self.required(path, value)
    }

    /// A required address
    fn address(&mut self, path: &str, value: Option<String>) -> Option<Address> {
        let value = self.string(path, value)?;
        match parse_address(&value) {
            Ok(addr) => Some(addr),
            Err(e) => {
                self.invalid.push(format!("{path}: {e}"));
                None
            }
        }
    }

    /// A required, non-empty list of addresses
    fn route(&mut self, path: &str, value: Option<Vec<String>>) -> Option<Vec<Address>> {
        let value = self.required(path, value)?;
        if value.is_empty() {
            self.invalid.push(format!("{path}: route must not be empty"));
            return None;
        }

        let mut route = Vec::with_capacity(value.len());
        for (i, hop) in value.iter().enumerate() {
            match parse_address(hop) {
                Ok(addr) => route.push(addr),
                Err(e) => self.invalid.push(format!("{path}[{i}]: {e}")),
            }
        }

        (route.len() == value.len()).then_some(route)
    }

    /// Record an invalid field
    fn invalid(&mut self, msg: String) {
        self.invalid.push(msg);
    }

    /// Fail if any field was absent or invalid, absent fields take precedence
    fn finish(self) -> Result<(), ScriptError> {
        if !self.missing.is_empty() {
            return Err(ScriptError::MissingConfigFields(self.missing));
        }
        if !self.invalid.is_empty() {
            return Err(ScriptError::InvalidConfig(self.invalid.iter().join("; ")));
        }

        Ok(())
    }
}

/// Parse an address, enforcing the EIP-55 checksum on mixed-case input
pub fn parse_address(s: &str) -> Result<Address, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());

    if mixed_case {
        Address::parse_checksummed(s, None /* chain_id */)
            .map_err(|_| format!("invalid address checksum `{s}`"))
    } else {
        Address::from_str(s).map_err(|e| format!("invalid address `{s}`: {e}"))
    }
}

/// Validate the vault section
fn validate_vault(raw: RawVaultParams, fields: &mut FieldChecker) -> Option<VaultParams> {
    let name = fields.string("vault.name", raw.name);
    let symbol = fields.string("vault.symbol", raw.symbol);
    let delay = fields.required("vault.delay", raw.delay);

    Some(VaultParams {
        name: name?,
        symbol: symbol?,
        delay: delay?,
    })
}

/// Validate the strategy section
fn validate_strategy(raw: RawStrategyParams, fields: &mut FieldChecker) -> Option<StrategyParams> {
    let want = fields.address("strategy.want", raw.want);
    let chef = fields.address("strategy.chef", raw.chef);
    let pool_id = fields.required("strategy.poolId", raw.pool_id);
    let unirouter = fields.address("strategy.unirouter", raw.unirouter);
    let strategist = fields.address("strategy.strategist", raw.strategist);
    let keeper = fields.address("strategy.keeper", raw.keeper);
    let fee_recipient = fields.address("strategy.feeRecipient", raw.fee_recipient);
    let output_to_native_route =
        fields.route("strategy.outputToNativeRoute", raw.output_to_native_route);
    let output_to_lp0_route = fields.route("strategy.outputToLp0Route", raw.output_to_lp0_route);
    let output_to_lp1_route = fields.route("strategy.outputToLp1Route", raw.output_to_lp1_route);
    let pending_rewards_function_name = fields.string(
        "strategy.pendingRewardsFunctionName",
        raw.pending_rewards_function_name,
    );

    // All routes swap out of the same reward token
    if let (Some(native), Some(lp0), Some(lp1)) =
        (&output_to_native_route, &output_to_lp0_route, &output_to_lp1_route)
    {
        if native[0] != lp0[0] || native[0] != lp1[0] {
            fields.invalid(
                "strategy routes must all start from the same output token".to_string(),
            );
        }
    }

    Some(StrategyParams {
        want: want?,
        chef: chef?,
        pool_id: pool_id?,
        unirouter: unirouter?,
        strategist: strategist?,
        keeper: keeper?,
        fee_recipient: fee_recipient?,
        output_to_native_route: output_to_native_route?,
        output_to_lp0_route: output_to_lp0_route?,
        output_to_lp1_route: output_to_lp1_route?,
        pending_rewards_function_name: pending_rewards_function_name?,
    })
}

/// Validate the contract names section
fn validate_contract_names(
    raw: RawContractNames,
    fields: &mut FieldChecker,
) -> Option<ContractNames> {
    let vault = fields.string("contracts.vault", raw.vault);
    let strategy = fields.string("contracts.strategy", raw.strategy);

    Some(ContractNames {
        vault: vault?,
        strategy: strategy?,
    })
}

/// Validate the owners section, the vault owner is required only when it is used
fn validate_owners(
    raw: RawOwners,
    flags: &DeployFlags,
    fields: &mut FieldChecker,
) -> Option<Owners> {
    if flags.transfer_owner {
        let vault = fields.address("owners.vault", raw.vault)?;
        return Some(Owners { vault: Some(vault) });
    }

    match raw.vault.filter(|s| !s.trim().is_empty()) {
        Some(vault) => match parse_address(&vault) {
            Ok(addr) => Some(Owners { vault: Some(addr) }),
            Err(e) => {
                fields.invalid(format!("owners.vault: {e}"));
                None
            }
        },
        None => Some(Owners::default()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    /// A complete config, in the on-disk format
    fn full_config() -> Value {
        json!({
            "vault": {
                "name": "Moo Pangolin SPELL-AVAX",
                "symbol": "MooPangolinSPELL-AVAX",
                "delay": 21600
            },
            "strategy": {
                "want": "0xD4CBC976E1a1A2bf6F4FeA86DEB3308d68638211",
                "chef": "0x1f806f7C8dED893fd3caE279191ad7Aa3798E928",
                "poolId": 3,
                "unirouter": "0xE54Ca86531e17Ef3616d22Ca28b0D458b6C89106",
                "strategist": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "keeper": "0x10aee6B5594942433e7Fc2783598c979B030eF3D",
                "feeRecipient": "0x8Ef7C232470f85Af0809ce5E43888F989eFcAF47",
                "outputToNativeRoute": [
                    "0x60781C2586D68229fde47564546784ab3fACA982",
                    "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"
                ],
                "outputToLp0Route": [
                    "0x60781C2586D68229fde47564546784ab3fACA982",
                    "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"
                ],
                "outputToLp1Route": [
                    "0x60781C2586D68229fde47564546784ab3fACA982",
                    "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7",
                    "0xCE1bFFBD5374Dac86a2893119683F4911a2F7814"
                ],
                "pendingRewardsFunctionName": "pendingReward"
            },
            "contracts": {
                "vault": "BeefyVaultV6",
                "strategy": "StrategyPangolinMiniChefLP"
            },
            "owners": {
                "vault": "0x690216f462615b749bEEB5AA3f1d89a2BEc45Ecf"
            }
        })
    }

    fn validate(value: Value) -> Result<DeploymentConfig, ScriptError> {
        RawDeploymentConfig::from_json(&value.to_string())?.validate()
    }

    fn missing_fields(value: Value) -> Vec<String> {
        match validate(value) {
            Err(ScriptError::MissingConfigFields(fields)) => fields,
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_full_config_validates() {
        let config = validate(full_config()).unwrap();

        assert_eq!(config.vault.delay, 21600);
        assert_eq!(config.strategy.pool_id, 3);
        assert_eq!(config.strategy.output_to_lp1_route.len(), 3);
        assert_eq!(config.contracts.strategy, "StrategyPangolinMiniChefLP");
        assert!(config.owners.vault.is_some());
        assert_eq!(config.flags, DeployFlags::default());
    }

    #[test]
    fn test_default_flags() {
        let flags = DeployFlags::default();
        assert!(flags.verify);
        assert!(flags.transfer_owner);
        assert!(!flags.set_pending_rewards_function_name);
        assert!(!flags.harvest_on_deposit);
    }

    #[test]
    fn test_missing_field_reported() {
        let mut config = full_config();
        config["strategy"].as_object_mut().unwrap().remove("poolId");

        assert_eq!(missing_fields(config), vec!["strategy.poolId"]);
    }

    #[test]
    fn test_every_missing_field_reported() {
        let mut config = full_config();
        config["vault"].as_object_mut().unwrap().remove("symbol");
        config["strategy"].as_object_mut().unwrap().remove("keeper");
        config.as_object_mut().unwrap().remove("contracts");

        assert_eq!(
            missing_fields(config),
            vec![
                "vault.symbol",
                "strategy.keeper",
                "contracts.vault",
                "contracts.strategy"
            ]
        );
    }

    #[test]
    fn test_empty_string_is_missing() {
        let mut config = full_config();
        config["vault"]["name"] = json!("");

        assert_eq!(missing_fields(config), vec!["vault.name"]);
    }

    #[test]
    fn test_null_is_missing() {
        let mut config = full_config();
        config["strategy"]["chef"] = Value::Null;

        assert_eq!(missing_fields(config), vec!["strategy.chef"]);
    }

    #[test]
    fn test_vault_owner_required_for_transfer() {
        let mut config = full_config();
        config.as_object_mut().unwrap().remove("owners");
        assert_eq!(missing_fields(config.clone()), vec!["owners.vault"]);

        config["flags"] = json!({ "transferOwner": false });
        let validated = validate(config).unwrap();
        assert_eq!(validated.owners.vault, None);
    }

    #[test]
    fn test_legacy_fee_recipient_key() {
        let mut config = full_config();
        let strategy = config["strategy"].as_object_mut().unwrap();
        let recipient = strategy.remove("feeRecipient").unwrap();
        strategy.insert("beefyFeeRecipient".to_string(), recipient);

        assert!(validate(config).is_ok());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let mut config = full_config();
        // Flip the case of one letter in a checksummed address
        config["strategy"]["want"] = json!("0xd4CBC976E1a1A2bf6F4FeA86DEB3308d68638211");

        assert!(matches!(validate(config), Err(ScriptError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_address_checksum() {
        assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
        assert!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
        assert!(parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
        assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").is_err());
        assert!(parse_address("0x5aAeb6053F3E94C9").is_err());
    }

    #[test]
    fn test_empty_route_rejected() {
        let mut config = full_config();
        config["strategy"]["outputToLp0Route"] = json!([]);

        assert!(matches!(validate(config), Err(ScriptError::InvalidConfig(_))));
    }

    #[test]
    fn test_routes_share_output_token() {
        let mut config = full_config();
        config["strategy"]["outputToLp0Route"] =
            json!(["0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"]);

        match validate(config) {
            Err(ScriptError::InvalidConfig(msg)) => assert!(msg.contains("same output token")),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_bundled_configs_validate() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs");
        for path in [
            "avax/pangolin-spell-avax.json",
            "cronos/cronoswap-dai-usdc-cro.json",
        ] {
            DeploymentConfig::load(root.join(path)).unwrap();
        }

        // No explorer verification on cronos
        let cronos =
            DeploymentConfig::load(root.join("cronos/cronoswap-dai-usdc-cro.json")).unwrap();
        assert!(!cronos.flags.verify);
        assert!(cronos.flags.transfer_owner);
        assert!(!cronos.flags.set_pending_rewards_function_name);
        assert!(!cronos.flags.harvest_on_deposit);

        let avax = DeploymentConfig::load(root.join("avax/pangolin-spell-avax.json")).unwrap();
        assert!(avax.flags.verify);
    }
}
