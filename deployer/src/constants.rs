//! Constants used in the deploy scripts

/// The call fee strategies are deployed with, and the expected call fee on
/// networks without a specific override
pub const DEFAULT_CALL_FEE: u64 = 111;

/// The name of the Forge command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the build subcommand
pub const BUILD_COMMAND: &str = "build";

/// The name of the verification subcommand
pub const VERIFY_COMMAND: &str = "verify-contract";

/// The flag selecting the project root for Forge commands
pub const ROOT_FLAG: &str = "--root";

/// The default directory, relative to the project root, containing compiled artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "out";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The vault address key of a deployment entry
pub const VAULT_KEY: &str = "vault";

/// The strategy address key of a deployment entry
pub const STRATEGY_KEY: &str = "strategy";

/// The want address key of a deployment entry
pub const WANT_KEY: &str = "want";

/// The pool ID key of a deployment entry
pub const POOL_ID_KEY: &str = "poolId";

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
