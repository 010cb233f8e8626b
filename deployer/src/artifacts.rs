//! Compilation of the contracts and parsing of the resulting artifacts

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use alloy::json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::Deserialize;
use tool_utils::run_command;
use tracing::debug;

use crate::{
    config::{ContractNames, DeployFlags},
    constants::{ARTIFACT_EXTENSION, BUILD_COMMAND, FORGE_COMMAND, ROOT_FLAG},
    errors::ScriptError,
};

/// The number of vault constructor arguments
const VAULT_CONSTRUCTOR_ARITY: usize = 4;
/// The number of strategy constructor arguments
const STRATEGY_CONSTRUCTOR_ARITY: usize = 11;

/// Compile the contracts of the project rooted at the given path
///
/// Assumes that `forge` is locally available.
pub fn compile_contracts(project_root: &Path) -> Result<(), ScriptError> {
    let mut build_cmd = Command::new(FORGE_COMMAND);
    build_cmd.arg(BUILD_COMMAND);
    build_cmd.arg(ROOT_FLAG);
    build_cmd.arg(project_root);

    run_command(build_cmd).map_err(|e| ScriptError::ContractCompilation(e.to_string()))
}

/// A compiled contract
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

/// The on-disk shape shared by Foundry and Hardhat artifacts
#[derive(Deserialize)]
struct ArtifactFile {
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: ArtifactBytecode,
}

/// Hardhat stores bytecode as a hex string, Foundry nests it under `object`
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat layout
    Hex(String),
    /// Foundry layout
    Object {
        /// The hex bytecode
        object: String,
    },
}

impl ArtifactBytecode {
    /// The hex bytecode string
    fn hex(&self) -> &str {
        match self {
            ArtifactBytecode::Hex(hex) => hex,
            ArtifactBytecode::Object { object } => object,
        }
    }
}

impl ContractArtifact {
    /// Parse an artifact from its JSON contents
    pub fn from_json(name: &str, contents: &str) -> Result<Self, ScriptError> {
        let file: ArtifactFile = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;

        let hex = file.bytecode.hex();
        if hex.contains("__") {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: bytecode has unlinked libraries"
            )));
        }

        let bytecode = Bytes::from_str(hex)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: empty bytecode, is it an interface or abstract contract?"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            abi: file.abi,
            bytecode,
        })
    }

    /// Locate and parse the artifact for the named contract
    pub fn load(artifacts_dir: &Path, name: &str) -> Result<Self, ScriptError> {
        let path = find_artifact(artifacts_dir, name)?;
        debug!("Loading {} artifact from {}", name, path.display());

        let contents =
            fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        Self::from_json(name, &contents)
    }

    /// The creation code for the given ABI-encoded constructor arguments
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        [self.bytecode.as_ref(), constructor_args].concat().into()
    }

    /// Check that the constructor takes the expected number of arguments
    fn check_constructor_arity(&self, expected: usize) -> Result<(), ScriptError> {
        let actual = self.abi.constructor.as_ref().map_or(0, |c| c.inputs.len());
        if actual != expected {
            return Err(ScriptError::ArtifactParsing(format!(
                "{}: constructor takes {} arguments, expected {}",
                self.name, actual, expected
            )));
        }

        Ok(())
    }

    /// Check that the contract exposes the named function
    fn check_function(&self, function: &str) -> Result<(), ScriptError> {
        if self.abi.function(function).is_none() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{}: missing function `{}`",
                self.name, function
            )));
        }

        Ok(())
    }
}

/// The vault and strategy artifacts of a deployment
#[derive(Clone, Debug)]
pub struct ContractArtifacts {
    /// The vault artifact
    pub vault: ContractArtifact,
    /// The strategy artifact
    pub strategy: ContractArtifact,
}

impl ContractArtifacts {
    /// Load both artifacts named in the config
    pub fn load(artifacts_dir: &Path, names: &ContractNames) -> Result<Self, ScriptError> {
        Ok(Self {
            vault: ContractArtifact::load(artifacts_dir, &names.vault)?,
            strategy: ContractArtifact::load(artifacts_dir, &names.strategy)?,
        })
    }

    /// Check that the artifacts support every call the deployment will make
    pub fn check_interfaces(&self, flags: &DeployFlags) -> Result<(), ScriptError> {
        self.vault.check_constructor_arity(VAULT_CONSTRUCTOR_ARITY)?;
        self.strategy
            .check_constructor_arity(STRATEGY_CONSTRUCTOR_ARITY)?;

        self.strategy.check_function("callFee")?;
        self.strategy.check_function("setCallFee")?;
        if flags.set_pending_rewards_function_name {
            self.strategy
                .check_function("setPendingRewardsFunctionName")?;
        }
        if flags.harvest_on_deposit {
            self.strategy.check_function("setHarvestOnDeposit")?;
        }
        if flags.transfer_owner {
            self.vault.check_function("transferOwnership")?;
        }

        Ok(())
    }
}

/// Recursively search the artifacts directory for `<name>.json`
///
/// Fails if no artifact, or more than one, matches.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
    let mut matches = Vec::new();
    collect_matches(artifacts_dir, &file_name, &mut matches)?;

    match matches.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for `{}` in {}",
            name,
            artifacts_dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "multiple artifacts for `{}`: {:?}",
            name, matches
        ))),
    }
}

/// Walk `dir`, collecting the paths of files named `file_name`
fn collect_matches(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();
        if path.is_dir() {
            collect_matches(&path, file_name, matches)?;
        } else if path.file_name().is_some_and(|f| f == file_name) {
            matches.push(path);
        }
    }

    Ok(())
}
