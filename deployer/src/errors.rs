//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use itertools::Itertools;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a deployment config file
    ReadConfig(String),
    /// One or more required config fields are absent, by dotted path
    MissingConfigFields(Vec<String>),
    /// A config field is present but invalid
    InvalidConfig(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error compiling the contracts
    ContractCompilation(String),
    /// Error locating or parsing a compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The RPC endpoint serves a different chain than the selected network
    ChainMismatch {
        /// The chain ID of the selected network
        expected: u64,
        /// The chain ID reported by the RPC endpoint
        actual: u64,
    },
    /// Error fetching the nonce of the deployer
    NonceFetching(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// A deployed contract landed at a different address than predicted
    AddressPrediction(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error verifying a contract on the block explorer
    ContractVerification(String),
    /// Error registering a contract with the subsidy registry
    SubsidyRegistration(String),
    /// Error reading the operator's answer to a prompt
    Prompt(String),
    /// The operator declined the deployment
    Aborted,
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadConfig(s) => write!(f, "error reading config: {}", s),
            ScriptError::MissingConfigFields(fields) => {
                write!(f, "config values undefined: {}", fields.iter().join(", "))
            }
            ScriptError::InvalidConfig(s) => write!(f, "invalid config: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contracts: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ChainMismatch { expected, actual } => write!(
                f,
                "RPC endpoint is on chain {}, expected chain {}",
                actual, expected
            ),
            ScriptError::NonceFetching(s) => write!(f, "error fetching nonce: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::AddressPrediction(s) => write!(f, "address prediction failed: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::ContractVerification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::SubsidyRegistration(s) => write!(f, "error registering subsidy: {}", s),
            ScriptError::Prompt(s) => write!(f, "error reading input: {}", s),
            ScriptError::Aborted => write!(f, "deployment aborted by operator"),
        }
    }
}

impl Error for ScriptError {}
