//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::primitives::Address;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum DeployError {
    /// Error reading the deployment manifest
    ReadDeployments(String),
    /// Error writing the deployment manifest
    WriteDeployments(String),
    /// Error reading or parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The selected network does not match the connected chain or manifest
    Configuration(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A deployment needed by this step is not in the manifest
    MissingDeployment(String),
    /// The pair address reported by the factory differs from the computed one
    PairAddressMismatch {
        /// The address computed off-chain
        expected: Address,
        /// The address reported by the factory
        actual: Address,
    },
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            DeployError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            DeployError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            DeployError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            DeployError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            DeployError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            DeployError::MissingDeployment(name) => {
                write!(f, "no deployment named `{}` in the manifest", name)
            }
            DeployError::PairAddressMismatch { expected, actual } => write!(
                f,
                "factory created pair at {:#x}, expected {:#x}",
                actual, expected
            ),
        }
    }
}

impl Error for DeployError {}
