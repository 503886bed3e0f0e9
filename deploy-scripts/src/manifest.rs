//! The deployment manifest, persisting deployed addresses across runs
//!
//! One manifest is kept per network at `<deployments-dir>/<network>.json`. It is
//! rewritten after every deployment so that an aborted run keeps the records of
//! the steps that succeeded.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, Bytes, TxHash, B256};
use serde::{Deserialize, Serialize};

use crate::{constants::JSON_EXTENSION, errors::DeployError, network::Network};

/// A single deployed contract
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The name of the contract artifact the deployment was created from
    pub contract: String,
    /// The address the contract was deployed to
    pub address: Address,
    /// The constructor arguments, in human-readable form
    pub args: Vec<String>,
    /// The ABI-encoded constructor arguments
    pub constructor_data: Bytes,
    /// The keccak256 hash of the creation bytecode, without arguments
    pub bytecode_hash: B256,
    /// The hash of the deployment transaction
    pub transaction_hash: Option<TxHash>,
    /// The block the deployment transaction was included in
    pub block_number: Option<u64>,
}

impl DeploymentRecord {
    /// Whether the record was produced from the given bytecode and arguments
    pub fn matches(&self, bytecode_hash: B256, constructor_data: &[u8]) -> bool {
        self.bytecode_hash == bytecode_hash && self.constructor_data.as_ref() == constructor_data
    }
}

/// The set of deployments on a single network
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The name of the network
    pub network: String,
    /// The chain ID of the network
    pub chain_id: u64,
    /// The deployments, keyed by deployment name
    #[serde(default)]
    pub deployments: BTreeMap<String, DeploymentRecord>,
}

impl Manifest {
    /// An empty manifest for `network`
    pub fn new(network: Network) -> Self {
        Self {
            network: network.to_string(),
            chain_id: network.chain_id(),
            deployments: BTreeMap::new(),
        }
    }

    /// The path of the manifest for `network` under `deployments_dir`
    pub fn path(deployments_dir: &Path, network: Network) -> PathBuf {
        deployments_dir.join(format!("{network}.{JSON_EXTENSION}"))
    }

    /// Load the manifest at `path`, or an empty one if none exists yet
    pub fn load_or_default(path: &Path, network: Network) -> Result<Self, DeployError> {
        if !path.exists() {
            return Ok(Self::new(network));
        }

        let contents =
            fs::read_to_string(path).map_err(|e| DeployError::ReadDeployments(e.to_string()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .map_err(|e| DeployError::ReadDeployments(format!("{}: {e}", path.display())))?;

        if manifest.chain_id != network.chain_id() {
            return Err(DeployError::Configuration(format!(
                "manifest {} belongs to chain {}, but {} is chain {}",
                path.display(),
                manifest.chain_id,
                network,
                network.chain_id()
            )));
        }

        Ok(manifest)
    }

    /// Write the manifest to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), DeployError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
        fs::write(path, contents).map_err(|e| DeployError::WriteDeployments(e.to_string()))
    }

    /// The record for `name`, if it has been deployed
    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.deployments.get(name)
    }

    /// The address of `name`, failing if it has not been deployed
    pub fn address_of(&self, name: &str) -> Result<Address, DeployError> {
        self.get(name)
            .map(|record| record.address)
            .ok_or_else(|| DeployError::MissingDeployment(name.to_string()))
    }

    /// Insert or replace the record for `name`
    pub fn insert(&mut self, name: &str, record: DeploymentRecord) {
        self.deployments.insert(name.to_string(), record);
    }
}
