//! The deployment context threaded through every deploy step
//!
//! [`Deployments`] owns the chain client, the artifacts, the confirmation policy,
//! and the network's manifest. Deploying through it is idempotent: a contract whose
//! bytecode and constructor arguments match the manifest, and whose code is still
//! on chain, is reused instead of redeployed.

use std::path::{Path, PathBuf};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256},
};
use tracing::{error, info, warn};

use crate::{
    artifacts::{Artifact, ArtifactStore},
    client::DeployClient,
    errors::DeployError,
    manifest::{DeploymentRecord, Manifest},
    network::Network,
    solidity::{encode_constructor_args, format_arg},
};

/// The state of a deployment run on a single network
pub struct Deployments<C> {
    /// The client transactions are sent through
    client: C,
    /// The number of confirmations awaited for each transaction
    confirmations: u64,
    /// The compiled contract artifacts
    artifacts: ArtifactStore,
    /// The deployments made so far, on this run or a previous one
    manifest: Manifest,
    /// Where the manifest is persisted
    manifest_path: PathBuf,
}

impl<C: DeployClient> Deployments<C> {
    /// Set up a deployment run on `network`, loading the manifest from
    /// `deployments_dir`.
    ///
    /// Fails if the client is connected to a different chain than `network`
    pub async fn new(
        client: C,
        network: Network,
        confirmations: u64,
        artifacts: ArtifactStore,
        deployments_dir: &Path,
    ) -> Result<Self, DeployError> {
        let chain_id = client.chain_id().await?;
        if chain_id != network.chain_id() {
            return Err(DeployError::Configuration(format!(
                "connected to chain {}, but {} is chain {}",
                chain_id,
                network,
                network.chain_id()
            )));
        }

        let manifest_path = Manifest::path(deployments_dir, network);
        let manifest = Manifest::load_or_default(&manifest_path, network)?;
        info!(
            "deploying to {} (chain {}) from {:#x}, awaiting {} confirmations, artifacts in {}",
            network,
            chain_id,
            client.deployer(),
            confirmations,
            artifacts.dir().display()
        );

        Ok(Self {
            client,
            confirmations,
            artifacts,
            manifest,
            manifest_path,
        })
    }

    /// The client transactions are sent through
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The account deployments are sent from
    pub fn deployer(&self) -> Address {
        self.client.deployer()
    }

    /// The number of confirmations awaited for each transaction
    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    /// The deployments made so far
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Load the artifact for `contract`, `None` if there is no artifact file for it
    pub fn find_artifact(&self, contract: &str) -> Result<Option<Artifact>, DeployError> {
        self.artifacts.find(contract)
    }

    /// The address of a previous deployment, which must be in the manifest
    pub fn get(&self, name: &str) -> Result<Address, DeployError> {
        self.manifest.address_of(name)
    }

    /// Deploy `contract` under the deployment name `name` with constructor `args`,
    /// unless an identical deployment already exists.
    ///
    /// The manifest is persisted before returning
    pub async fn deploy(
        &mut self,
        name: &str,
        contract: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeploymentRecord, DeployError> {
        let artifact = self.artifacts.load(contract)?;
        let bytecode_hash = artifact.bytecode_hash();
        let constructor_data = encode_constructor_args(&args);

        if let Some(record) = self.reusable_record(name, bytecode_hash, &constructor_data).await? {
            info!("reusing \"{}\" at {:#x}", name, record.address);
            return Ok(record);
        }

        let creation_code = [artifact.bytecode.as_ref(), constructor_data.as_ref()].concat();
        let receipt = self
            .client
            .deploy_contract(creation_code.into(), self.confirmations)
            .await
            .inspect_err(|e| error!("failed to deploy \"{}\": {}", name, e))?;

        let record = DeploymentRecord {
            contract: contract.to_string(),
            address: receipt.address,
            args: args.iter().map(format_arg).collect(),
            constructor_data,
            bytecode_hash,
            transaction_hash: Some(receipt.transaction_hash),
            block_number: receipt.block_number,
        };
        info!(
            "deployed \"{}\" ({}) at {:#x} (tx: {:#x})",
            name, artifact.contract_name, record.address, receipt.transaction_hash
        );

        self.manifest.insert(name, record.clone());
        self.manifest.save(&self.manifest_path)?;

        Ok(record)
    }

    /// The manifest record for `name` if it can be reused as-is
    async fn reusable_record(
        &self,
        name: &str,
        bytecode_hash: B256,
        constructor_data: &[u8],
    ) -> Result<Option<DeploymentRecord>, DeployError> {
        let Some(record) = self.manifest.get(name) else {
            return Ok(None);
        };

        if !record.matches(bytecode_hash, constructor_data) {
            info!("\"{}\" changed since its last deployment, redeploying", name);
            return Ok(None);
        }

        let code = self.client.code_at(record.address).await?;
        if code.is_empty() {
            warn!(
                "no code at the recorded address of \"{}\" ({:#x}), redeploying",
                name, record.address
            );
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }
}
