//! Test helpers: an in-memory chain and fixture artifacts

#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use alloy::primitives::{address, hex, keccak256, Address, Bytes, TxHash, B256, U256};
use amm_abi::pair_address::{compute_pair_address, sort_tokens};
use deploy_scripts::{
    artifacts::ArtifactStore,
    client::{DeployClient, DeployReceipt, PairCreation},
    constants::{
        BONUS_TOKEN_CONTRACT, FACTORY_CONTRACT, LIQUIDITY_MIGRATION_CONTRACT, PAIR_CONTRACT,
        ROUTER_CONTRACT, TOKEN_CONTRACT, WETH_CONTRACT,
    },
    deployments::Deployments,
    errors::DeployError,
    network::Network,
};
use eyre::Result;

/// The first development account
pub const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Every contract the fixture artifacts directory holds
pub const FIXTURE_CONTRACTS: [&str; 7] = [
    FACTORY_CONTRACT,
    TOKEN_CONTRACT,
    WETH_CONTRACT,
    ROUTER_CONTRACT,
    BONUS_TOKEN_CONTRACT,
    LIQUIDITY_MIGRATION_CONTRACT,
    PAIR_CONTRACT,
];

// --------------
// | Mock Chain |
// --------------

/// A chain interaction observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// A contract creation with the given creation code
    Deploy(Bytes),
    /// `createPair` on a factory
    CreatePair {
        factory: Address,
        token_a: Address,
        token_b: Address,
    },
    /// `setMigrator` on a bonus token
    SetMigrator {
        bonus_token: Address,
        migrator: Address,
    },
}

#[derive(Default)]
pub struct ChainState {
    /// The deployer's nonce
    nonce: u64,
    /// Runtime code by address
    code: HashMap<Address, Bytes>,
    /// Pairs by `(factory, token0, token1)`
    pairs: HashMap<(Address, Address, Address), Address>,
    /// Migrators by bonus token
    migrators: HashMap<Address, Address>,
    /// Every state-changing call, in order
    pub calls: Vec<Call>,
    /// The confirmation count requested by every state-changing call
    pub confirmations: Vec<u64>,
    /// Fail the contract creation with this index, counted over the chain's lifetime
    pub fail_deploy_at: Option<usize>,
}

/// An in-memory chain implementing [`DeployClient`].
///
/// Clones share state, so a test can inspect the chain while a [`Deployments`]
/// owns another handle
#[derive(Clone)]
pub struct MockChain {
    chain_id: u64,
    pair_init_code_hash: B256,
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    /// A chain reporting `chain_id`, whose factories create pairs from the
    /// fixture pair bytecode
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            pair_init_code_hash: keccak256(fixture_bytecode(PAIR_CONTRACT)),
            state: Arc::default(),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    /// The number of contracts created so far
    pub fn deploy_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Deploy(_)))
            .count()
    }

    /// The contracts created so far, in order, identified by fixture artifact
    pub fn deployed_contracts(&self) -> Vec<&'static str> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Deploy(code) => Some(contract_of(code)),
                _ => None,
            })
            .collect()
    }

    /// The `createPair` calls made so far
    pub fn create_pair_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::CreatePair { .. }))
            .count()
    }

    /// The `setMigrator` calls made so far
    pub fn set_migrator_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::SetMigrator { .. }))
            .count()
    }

    /// The migrator currently registered on `bonus_token`
    pub fn migrator_of(&self, bonus_token: Address) -> Address {
        self.state()
            .migrators
            .get(&bonus_token)
            .copied()
            .unwrap_or_default()
    }

    /// Remove the code at `address`, as a chain reset would
    pub fn wipe_code(&self, address: Address) {
        self.state().code.remove(&address);
    }

    /// Fail the next contract creation
    pub fn fail_next_deploy(&self) {
        let mut state = self.state();
        let index = state
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Deploy(_)))
            .count();
        state.fail_deploy_at = Some(index);
    }

    /// Fail the contract creation `n` creations from now
    pub fn fail_deploy_after(&self, n: usize) {
        let index = self.deploy_count() + n;
        self.state().fail_deploy_at = Some(index);
    }
}

/// A transaction hash derived from a counter
fn tx_hash(n: u64) -> TxHash {
    keccak256(U256::from(n).to_be_bytes::<32>())
}

impl DeployClient for MockChain {
    fn deployer(&self) -> Address {
        DEPLOYER
    }

    async fn chain_id(&self) -> Result<u64, DeployError> {
        Ok(self.chain_id)
    }

    async fn deploy_contract(
        &self,
        creation_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployReceipt, DeployError> {
        let mut state = self.state();
        let index = state
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Deploy(_)))
            .count();
        if state.fail_deploy_at == Some(index) {
            state.fail_deploy_at = None;
            return Err(DeployError::ContractDeployment(
                "transaction reverted".to_string(),
            ));
        }

        let nonce = state.nonce;
        state.nonce += 1;
        let address = DEPLOYER.create(nonce);

        state.code.insert(address, creation_code.clone());
        state.calls.push(Call::Deploy(creation_code));
        state.confirmations.push(confirmations);

        Ok(DeployReceipt {
            address,
            transaction_hash: tx_hash(nonce),
            block_number: Some(nonce + 1),
        })
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, DeployError> {
        Ok(self.state().code.get(&address).cloned().unwrap_or_default())
    }

    async fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, DeployError> {
        let (token0, token1) = sort_tokens(token_a, token_b)
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))?;
        Ok(self
            .state()
            .pairs
            .get(&(factory, token0, token1))
            .copied()
            .unwrap_or_default())
    }

    async fn create_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        confirmations: u64,
    ) -> Result<PairCreation, DeployError> {
        let mut state = self.state();
        if !state.code.contains_key(&factory) {
            return Err(DeployError::ContractInteraction(format!(
                "no factory at {factory:#x}"
            )));
        }

        let (token0, token1) = sort_tokens(token_a, token_b)
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))?;
        if state.pairs.contains_key(&(factory, token0, token1)) {
            return Err(DeployError::ContractInteraction(
                "UniswapV2: PAIR_EXISTS".to_string(),
            ));
        }

        let pair = compute_pair_address(factory, token0, token1, self.pair_init_code_hash)
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))?;
        state.pairs.insert((factory, token0, token1), pair);
        state.code.insert(pair, fixture_bytecode(PAIR_CONTRACT));
        state.calls.push(Call::CreatePair {
            factory,
            token_a,
            token_b,
        });
        state.confirmations.push(confirmations);

        let nonce = state.nonce;
        state.nonce += 1;

        Ok(PairCreation {
            pair,
            transaction_hash: tx_hash(nonce),
        })
    }

    async fn migrator(&self, bonus_token: Address) -> Result<Address, DeployError> {
        Ok(self.migrator_of(bonus_token))
    }

    async fn set_migrator(
        &self,
        bonus_token: Address,
        migrator: Address,
        confirmations: u64,
    ) -> Result<TxHash, DeployError> {
        let mut state = self.state();
        state.migrators.insert(bonus_token, migrator);
        state.calls.push(Call::SetMigrator {
            bonus_token,
            migrator,
        });
        state.confirmations.push(confirmations);

        let nonce = state.nonce;
        state.nonce += 1;

        Ok(tx_hash(nonce))
    }
}

// ---------------------
// | Fixture Artifacts |
// ---------------------

/// The creation bytecode of the fixture artifact for `contract`.
///
/// The contract name is embedded and null-terminated, so no fixture bytecode is a
/// prefix of another
pub fn fixture_bytecode(contract: &str) -> Bytes {
    [&[0x60u8, 0x80][..], contract.as_bytes(), &[0x00]]
        .concat()
        .into()
}

/// The fixture contract whose bytecode `creation_code` starts with
pub fn contract_of(creation_code: &[u8]) -> &'static str {
    FIXTURE_CONTRACTS
        .into_iter()
        .find(|contract| creation_code.starts_with(&fixture_bytecode(contract)))
        .unwrap_or("unknown")
}

/// Write a Hardhat-style artifact for `contract` with the given bytecode
pub fn write_artifact(dir: &Path, contract: &str, bytecode: &[u8]) -> Result<()> {
    let source_dir = dir.join(format!("{contract}.sol"));
    fs::create_dir_all(&source_dir)?;

    let artifact = serde_json::json!({
        "_format": "hh-sol-artifact-1",
        "contractName": contract,
        "abi": [],
        "bytecode": format!("0x{}", hex::encode(bytecode)),
    });
    fs::write(
        source_dir.join(format!("{contract}.json")),
        serde_json::to_string_pretty(&artifact)?,
    )?;

    Ok(())
}

/// A fresh directory under the system's temporary directory
pub fn temp_dir(prefix: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", rand::random::<u64>()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ---------------
// | Environment |
// ---------------

/// A mock chain with fixture artifacts and an empty deployments directory
pub struct TestEnv {
    pub chain: MockChain,
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,
}

impl TestEnv {
    /// An environment on the hardhat chain
    pub fn new() -> Result<Self> {
        Self::with_chain_id(Network::Hardhat.chain_id())
    }

    /// An environment whose chain reports `chain_id`
    pub fn with_chain_id(chain_id: u64) -> Result<Self> {
        let artifacts_dir = temp_dir("artifacts")?;
        for contract in FIXTURE_CONTRACTS {
            write_artifact(&artifacts_dir, contract, &fixture_bytecode(contract))?;
        }

        Ok(Self {
            chain: MockChain::new(chain_id),
            artifacts_dir,
            deployments_dir: temp_dir("deployments")?,
        })
    }

    /// Start a deployment run on the hardhat network, as a fresh invocation of the
    /// scripts would
    pub async fn deployments(&self) -> Result<Deployments<MockChain>, DeployError> {
        self.deployments_on(Network::Hardhat, None).await
    }

    /// Start a deployment run on `network`, optionally overriding its
    /// confirmation count
    pub async fn deployments_on(
        &self,
        network: Network,
        block_confirmations: Option<u64>,
    ) -> Result<Deployments<MockChain>, DeployError> {
        Deployments::new(
            self.chain.clone(),
            network,
            network.block_confirmations(block_confirmations),
            ArtifactStore::new(&self.artifacts_dir),
            &self.deployments_dir,
        )
        .await
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.artifacts_dir);
        let _ = fs::remove_dir_all(&self.deployments_dir);
    }
}
