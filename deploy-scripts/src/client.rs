//! The chain client used by the deploy scripts
//!
//! The orchestration logic only talks to the chain through [`DeployClient`], so
//! that it can be driven against a live node or an in-memory chain.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use amm_abi::{
    core::IUniswapV2Factory::{self, PairCreated},
    migration::IBonusToken,
};
use tracing::debug;

use crate::errors::DeployError;

/// The outcome of a contract creation transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployReceipt {
    /// The address of the created contract
    pub address: Address,
    /// The hash of the creation transaction
    pub transaction_hash: TxHash,
    /// The block the transaction was included in
    pub block_number: Option<u64>,
}

/// The outcome of a `createPair` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCreation {
    /// The pair address reported in the `PairCreated` event
    pub pair: Address,
    /// The hash of the `createPair` transaction
    pub transaction_hash: TxHash,
}

/// The chain operations needed to deploy and wire up the contracts.
///
/// Every state-changing method awaits `confirmations` blocks on top of the
/// transaction's block before returning, and fails if the transaction reverted.
#[allow(async_fn_in_trait)]
pub trait DeployClient {
    /// The account deployments are sent from
    fn deployer(&self) -> Address;

    /// The chain ID reported by the node
    async fn chain_id(&self) -> Result<u64, DeployError>;

    /// Send a contract creation transaction with the given creation code
    async fn deploy_contract(
        &self,
        creation_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployReceipt, DeployError>;

    /// The runtime code at `address`, empty if there is no contract
    async fn code_at(&self, address: Address) -> Result<Bytes, DeployError>;

    /// `factory.getPair(token_a, token_b)`, the zero address if there is no pair
    async fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, DeployError>;

    /// `factory.createPair(token_a, token_b)`
    async fn create_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        confirmations: u64,
    ) -> Result<PairCreation, DeployError>;

    /// `bonus_token.migrator()`
    async fn migrator(&self, bonus_token: Address) -> Result<Address, DeployError>;

    /// `bonus_token.setMigrator(migrator)`
    async fn set_migrator(
        &self,
        bonus_token: Address,
        migrator: Address,
        confirmations: u64,
    ) -> Result<TxHash, DeployError>;
}

/// A [`DeployClient`] backed by a JSON-RPC node, signing with a local key
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with the deployer's wallet attached
    provider: DynProvider,
    /// The address of the deployer's key
    deployer: Address,
}

/// Sets up the client with which to deploy the contracts, signing with `priv_key`
/// and sending transactions to `rpc_url`
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcClient, DeployError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok(RpcClient {
        provider: DynProvider::new(provider),
        deployer,
    })
}

impl RpcClient {
    /// Await the receipt of a pending transaction at the given depth,
    /// failing if the transaction reverted
    async fn confirm(
        pending_tx: PendingTransactionBuilder<Ethereum>,
        confirmations: u64,
        to_error: fn(String) -> DeployError,
    ) -> Result<TransactionReceipt, DeployError> {
        let tx_hash = *pending_tx.tx_hash();
        debug!("awaiting {} confirmations for {:#x}", confirmations, tx_hash);

        let receipt = pending_tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| to_error(e.to_string()))?;

        if !receipt.status() {
            return Err(to_error(format!("transaction {tx_hash:#x} reverted")));
        }

        Ok(receipt)
    }
}

impl DeployClient for RpcClient {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64, DeployError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| DeployError::ClientInitialization(e.to_string()))
    }

    async fn deploy_contract(
        &self,
        creation_code: Bytes,
        confirmations: u64,
    ) -> Result<DeployReceipt, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(creation_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::ContractDeployment(e.to_string()))?;
        let receipt =
            Self::confirm(pending_tx, confirmations, DeployError::ContractDeployment).await?;

        let address = receipt.contract_address.ok_or_else(|| {
            DeployError::ContractDeployment(format!(
                "no contract address in receipt of {:#x}",
                receipt.transaction_hash
            ))
        })?;

        Ok(DeployReceipt {
            address,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, DeployError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))
    }

    async fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, DeployError> {
        IUniswapV2Factory::new(factory, self.provider.clone())
            .getPair(token_a, token_b)
            .call()
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))
    }

    async fn create_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        confirmations: u64,
    ) -> Result<PairCreation, DeployError> {
        let pending_tx = IUniswapV2Factory::new(factory, self.provider.clone())
            .createPair(token_a, token_b)
            .send()
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))?;
        let receipt =
            Self::confirm(pending_tx, confirmations, DeployError::ContractInteraction).await?;

        // The return value of a transaction is not observable, read the pair from the event
        let pair = receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.address() == factory)
            .find_map(|log| log.log_decode::<PairCreated>().ok())
            .map(|log| log.into_inner().pair)
            .ok_or_else(|| {
                DeployError::ContractInteraction(format!(
                    "no PairCreated event in receipt of {:#x}",
                    receipt.transaction_hash
                ))
            })?;

        Ok(PairCreation {
            pair,
            transaction_hash: receipt.transaction_hash,
        })
    }

    async fn migrator(&self, bonus_token: Address) -> Result<Address, DeployError> {
        IBonusToken::new(bonus_token, self.provider.clone())
            .migrator()
            .call()
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))
    }

    async fn set_migrator(
        &self,
        bonus_token: Address,
        migrator: Address,
        confirmations: u64,
    ) -> Result<TxHash, DeployError> {
        let pending_tx = IBonusToken::new(bonus_token, self.provider.clone())
            .setMigrator(migrator)
            .send()
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))?;
        let receipt =
            Self::confirm(pending_tx, confirmations, DeployError::ContractInteraction).await?;

        Ok(receipt.transaction_hash)
    }
}
