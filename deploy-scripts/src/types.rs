//! Type definitions used throughout the scripts

use alloy::primitives::{Address, B256};
use amm_abi::pair_address::{
    compute_pair_address, UNISWAP_V2_FACTORY, UNISWAP_V2_PAIR_INIT_CODE_HASH,
};
use tracing::info;

use crate::errors::DeployError;

/// Configuration of the deployment task
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// The external pool liquidity is migrated out of
    pub external: ExternalPool,
    /// The init code hash of the pairs created by the deployed factory, if known
    /// ahead of time
    pub pair_init_code_hash: Option<B256>,
}

/// The already-deployed pool the liquidity migration helper moves liquidity from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPool {
    /// The external router
    pub router: Address,
    /// The external pair for the test tokens
    pub pair: ExternalPair,
}

/// How the external pair address is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalPair {
    /// A fixed address
    Fixed(Address),
    /// The `CREATE2` address of the test token pair on an external factory
    Derived {
        /// The external factory
        factory: Address,
        /// The init code hash of the external factory's pairs
        init_code_hash: B256,
    },
}

impl Default for ExternalPool {
    /// The canonical Uniswap V2 deployment
    fn default() -> Self {
        Self {
            router: UNISWAP_V2_FACTORY,
            pair: ExternalPair::Derived {
                factory: UNISWAP_V2_FACTORY,
                init_code_hash: UNISWAP_V2_PAIR_INIT_CODE_HASH,
            },
        }
    }
}

impl ExternalPool {
    /// The external pair address for `token_a` and `token_b`
    pub fn resolve_pair(&self, token_a: Address, token_b: Address) -> Result<Address, DeployError> {
        match self.pair {
            ExternalPair::Fixed(pair) => Ok(pair),
            ExternalPair::Derived {
                factory,
                init_code_hash,
            } => compute_pair_address(factory, token_a, token_b, init_code_hash)
                .map_err(|e| DeployError::CalldataConstruction(e.to_string())),
        }
    }
}

/// The outcome of creating a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOutcome {
    /// The pair address
    pub address: Address,
    /// Whether `createPair` was sent, as opposed to reusing an existing pair
    pub created: bool,
}

/// The addresses produced by a run of the deployment task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSummary {
    /// The factory
    pub factory: Address,
    /// The first test token
    pub token_a: Address,
    /// The second test token
    pub token_b: Address,
    /// The pair for the two test tokens
    pub pair: Address,
    /// Whether this run created the pair
    pub pair_created: bool,
    /// The wrapped native asset
    pub weth: Address,
    /// The router
    pub router: Address,
    /// The bonus token
    pub bonus_token: Address,
    /// The external router passed to the migration helper
    pub external_router: Address,
    /// The external pair passed to the migration helper
    pub external_pair: Address,
    /// The liquidity migration helper
    pub liquidity_migration: Address,
    /// Whether this run registered the migrator
    pub migrator_registered: bool,
}

impl DeploymentSummary {
    /// Log every address in the summary
    pub fn log(&self) {
        info!("UniswapV2Factory:   {:#x}", self.factory);
        info!("TokenA:             {:#x}", self.token_a);
        info!("TokenB:             {:#x}", self.token_b);
        info!("Pair:               {:#x}", self.pair);
        info!("WETH:               {:#x}", self.weth);
        info!("UniswapV2Router02:  {:#x}", self.router);
        info!("BonusToken:         {:#x}", self.bonus_token);
        info!("LiquidityMigration: {:#x}", self.liquidity_migration);
    }
}
