//! Constants used in the deploy scripts

use alloy::primitives::U256;

/// One token in base units, for tokens with 18 decimals
pub const ONE_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// The tags carried by the deployment task
pub const DEPLOY_TASK_TAGS: [&str; 2] = ["all", "factory"];

/// The number of confirmations to wait for when the network does not specify one
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// The RPC URL of a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The directory holding the per-network deployment manifests
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// The extension of artifact and manifest files
pub const JSON_EXTENSION: &str = "json";

// -----------------------
// | Deployment Manifest |
// -----------------------

/// The factory deployment name
pub const FACTORY_DEPLOYMENT: &str = "UniswapV2Factory";

/// The first test token deployment name
pub const TOKEN_A_DEPLOYMENT: &str = "TokenA";

/// The second test token deployment name
pub const TOKEN_B_DEPLOYMENT: &str = "TokenB";

/// The wrapped native asset deployment name
pub const WETH_DEPLOYMENT: &str = "WETH";

/// The router deployment name
pub const ROUTER_DEPLOYMENT: &str = "UniswapV2Router02";

/// The bonus token deployment name
pub const BONUS_TOKEN_DEPLOYMENT: &str = "BonusToken";

/// The liquidity migration helper deployment name
pub const LIQUIDITY_MIGRATION_DEPLOYMENT: &str = "LiquidityMigration";

// -------------
// | Artifacts |
// -------------

/// The factory contract
pub const FACTORY_CONTRACT: &str = "UniswapV2Factory";

/// The ERC20 contract backing both test tokens
pub const TOKEN_CONTRACT: &str = "TokenERC20";

/// The wrapped native asset contract
pub const WETH_CONTRACT: &str = "WETH";

/// The router contract
pub const ROUTER_CONTRACT: &str = "UniswapV2Router02";

/// The bonus token contract
pub const BONUS_TOKEN_CONTRACT: &str = "BonusToken";

/// The liquidity migration helper contract
pub const LIQUIDITY_MIGRATION_CONTRACT: &str = "LiquidityMigration";

/// The pair contract, deployed by the factory rather than by the scripts.
///
/// Its creation code hash determines pair addresses.
pub const PAIR_CONTRACT: &str = "UniswapV2Pair";

// ---------------
// | Test Tokens |
// ---------------

/// The name of the first test token
pub const TOKEN_A_NAME: &str = "TokenA";

/// The symbol of the first test token
pub const TOKEN_A_SYMBOL: &str = "TKA";

/// The initial supply of the first test token, in whole tokens
pub const TOKEN_A_SUPPLY: u64 = 1_000;

/// The name of the second test token
pub const TOKEN_B_NAME: &str = "TokenB";

/// The symbol of the second test token
pub const TOKEN_B_SYMBOL: &str = "TKB";

/// The initial supply of the second test token, in whole tokens
pub const TOKEN_B_SUPPLY: u64 = 10_000;
