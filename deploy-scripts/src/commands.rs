//! Implementations of the deploy scripts
//!
//! The deployment order below is fixed: every contract appears after the
//! contracts whose addresses it takes as constructor arguments.

use alloy::primitives::{Address, B256};
use amm_abi::pair_address::compute_pair_address;
use tracing::{info, warn};

use crate::{
    client::DeployClient,
    constants::{
        BONUS_TOKEN_CONTRACT, BONUS_TOKEN_DEPLOYMENT, DEPLOY_TASK_TAGS, FACTORY_CONTRACT,
        FACTORY_DEPLOYMENT, LIQUIDITY_MIGRATION_CONTRACT, LIQUIDITY_MIGRATION_DEPLOYMENT,
        PAIR_CONTRACT, ROUTER_CONTRACT, ROUTER_DEPLOYMENT, TOKEN_A_DEPLOYMENT, TOKEN_A_NAME,
        TOKEN_A_SUPPLY, TOKEN_A_SYMBOL, TOKEN_B_DEPLOYMENT, TOKEN_B_NAME, TOKEN_B_SUPPLY,
        TOKEN_B_SYMBOL, TOKEN_CONTRACT, WETH_CONTRACT, WETH_DEPLOYMENT,
    },
    deployments::Deployments,
    errors::DeployError,
    solidity::{factory_args, liquidity_migration_args, router_args, token_args},
    types::{DeployConfig, DeploymentSummary, PairOutcome},
};

/// Whether the deployment task runs for the requested tags.
///
/// No tags selects every task
pub fn task_selected(tags: &[String]) -> bool {
    tags.is_empty()
        || tags
            .iter()
            .any(|tag| DEPLOY_TASK_TAGS.contains(&tag.as_str()))
}

/// Run the deployment task if `tags` select it
pub async fn run_deploy_task<C: DeployClient>(
    deployments: &mut Deployments<C>,
    config: &DeployConfig,
    tags: &[String],
) -> Result<Option<DeploymentSummary>, DeployError> {
    if !task_selected(tags) {
        info!(
            "skipping deployment task, tagged {:?} but {:?} requested",
            DEPLOY_TASK_TAGS, tags
        );
        return Ok(None);
    }

    deploy_contracts(deployments, config).await.map(Some)
}

/// Deploy and wire up every contract, in dependency order.
///
/// Any failure aborts the remaining steps; deployments made before the failure
/// are kept in the manifest and reused when the task is run again
pub async fn deploy_contracts<C: DeployClient>(
    deployments: &mut Deployments<C>,
    config: &DeployConfig,
) -> Result<DeploymentSummary, DeployError> {
    let deployer = deployments.deployer();

    info!("------------------------------- Deploy smart contracts from contracts/core -------------------------------");
    let factory = deployments
        .deploy(FACTORY_DEPLOYMENT, FACTORY_CONTRACT, factory_args(deployer))
        .await?
        .address;

    let token_a = deployments
        .deploy(
            TOKEN_A_DEPLOYMENT,
            TOKEN_CONTRACT,
            token_args(TOKEN_A_SUPPLY, TOKEN_A_NAME, TOKEN_A_SYMBOL),
        )
        .await?
        .address;

    let token_b = deployments
        .deploy(
            TOKEN_B_DEPLOYMENT,
            TOKEN_CONTRACT,
            token_args(TOKEN_B_SUPPLY, TOKEN_B_NAME, TOKEN_B_SYMBOL),
        )
        .await?
        .address;

    info!("------------------------------- Create pair through deployed factory contract -------------------------------");
    let pair = create_pair(deployments, factory, token_a, token_b, config.pair_init_code_hash).await?;

    info!("------------------------------- Deploy smart contracts from contracts/periphery -------------------------------");
    let weth = deployments
        .deploy(WETH_DEPLOYMENT, WETH_CONTRACT, Vec::new())
        .await?
        .address;

    let router = deployments
        .deploy(ROUTER_DEPLOYMENT, ROUTER_CONTRACT, router_args(factory, weth))
        .await?
        .address;

    info!("------------------------------- Deploy smart contracts from contracts/migration -------------------------------");
    let bonus_token = deployments
        .deploy(BONUS_TOKEN_DEPLOYMENT, BONUS_TOKEN_CONTRACT, Vec::new())
        .await?
        .address;

    let external_router = config.external.router;
    let external_pair = config.external.resolve_pair(token_a, token_b)?;
    let liquidity_migration = deployments
        .deploy(
            LIQUIDITY_MIGRATION_DEPLOYMENT,
            LIQUIDITY_MIGRATION_CONTRACT,
            liquidity_migration_args(
                external_router,
                external_pair,
                router,
                pair.address,
                bonus_token,
            ),
        )
        .await?
        .address;

    let migrator_registered = register_migrator(deployments, bonus_token, liquidity_migration).await?;

    let summary = DeploymentSummary {
        factory,
        token_a,
        token_b,
        pair: pair.address,
        pair_created: pair.created,
        weth,
        router,
        bonus_token,
        external_router,
        external_pair,
        liquidity_migration,
        migrator_registered,
    };
    summary.log();

    Ok(summary)
}

/// Create the pair for `token_a` and `token_b` on `factory`, or reuse the
/// existing one.
///
/// The pair address is checked against the factory's `getPair` and, when the pair
/// init code hash is known, against the `CREATE2` address computed off-chain
pub async fn create_pair<C: DeployClient>(
    deployments: &Deployments<C>,
    factory: Address,
    token_a: Address,
    token_b: Address,
    pair_init_code_hash: Option<B256>,
) -> Result<PairOutcome, DeployError> {
    let client = deployments.client();
    let existing = client.get_pair(factory, token_a, token_b).await?;

    let outcome = if existing != Address::ZERO {
        info!("reusing pair at {:#x}", existing);
        PairOutcome {
            address: existing,
            created: false,
        }
    } else {
        let creation = client
            .create_pair(factory, token_a, token_b, deployments.confirmations())
            .await?;
        info!(
            "Pair deployed to {:#x} (tx: {:#x})",
            creation.pair, creation.transaction_hash
        );

        let indexed = client.get_pair(factory, token_a, token_b).await?;
        if indexed != creation.pair {
            return Err(DeployError::PairAddressMismatch {
                expected: indexed,
                actual: creation.pair,
            });
        }

        PairOutcome {
            address: creation.pair,
            created: true,
        }
    };

    match resolve_pair_init_code_hash(deployments, pair_init_code_hash)? {
        Some(init_code_hash) => {
            let expected = compute_pair_address(factory, token_a, token_b, init_code_hash)
                .map_err(|e| DeployError::CalldataConstruction(e.to_string()))?;
            if expected != outcome.address {
                return Err(DeployError::PairAddressMismatch {
                    expected,
                    actual: outcome.address,
                });
            }
        }
        None => warn!(
            "pair init code hash unknown, not checking the pair address against CREATE2"
        ),
    }

    Ok(outcome)
}

/// The init code hash of the pairs the deployed factory creates: the configured
/// one, or the hash of the pair artifact if there is one
fn resolve_pair_init_code_hash<C: DeployClient>(
    deployments: &Deployments<C>,
    configured: Option<B256>,
) -> Result<Option<B256>, DeployError> {
    if configured.is_some() {
        return Ok(configured);
    }

    let artifact = deployments.find_artifact(PAIR_CONTRACT)?;
    Ok(artifact.map(|artifact| artifact.bytecode_hash()))
}

/// Register `migrator` as the bonus token's migrator, unless it already is.
///
/// Returns whether a registration transaction was sent
pub async fn register_migrator<C: DeployClient>(
    deployments: &Deployments<C>,
    bonus_token: Address,
    migrator: Address,
) -> Result<bool, DeployError> {
    let client = deployments.client();
    let current = client.migrator(bonus_token).await?;
    if current == migrator {
        info!("migrator already set to {:#x}", migrator);
        return Ok(false);
    }

    if current != Address::ZERO {
        warn!(
            "replacing bonus token migrator {:#x} with {:#x}",
            current, migrator
        );
    }

    let tx_hash = client
        .set_migrator(bonus_token, migrator, deployments.confirmations())
        .await?;
    info!("migrator set to {:#x} (tx: {:#x})", migrator, tx_hash);

    Ok(true)
}

/// Create the pair for the test tokens on an already-deployed factory.
///
/// All addresses come from the manifest, nothing is deployed
pub async fn create_market<C: DeployClient>(
    deployments: &Deployments<C>,
    pair_init_code_hash: Option<B256>,
) -> Result<PairOutcome, DeployError> {
    let factory = deployments.get(FACTORY_DEPLOYMENT)?;
    let token_a = deployments.get(TOKEN_A_DEPLOYMENT)?;
    let token_b = deployments.get(TOKEN_B_DEPLOYMENT)?;

    create_pair(deployments, factory, token_a, token_b, pair_init_code_hash).await
}
