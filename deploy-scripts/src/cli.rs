//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::{Address, B256};
use amm_abi::pair_address::{UNISWAP_V2_FACTORY, UNISWAP_V2_PAIR_INIT_CODE_HASH};
use clap::{Args, Parser, Subcommand};

use crate::{
    artifacts::ArtifactStore,
    client::{setup_client, RpcClient},
    commands::{create_market, run_deploy_task},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_RPC_URL},
    deployments::Deployments,
    errors::DeployError,
    manifest::Manifest,
    network::Network,
    types::{DeployConfig, ExternalPair, ExternalPool},
};

/// Deploy the AMM contracts and wire them together
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[command(flatten)]
    pub settings: NetworkSettings,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where and how to deploy
#[derive(Args, Clone)]
pub struct NetworkSettings {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The network being deployed to, which must match the chain behind the RPC URL
    #[arg(short, long, env = "NETWORK", value_enum, default_value_t = Network::Hardhat)]
    pub network: Network,

    /// Number of confirmations to await for each transaction,
    /// overriding the network's default
    #[arg(long, env = "BLOCK_CONFIRMATIONS", value_parser = clap::value_parser!(u64).range(1..))]
    pub block_confirmations: Option<u64>,

    /// Directory containing the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Directory containing the per-network deployment manifests
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments_dir: PathBuf,
}

impl NetworkSettings {
    /// Connect to the network and load its manifest
    pub async fn connect(&self) -> Result<Deployments<RpcClient>, DeployError> {
        let priv_key = self.priv_key.as_deref().ok_or_else(|| {
            DeployError::ClientInitialization("no private key given, set PKEY".to_string())
        })?;
        let client = setup_client(priv_key, &self.rpc_url)?;

        Deployments::new(
            client,
            self.network,
            self.network.block_confirmations(self.block_confirmations),
            ArtifactStore::new(&self.artifacts_dir),
            &self.deployments_dir,
        )
        .await
    }
}

/// The commands of the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy every contract and run the setup calls, reusing earlier deployments
    Deploy(DeployArgs),
    /// Create the test token pair on the deployed factory
    CreateMarket(CreateMarketArgs),
    /// Print the deployment manifest of the network
    Manifest,
}

impl Command {
    /// Run the command against the network in `settings`
    pub async fn run(self, settings: NetworkSettings) -> Result<(), DeployError> {
        match self {
            Command::Deploy(args) => {
                let mut deployments = settings.connect().await?;
                run_deploy_task(&mut deployments, &args.config(), &args.tags).await?;
                Ok(())
            }
            Command::CreateMarket(args) => {
                let deployments = settings.connect().await?;
                create_market(&deployments, args.pair_init_code_hash).await?;
                Ok(())
            }
            Command::Manifest => print_manifest(&settings),
        }
    }
}

/// Print the manifest of the selected network as JSON
fn print_manifest(settings: &NetworkSettings) -> Result<(), DeployError> {
    let path = Manifest::path(&settings.deployments_dir, settings.network);
    let manifest = Manifest::load_or_default(&path, settings.network)?;
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| DeployError::ReadDeployments(e.to_string()))?;

    println!("{json}");
    Ok(())
}

/// Run the deployment task
#[derive(Args)]
pub struct DeployArgs {
    /// Only run the task if it carries one of these tags (`all`, `factory`)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Address of the external router liquidity is migrated from
    #[arg(long, default_value_t = UNISWAP_V2_FACTORY)]
    pub external_router: Address,

    /// Address of the external pair liquidity is migrated from.
    /// When unset, it is derived from the external factory and the test tokens
    #[arg(long)]
    pub external_pair: Option<Address>,

    /// Factory of the external pool, used to derive the external pair
    #[arg(long, default_value_t = UNISWAP_V2_FACTORY, conflicts_with = "external_pair")]
    pub external_factory: Address,

    /// Pair init code hash of the external factory, used to derive the external pair
    #[arg(long, default_value_t = UNISWAP_V2_PAIR_INIT_CODE_HASH, conflicts_with = "external_pair")]
    pub external_init_code_hash: B256,

    /// Pair init code hash of the deployed factory.
    /// When unset, it is read from the `UniswapV2Pair` artifact
    #[arg(long)]
    pub pair_init_code_hash: Option<B256>,
}

impl DeployArgs {
    /// The deployment task configuration given by the arguments
    pub fn config(&self) -> DeployConfig {
        let pair = match self.external_pair {
            Some(pair) => ExternalPair::Fixed(pair),
            None => ExternalPair::Derived {
                factory: self.external_factory,
                init_code_hash: self.external_init_code_hash,
            },
        };

        DeployConfig {
            external: ExternalPool {
                router: self.external_router,
                pair,
            },
            pair_init_code_hash: self.pair_init_code_hash,
        }
    }
}

/// Create the test token pair
#[derive(Args)]
pub struct CreateMarketArgs {
    /// Pair init code hash of the deployed factory.
    /// When unset, it is read from the `UniswapV2Pair` artifact
    #[arg(long)]
    pub pair_init_code_hash: Option<B256>,
}
