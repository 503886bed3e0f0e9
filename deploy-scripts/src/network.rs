//! Named networks and their confirmation policies

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::DEFAULT_BLOCK_CONFIRMATIONS;

/// The networks the scripts know how to deploy to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// An ephemeral development chain
    Hardhat,
    /// A development node listening on localhost
    Localhost,
    /// The Goerli testnet
    Goerli,
}

impl Network {
    /// The chain ID the network is expected to report
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Hardhat | Network::Localhost => 31337,
            Network::Goerli => 5,
        }
    }

    /// The confirmation count configured for the network, if any
    pub fn configured_block_confirmations(&self) -> Option<u64> {
        match self {
            Network::Hardhat => Some(1),
            Network::Localhost => None,
            Network::Goerli => Some(6),
        }
    }

    /// The number of confirmations to await for each transaction.
    ///
    /// An explicit override wins over the network's configuration. Zero counts as
    /// unset
    pub fn block_confirmations(&self, override_confirmations: Option<u64>) -> u64 {
        override_confirmations
            .filter(|confirmations| *confirmations > 0)
            .or(self.configured_block_confirmations())
            .unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Hardhat => write!(f, "hardhat"),
            Network::Localhost => write!(f, "localhost"),
            Network::Goerli => write!(f, "goerli"),
        }
    }
}
