//! Solidity ABI bindings for the AMM contracts touched during deployment

#![deny(missing_docs)]

pub mod core;
pub mod migration;
pub mod pair_address;
