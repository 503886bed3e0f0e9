//! Scripts for deploying and initializing the AMM contracts.
#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod commands;
pub mod constants;
pub mod deployments;
pub mod errors;
pub mod manifest;
pub mod network;
pub mod solidity;
pub mod types;
