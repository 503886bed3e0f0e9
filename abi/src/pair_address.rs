//! Off-chain computation of Uniswap V2 pair addresses
//!
//! Pairs are deployed by the factory with `CREATE2`, salted by the sorted token
//! pair, so their address is a pure function of the factory address, the two
//! tokens, and the keccak256 hash of the pair's creation code.

use std::fmt::{self, Display, Formatter};

use alloy::primitives::{address, b256, keccak256, Address, B256};

/// The Uniswap V2 factory deployed on Ethereum mainnet and most public testnets
pub const UNISWAP_V2_FACTORY: Address = address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");

/// The keccak256 hash of the canonical `UniswapV2Pair` creation code
pub const UNISWAP_V2_PAIR_INIT_CODE_HASH: B256 =
    b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// Errors that can occur when ordering a token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairAddressError {
    /// Both sides of the pair are the same token
    IdenticalAddresses,
    /// One side of the pair is the zero address
    ZeroAddress,
}

impl Display for PairAddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PairAddressError::IdenticalAddresses => write!(f, "identical token addresses"),
            PairAddressError::ZeroAddress => write!(f, "zero token address"),
        }
    }
}

impl std::error::Error for PairAddressError {}

/// Order two tokens the way the factory does, lower address first
pub fn sort_tokens(
    token_a: Address,
    token_b: Address,
) -> Result<(Address, Address), PairAddressError> {
    if token_a == token_b {
        return Err(PairAddressError::IdenticalAddresses);
    }

    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    // Only the lower address needs checking, the zero address sorts first
    if token0 == Address::ZERO {
        return Err(PairAddressError::ZeroAddress);
    }

    Ok((token0, token1))
}

/// The `CREATE2` salt for a pair: `keccak256(abi.encodePacked(token0, token1))`
pub fn pair_salt(token0: Address, token1: Address) -> B256 {
    keccak256([token0.as_slice(), token1.as_slice()].concat())
}

/// Compute the address of the pair for `token_a` and `token_b` created by `factory`
pub fn compute_pair_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    init_code_hash: B256,
) -> Result<Address, PairAddressError> {
    let (token0, token1) = sort_tokens(token_a, token_b)?;
    Ok(factory.create2(pair_salt(token0, token1).0, init_code_hash.0))
}
