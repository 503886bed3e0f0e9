//! Bindings for the factory in `contracts/core`

use alloy::sol;

// Taken from https://github.com/Uniswap/v2-core/blob/master/contracts/interfaces/IUniswapV2Factory.sol
sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IUniswapV2Factory {
        #[derive(Debug, PartialEq, Eq)]
        event PairCreated(address indexed token0, address indexed token1, address pair, uint256 allPairsLength);

        function getPair(address tokenA, address tokenB) external view returns (address pair);
        function createPair(address tokenA, address tokenB) external returns (address pair);
    }
}

pub use IUniswapV2Factory::*;
