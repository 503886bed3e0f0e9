//! ABI encoding of the constructor arguments passed during deployment

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, U256},
};

use crate::constants::ONE_ETHER;

/// ABI-encode constructor arguments, as appended to a contract's creation code
pub fn encode_constructor_args(args: &[DynSolValue]) -> Bytes {
    if args.is_empty() {
        return Bytes::new();
    }

    DynSolValue::Tuple(args.to_vec()).abi_encode_params().into()
}

/// Render a constructor argument for the deployment manifest and logs
pub fn format_arg(arg: &DynSolValue) -> String {
    match arg {
        DynSolValue::Address(address) => address.to_checksum(None),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

/// Arguments of `UniswapV2Factory(address feeToSetter)`
pub fn factory_args(fee_to_setter: Address) -> Vec<DynSolValue> {
    vec![DynSolValue::Address(fee_to_setter)]
}

/// Arguments of `TokenERC20(uint256 initialSupply, string name, string symbol)`.
///
/// The supply is given in whole tokens of 18 decimals
pub fn token_args(supply: u64, name: &str, symbol: &str) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Uint(U256::from(supply) * ONE_ETHER, 256),
        DynSolValue::String(name.to_string()),
        DynSolValue::String(symbol.to_string()),
    ]
}

/// Arguments of `UniswapV2Router02(address factory, address WETH)`
pub fn router_args(factory: Address, weth: Address) -> Vec<DynSolValue> {
    vec![DynSolValue::Address(factory), DynSolValue::Address(weth)]
}

/// Arguments of `LiquidityMigration(address router, address pair, address routerFork,
/// address pairFork, address bonusToken)`
pub fn liquidity_migration_args(
    external_router: Address,
    external_pair: Address,
    router: Address,
    pair: Address,
    bonus_token: Address,
) -> Vec<DynSolValue> {
    [external_router, external_pair, router, pair, bonus_token]
        .into_iter()
        .map(DynSolValue::Address)
        .collect()
}
