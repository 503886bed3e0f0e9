//! Bindings for the contracts in `contracts/migration`

use alloy::sol;

sol! {
    /// The reward token minted to liquidity providers who migrate their position.
    ///
    /// Minting is restricted to the registered migrator.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IBonusToken {
        function migrator() external view returns (address);
        function setMigrator(address _migrator) external;
    }
}
