use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    // Asset symbol is neither ETH nor BTC
    InvalidAssetType = 3,

    // Withdrawal larger than the caller's synthetic balance
    InsufficientBalance = 4,

    // Debt would exceed collateral value times the collateral factor
    InsufficientCollateral = 5,

    // Oracle has no quote for the asset
    PriceNotSet = 6,

    ZeroOrNegativeAmount = 7,

    // Pool would lend or release more than it holds
    InsufficientLiquidity = 8,

    RepayExceedsDebt = 9,

    // Asset class has no underlying/synthetic token registered yet
    AssetNotConfigured = 10,

    MathOverflow = 11,
}
