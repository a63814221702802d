use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    // No quote has ever been stored for the asset
    PriceNotSet = 3,

    NegativePrice = 4,
}
