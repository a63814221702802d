use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    // Factor outside (0, 10000] bps
    InvalidCollateralFactor = 3,

    NegativeValue = 4,

    ZeroOrNegativeAmount = 5,

    // No loan/collateral record for the borrower
    LoanNotFound = 6,

    MathOverflow = 7,
}
