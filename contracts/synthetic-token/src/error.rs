use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,

    NotInitialized = 2,

    NegativeAmount = 3,

    InsufficientBalance = 4,

    InsufficientAllowance = 5,

    // Allowance written with an expiration ledger already in the past
    InvalidExpiration = 6,
}
