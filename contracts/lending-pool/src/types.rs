use soroban_sdk::{contracttype, symbol_short, Address, Symbol};

use crate::error::Error;
use crate::ledger::SCALE;

/// The two collateral/borrow classes the pool understands.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssetClass {
    Eth,
    Btc,
}

impl AssetClass {
    pub const ALL: [AssetClass; 2] = [AssetClass::Eth, AssetClass::Btc];

    /// Parse the external `ETH` / `BTC` symbol.
    pub fn from_symbol(symbol: &Symbol) -> Result<AssetClass, Error> {
        if *symbol == symbol_short!("ETH") {
            Ok(AssetClass::Eth)
        } else if *symbol == symbol_short!("BTC") {
            Ok(AssetClass::Btc)
        } else {
            Err(Error::InvalidAssetType)
        }
    }

    /// Symbol the oracle keys quotes by.
    pub fn symbol(&self) -> Symbol {
        match self {
            AssetClass::Eth => symbol_short!("ETH"),
            AssetClass::Btc => symbol_short!("BTC"),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetConfig {
    pub underlying: Address,
    pub synthetic: Address,
    pub decimals: u32,
}

/// Aggregate state of one asset class.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAccount {
    pub total_deposited: i128,
    pub total_borrowed: i128,
    pub last_accrual_timestamp: u64,
    // Annual rate (1e18 scale) used by the most recent accrual
    pub accrued_rate_per_period: i128,
    // Cumulative debt growth, starts at 1e18
    pub borrow_index: i128,
}

impl PoolAccount {
    pub fn new(now: u64) -> Self {
        PoolAccount {
            total_deposited: 0,
            total_borrowed: 0,
            last_accrual_timestamp: now,
            accrued_rate_per_period: 0,
            borrow_index: SCALE,
        }
    }
}

/// One user's holdings in one asset class. `debt_amount` is as of `debt_index`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPosition {
    pub collateral_amount: i128,
    pub synthetic_minted: i128,
    pub debt_amount: i128,
    pub debt_index: i128,
}

impl Default for AssetPosition {
    fn default() -> Self {
        AssetPosition {
            collateral_amount: 0,
            synthetic_minted: 0,
            debt_amount: 0,
            debt_index: SCALE,
        }
    }
}
