//! Call surfaces of the contracts the pool talks to.

use soroban_sdk::{Address, Env, Symbol};

#[soroban_sdk::contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn fetch_price(env: Env, asset: Symbol) -> i128;
}

#[soroban_sdk::contractclient(name = "RateModelClient")]
pub trait RateModel {
    fn calculate_interest_rate(env: Env, total_deposits: i128, total_borrowed: i128) -> i128;
}

#[soroban_sdk::contractclient(name = "RiskEngineClient")]
pub trait RiskEngine {
    fn collateral_factor_bps(env: Env) -> u32;
    fn set_loan_and_collateral(
        env: Env,
        borrower: Address,
        loan_value: i128,
        collateral_value: i128,
        recipient: Address,
    );
    fn check_liquidation(env: Env, borrower: Address, current_collateral_price: i128) -> i128;
}

#[soroban_sdk::contractclient(name = "SyntheticAssetClient")]
pub trait SyntheticAsset {
    fn mint(env: Env, to: Address, amount: i128);
    fn burn(env: Env, from: Address, amount: i128);
}
