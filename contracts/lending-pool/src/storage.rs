use soroban_sdk::{contracttype, Address, Env};

use crate::types::{AssetClass, AssetConfig, AssetPosition, PoolAccount};

// ---------- TTL constants ----------
// Testnet: ~5s per ledger
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400; // bump to ~30 days
const USER_LIFETIME_THRESHOLD: u32 = 518_400; // ~30 days
const USER_BUMP_AMOUNT: u32 = 3_110_400; // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Oracle,
    RateModel,
    LiquidationEngine,
    CollateralFactorBps,
    Initialized,
    Asset(AssetClass),
    Pool(AssetClass),
    Position(Address, AssetClass),
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// INITIALIZED STATE

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Initialized)
        .unwrap_or(false)
}

pub fn set_initialized(env: &Env, initialized: bool) {
    env.storage()
        .instance()
        .set(&DataKey::Initialized, &initialized);
}

// LINKED CONTRACTS

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_oracle(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Oracle)
}

pub fn set_oracle(env: &Env, oracle: &Address) {
    env.storage().instance().set(&DataKey::Oracle, oracle);
}

pub fn get_rate_model(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::RateModel)
}

pub fn set_rate_model(env: &Env, rate_model: &Address) {
    env.storage().instance().set(&DataKey::RateModel, rate_model);
}

pub fn get_liquidation_engine(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::LiquidationEngine)
}

pub fn set_liquidation_engine(env: &Env, engine: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::LiquidationEngine, engine);
}

pub fn get_collateral_factor(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::CollateralFactorBps)
}

pub fn set_collateral_factor(env: &Env, collateral_factor_bps: u32) {
    env.storage()
        .instance()
        .set(&DataKey::CollateralFactorBps, &collateral_factor_bps);
}

// ASSETS

pub fn get_asset_config(env: &Env, asset: AssetClass) -> Option<AssetConfig> {
    env.storage().instance().get(&DataKey::Asset(asset))
}

pub fn set_asset_config(env: &Env, asset: AssetClass, config: &AssetConfig) {
    env.storage().instance().set(&DataKey::Asset(asset), config);
}

pub fn read_pool(env: &Env, asset: AssetClass) -> Option<PoolAccount> {
    env.storage().instance().get(&DataKey::Pool(asset))
}

pub fn write_pool(env: &Env, asset: AssetClass, pool: &PoolAccount) {
    env.storage().instance().set(&DataKey::Pool(asset), pool);
}

// POSITIONS

pub fn read_position(env: &Env, user: &Address, asset: AssetClass) -> Option<AssetPosition> {
    let key = DataKey::Position(user.clone(), asset);
    let position: Option<AssetPosition> = env.storage().persistent().get(&key);
    if position.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, USER_LIFETIME_THRESHOLD, USER_BUMP_AMOUNT);
    }
    position
}

pub fn write_position(env: &Env, user: &Address, asset: AssetClass, position: &AssetPosition) {
    let key = DataKey::Position(user.clone(), asset);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, USER_LIFETIME_THRESHOLD, USER_BUMP_AMOUNT);
}
