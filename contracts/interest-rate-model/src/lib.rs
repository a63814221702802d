#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, Address, Env,
};

/// Fixed-point scale shared by utilization and rates (1.0 == SCALE).
pub const SCALE: i128 = 1_000_000_000_000_000_000;
/// 1% per year.
pub const DEFAULT_BASE_RATE: i128 = 10_000_000_000_000_000;
/// 10% per year.
pub const DEFAULT_MAX_RATE: i128 = 100_000_000_000_000_000;
/// Keeps `utilization * (max - base)` inside i128.
const MAX_RATE_CEILING: i128 = 100 * SCALE;

// ---------- TTL constants ----------
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400; // bump to ~30 days

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidRateParams = 3,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    BaseRate,
    MaxRate,
}

/// Borrowed share of deposits, scaled by `SCALE`.
///
/// Returns 0 when nothing is deposited and saturates at `SCALE` when the
/// borrowed total reaches or exceeds deposits.
pub fn utilization_rate(total_deposits: i128, total_borrowed: i128) -> i128 {
    if total_deposits <= 0 || total_borrowed <= 0 {
        return 0;
    }
    if total_borrowed >= total_deposits {
        return SCALE;
    }
    match total_borrowed.checked_mul(SCALE) {
        Some(scaled) => scaled / total_deposits,
        // Both sides are huge: drop the common precision first.
        None => total_borrowed / (total_deposits / SCALE),
    }
}

/// Linear interpolation between `base_rate` and `max_rate` on utilization.
pub fn interest_rate(
    base_rate: i128,
    max_rate: i128,
    total_deposits: i128,
    total_borrowed: i128,
) -> i128 {
    let utilization = utilization_rate(total_deposits, total_borrowed);
    let spread = max_rate - base_rate;
    let rate = base_rate + utilization * spread / SCALE;
    rate.clamp(base_rate, max_rate)
}

fn validate_rates(base_rate: i128, max_rate: i128) -> Result<(), Error> {
    if base_rate < 0 || max_rate < base_rate || max_rate > MAX_RATE_CEILING {
        return Err(Error::InvalidRateParams);
    }
    Ok(())
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn read_rates(env: &Env) -> Result<(i128, i128), Error> {
    let base: i128 = env
        .storage()
        .instance()
        .get(&DataKey::BaseRate)
        .ok_or(Error::NotInitialized)?;
    let max: i128 = env
        .storage()
        .instance()
        .get(&DataKey::MaxRate)
        .ok_or(Error::NotInitialized)?;
    Ok((base, max))
}

fn write_rates(env: &Env, base_rate: i128, max_rate: i128) {
    env.storage().instance().set(&DataKey::BaseRate, &base_rate);
    env.storage().instance().set(&DataKey::MaxRate, &max_rate);
}

#[contract]
pub struct LinearInterestRateModel;

#[contractimpl]
impl LinearInterestRateModel {
    /// Initialize the model with annual rates scaled by 1e18.
    pub fn initialize(
        env: Env,
        admin: Address,
        base_rate: i128,
        max_rate: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        validate_rates(base_rate, max_rate)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        write_rates(&env, base_rate, max_rate);
        extend_instance(&env);

        log!(&env, "LinearInterestRateModel: initialized", base_rate, max_rate);
        Ok(())
    }

    /// Replace both rate parameters. Only callable by admin.
    pub fn set_rates(env: Env, base_rate: i128, max_rate: i128) -> Result<(), Error> {
        let admin = read_admin(&env)?;
        admin.require_auth();
        validate_rates(base_rate, max_rate)?;
        extend_instance(&env);

        write_rates(&env, base_rate, max_rate);

        env.events()
            .publish((symbol_short!("rates"),), (base_rate, max_rate));
        Ok(())
    }

    pub fn calculate_utilization_rate(
        env: Env,
        total_deposits: i128,
        total_borrowed: i128,
    ) -> i128 {
        extend_instance(&env);
        utilization_rate(total_deposits, total_borrowed)
    }

    pub fn calculate_interest_rate(
        env: Env,
        total_deposits: i128,
        total_borrowed: i128,
    ) -> Result<i128, Error> {
        extend_instance(&env);
        let (base, max) = read_rates(&env)?;
        Ok(interest_rate(base, max, total_deposits, total_borrowed))
    }

    pub fn base_rate(env: Env) -> Result<i128, Error> {
        read_rates(&env).map(|(base, _)| base)
    }

    pub fn max_rate(env: Env) -> Result<i128, Error> {
        read_rates(&env).map(|(_, max)| max)
    }

    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }
}
