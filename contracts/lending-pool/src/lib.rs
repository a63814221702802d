#![no_std]

//! Collateralized lending pool over two asset classes. Users post ETH or BTC
//! collateral, receive a synthetic claim token 1:1 and borrow against the
//! combined collateral value up to the protocol collateral factor.

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

mod error;
mod events;
mod interfaces;
pub mod ledger;
mod storage;
mod types;

pub use error::Error;
pub use types::{AssetClass, AssetConfig, AssetPosition, PoolAccount};

use events::{
    accrue_event, asset_registered_event, borrow_event, deposit_event, repay_event,
    withdraw_event,
};
use interfaces::{PriceFeedClient, RateModelClient, RiskEngineClient, SyntheticAssetClient};
use storage::{
    extend_instance, get_admin, get_asset_config, get_collateral_factor, get_liquidation_engine,
    get_oracle, get_rate_model, is_initialized, read_pool, read_position, set_admin,
    set_asset_config, set_collateral_factor, set_initialized, set_liquidation_engine, set_oracle,
    set_rate_model, write_pool, write_position,
};

/// Collateral and debt of one user, in oracle USD units.
struct AccountValue {
    collateral: i128,
    debt: i128,
}

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

fn require_positive(amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::ZeroOrNegativeAmount);
    }
    Ok(())
}

fn collateral_factor(env: &Env) -> Result<u32, Error> {
    get_collateral_factor(env).ok_or(Error::NotInitialized)
}

fn asset_config(env: &Env, asset: AssetClass) -> Result<AssetConfig, Error> {
    get_asset_config(env, asset).ok_or(Error::AssetNotConfigured)
}

fn fetch_price(env: &Env, asset: AssetClass) -> Result<i128, Error> {
    let oracle = get_oracle(env).ok_or(Error::NotInitialized)?;
    match PriceFeedClient::new(env, &oracle).try_fetch_price(&asset.symbol()) {
        Ok(Ok(price)) => Ok(price),
        _ => Err(Error::PriceNotSet),
    }
}

fn borrow_rate(env: &Env, pool: &PoolAccount) -> Result<i128, Error> {
    let rate_model = get_rate_model(env).ok_or(Error::NotInitialized)?;
    Ok(RateModelClient::new(env, &rate_model)
        .calculate_interest_rate(&pool.total_deposited, &pool.total_borrowed))
}

/// Pool record with interest applied up to now, without writing it back.
fn projected_pool(env: &Env, asset: AssetClass) -> Result<(PoolAccount, i128), Error> {
    let mut pool = read_pool(env, asset).ok_or(Error::AssetNotConfigured)?;
    let rate = borrow_rate(env, &pool)?;
    let interest = ledger::accrue(&mut pool, rate, env.ledger().timestamp())?;
    Ok((pool, interest))
}

fn accrue_pool(env: &Env, asset: AssetClass) -> Result<PoolAccount, Error> {
    let (pool, interest) = projected_pool(env, asset)?;
    write_pool(env, asset, &pool);
    if interest > 0 {
        accrue_event(
            env,
            asset.symbol(),
            interest,
            pool.accrued_rate_per_period,
            pool.borrow_index,
        );
    }
    Ok(pool)
}

fn accrue_all(env: &Env) -> Result<(), Error> {
    for asset in AssetClass::ALL {
        if read_pool(env, asset).is_some() {
            accrue_pool(env, asset)?;
        }
    }
    Ok(())
}

/// Value every position the user holds at current prices. Pools are projected
/// in memory, so this is accurate both right after `accrue_all` and in views.
fn account_value(env: &Env, user: &Address) -> Result<AccountValue, Error> {
    let mut value = AccountValue {
        collateral: 0,
        debt: 0,
    };
    for asset in AssetClass::ALL {
        let position = match read_position(env, user, asset) {
            Some(position) => position,
            None => continue,
        };
        let (pool, _) = projected_pool(env, asset)?;
        let debt = ledger::current_debt(&position, pool.borrow_index)?;
        if position.collateral_amount == 0 && debt == 0 {
            continue;
        }

        let decimals = asset_config(env, asset)?.decimals;
        let price = fetch_price(env, asset)?;
        let collateral_value = ledger::value_of(position.collateral_amount, price, decimals)?;
        let debt_value = ledger::value_of(debt, price, decimals)?;

        value.collateral = value
            .collateral
            .checked_add(collateral_value)
            .ok_or(Error::MathOverflow)?;
        value.debt = value
            .debt
            .checked_add(debt_value)
            .ok_or(Error::MathOverflow)?;
    }
    Ok(value)
}

#[contract]
pub struct LendingPool;

#[contractimpl]
impl LendingPool {
    /// Wire the pool to its oracle, rate model and liquidation engine. The
    /// collateral factor is read once from the engine.
    pub fn initialize(
        env: Env,
        admin: Address,
        oracle: Address,
        rate_model: Address,
        liquidation_engine: Address,
    ) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        let collateral_factor_bps =
            RiskEngineClient::new(&env, &liquidation_engine).collateral_factor_bps();

        set_admin(&env, &admin);
        set_oracle(&env, &oracle);
        set_rate_model(&env, &rate_model);
        set_liquidation_engine(&env, &liquidation_engine);
        set_collateral_factor(&env, collateral_factor_bps);
        set_initialized(&env, true);
        extend_instance(&env);

        log!(&env, "LendingPool: initialized", collateral_factor_bps);
        Ok(())
    }

    /// Attach the underlying token and its synthetic claim token to an asset
    /// class. The pool must already be the synthetic token's minter.
    pub fn register_asset(
        env: Env,
        asset: Symbol,
        underlying: Address,
        synthetic: Address,
    ) -> Result<(), Error> {
        let admin = get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        let class = AssetClass::from_symbol(&asset)?;
        extend_instance(&env);

        let decimals = token::Client::new(&env, &underlying).decimals();
        set_asset_config(
            &env,
            class,
            &AssetConfig {
                underlying: underlying.clone(),
                synthetic: synthetic.clone(),
                decimals,
            },
        );
        if read_pool(&env, class).is_none() {
            write_pool(&env, class, &PoolAccount::new(env.ledger().timestamp()));
        }

        asset_registered_event(&env, asset, underlying, synthetic);
        Ok(())
    }

    /// Bump instance TTL. Anyone can call this to keep the contract alive.
    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }

    // ==========================================================
    // Core lending functions
    // ==========================================================

    /// Lock `amount` of the underlying and mint the same amount of synthetic.
    pub fn deposit(env: Env, user: Address, asset: Symbol, amount: i128) -> Result<(), Error> {
        user.require_auth();
        let class = AssetClass::from_symbol(&asset)?;
        require_positive(amount)?;
        require_initialized(&env)?;
        let config = asset_config(&env, class)?;
        extend_instance(&env);

        accrue_all(&env)?;

        let mut pool = read_pool(&env, class).ok_or(Error::AssetNotConfigured)?;
        let mut position = read_position(&env, &user, class).unwrap_or_default();
        ledger::apply_deposit(&mut position, &mut pool, amount)?;
        write_pool(&env, class, &pool);
        write_position(&env, &user, class, &position);

        token::Client::new(&env, &config.underlying).transfer(
            &user,
            &env.current_contract_address(),
            &amount,
        );
        SyntheticAssetClient::new(&env, &config.synthetic).mint(&user, &amount);

        deposit_event(&env, user, asset, amount);
        Ok(())
    }

    /// Burn synthetic and release the underlying, as long as the remaining
    /// collateral still backs the user's debt.
    pub fn withdraw(env: Env, user: Address, asset: Symbol, amount: i128) -> Result<(), Error> {
        user.require_auth();
        let class = AssetClass::from_symbol(&asset)?;
        require_positive(amount)?;
        require_initialized(&env)?;
        let config = asset_config(&env, class)?;
        extend_instance(&env);

        accrue_all(&env)?;

        let mut pool = read_pool(&env, class).ok_or(Error::AssetNotConfigured)?;
        let mut position = read_position(&env, &user, class).ok_or(Error::InsufficientBalance)?;
        ledger::apply_withdraw(&mut position, &mut pool, amount)?;

        let value = account_value(&env, &user)?;
        if value.debt > 0 {
            let withdrawn = ledger::value_of(amount, fetch_price(&env, class)?, config.decimals)?;
            let remaining = value
                .collateral
                .checked_sub(withdrawn)
                .ok_or(Error::MathOverflow)?;
            if !ledger::within_limit(value.debt, remaining, collateral_factor(&env)?)? {
                return Err(Error::InsufficientCollateral);
            }
        }

        write_pool(&env, class, &pool);
        write_position(&env, &user, class, &position);

        SyntheticAssetClient::new(&env, &config.synthetic).burn(&user, &amount);
        token::Client::new(&env, &config.underlying).transfer(
            &env.current_contract_address(),
            &user,
            &amount,
        );

        withdraw_event(&env, user, asset, amount);
        Ok(())
    }

    /// Borrow the underlying of `asset` against collateral across all classes.
    pub fn borrow(env: Env, user: Address, asset: Symbol, amount: i128) -> Result<(), Error> {
        user.require_auth();
        let class = AssetClass::from_symbol(&asset)?;
        require_positive(amount)?;
        require_initialized(&env)?;
        let config = asset_config(&env, class)?;
        extend_instance(&env);

        accrue_all(&env)?;

        let value = account_value(&env, &user)?;
        let borrowed = ledger::value_of(amount, fetch_price(&env, class)?, config.decimals)?;
        let debt = value
            .debt
            .checked_add(borrowed)
            .ok_or(Error::MathOverflow)?;
        if !ledger::within_limit(debt, value.collateral, collateral_factor(&env)?)? {
            return Err(Error::InsufficientCollateral);
        }

        let mut pool = read_pool(&env, class).ok_or(Error::AssetNotConfigured)?;
        let mut position = read_position(&env, &user, class).unwrap_or_default();
        ledger::apply_borrow(&mut position, &mut pool, amount)?;
        write_pool(&env, class, &pool);
        write_position(&env, &user, class, &position);

        token::Client::new(&env, &config.underlying).transfer(
            &env.current_contract_address(),
            &user,
            &amount,
        );

        borrow_event(&env, user, asset, amount);
        Ok(())
    }

    /// Pay back debt in `asset`. Paying more than is owed is rejected.
    pub fn repay(env: Env, user: Address, asset: Symbol, amount: i128) -> Result<i128, Error> {
        user.require_auth();
        let class = AssetClass::from_symbol(&asset)?;
        require_positive(amount)?;
        require_initialized(&env)?;
        let config = asset_config(&env, class)?;
        extend_instance(&env);

        accrue_all(&env)?;

        let mut pool = read_pool(&env, class).ok_or(Error::AssetNotConfigured)?;
        let mut position = read_position(&env, &user, class).ok_or(Error::RepayExceedsDebt)?;
        let repaid = ledger::apply_repay(&mut position, &mut pool, amount)?;
        write_pool(&env, class, &pool);
        write_position(&env, &user, class, &position);

        token::Client::new(&env, &config.underlying).transfer(
            &user,
            &env.current_contract_address(),
            &repaid,
        );

        repay_event(&env, user, asset, repaid);
        Ok(repaid)
    }

    /// Apply pending interest to one pool. Anyone may call.
    pub fn accrue_interest(env: Env, asset: Symbol) -> Result<PoolAccount, Error> {
        let class = AssetClass::from_symbol(&asset)?;
        require_initialized(&env)?;
        extend_instance(&env);
        accrue_pool(&env, class)
    }

    /// Push the user's current loan and collateral value to the liquidation
    /// engine and run its check. Returns the shortfall, 0 when healthy.
    pub fn check_liquidation(env: Env, user: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        extend_instance(&env);

        accrue_all(&env)?;
        let value = account_value(&env, &user)?;

        let engine = get_liquidation_engine(&env).ok_or(Error::NotInitialized)?;
        let engine = RiskEngineClient::new(&env, &engine);
        engine.set_loan_and_collateral(&user, &value.debt, &value.collateral, &user);
        // Both values are already in USD, so the collateral is not rescaled.
        let shortfall = engine.check_liquidation(&user, &1);

        log!(&env, "LendingPool: liquidation check", user, shortfall);
        Ok(shortfall)
    }

    // ==========================================================
    // Views
    // ==========================================================

    /// Total debt in USD (8 decimals), including interest not yet written.
    pub fn get_debt(env: Env, user: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        Ok(account_value(&env, &user)?.debt)
    }

    /// Total collateral in USD (8 decimals).
    pub fn get_deposit(env: Env, user: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        Ok(account_value(&env, &user)?.collateral)
    }

    pub fn get_position(env: Env, user: Address, asset: Symbol) -> Result<AssetPosition, Error> {
        let class = AssetClass::from_symbol(&asset)?;
        let mut position = read_position(&env, &user, class).unwrap_or_default();
        let (pool, _) = projected_pool(&env, class)?;
        ledger::settle(&mut position, pool.borrow_index)?;
        Ok(position)
    }

    pub fn get_pool(env: Env, asset: Symbol) -> Result<PoolAccount, Error> {
        let class = AssetClass::from_symbol(&asset)?;
        let (pool, _) = projected_pool(&env, class)?;
        Ok(pool)
    }

    pub fn get_collateral(env: Env, user: Address, asset: Symbol) -> Result<i128, Error> {
        Ok(Self::get_position(env, user, asset)?.collateral_amount)
    }

    pub fn get_borrowed(env: Env, user: Address, asset: Symbol) -> Result<i128, Error> {
        Ok(Self::get_position(env, user, asset)?.debt_amount)
    }

    pub fn get_price(env: Env, asset: Symbol) -> Result<i128, Error> {
        let class = AssetClass::from_symbol(&asset)?;
        fetch_price(&env, class)
    }

    pub fn get_collateral_factor(env: Env) -> Result<u32, Error> {
        collateral_factor(&env)
    }

    pub fn get_asset_config(env: Env, asset: Symbol) -> Result<AssetConfig, Error> {
        let class = AssetClass::from_symbol(&asset)?;
        asset_config(&env, class)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        get_admin(&env).ok_or(Error::NotInitialized)
    }
}

#[cfg(test)]
mod test;
