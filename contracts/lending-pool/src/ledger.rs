//! Pool and position bookkeeping. Pure functions over owned records; the
//! contract loads records, runs one of these, and writes the result back.

use crate::error::Error;
use crate::types::{AssetPosition, PoolAccount};

/// Fixed-point scale for rates and the borrow index.
pub const SCALE: i128 = 1_000_000_000_000_000_000;
pub const SECONDS_PER_YEAR: i128 = 31_536_000;
pub const BPS_DENOMINATOR: i128 = 10_000;

pub fn mul_div(a: i128, b: i128, denominator: i128) -> Result<i128, Error> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(denominator))
        .ok_or(Error::MathOverflow)
}

/// `a * b / denominator`, rounded up. Operands are non-negative.
pub fn mul_div_ceil(a: i128, b: i128, denominator: i128) -> Result<i128, Error> {
    let product = a.checked_mul(b).ok_or(Error::MathOverflow)?;
    let quotient = product.checked_div(denominator).ok_or(Error::MathOverflow)?;
    if product % denominator == 0 {
        Ok(quotient)
    } else {
        add(quotient, 1)
    }
}

fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

fn sub(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_sub(b).ok_or(Error::MathOverflow)
}

/// Grow `total_borrowed` by simple interest at the annual `rate` for the time
/// since the last accrual. Interest never pushes borrowed past deposited.
/// Returns the interest added.
///
/// The aggregate grows by exactly the (rounded-down) index growth, and each
/// position rounds its debt up, so the positions always owe at least
/// `total_borrowed`.
pub fn accrue(pool: &mut PoolAccount, rate: i128, now: u64) -> Result<i128, Error> {
    pool.accrued_rate_per_period = rate;
    if now <= pool.last_accrual_timestamp {
        return Ok(0);
    }
    let elapsed = (now - pool.last_accrual_timestamp) as i128;
    pool.last_accrual_timestamp = now;

    if pool.total_borrowed <= 0 || rate <= 0 {
        return Ok(0);
    }

    let growth = mul_div(rate, elapsed, SECONDS_PER_YEAR)?;
    let headroom = sub(pool.total_deposited, pool.total_borrowed)?.max(0);
    let target = mul_div(pool.total_borrowed, growth, SCALE)?.min(headroom);
    let index_delta = mul_div(pool.borrow_index, target, pool.total_borrowed)?;
    let interest = mul_div(pool.total_borrowed, index_delta, pool.borrow_index)?;
    if interest == 0 {
        return Ok(0);
    }

    pool.borrow_index = add(pool.borrow_index, index_delta)?;
    pool.total_borrowed = add(pool.total_borrowed, interest)?;
    Ok(interest)
}

/// Debt owed at `borrow_index`, rounded up.
pub fn current_debt(position: &AssetPosition, borrow_index: i128) -> Result<i128, Error> {
    if position.debt_amount == 0 || position.debt_index == borrow_index {
        return Ok(position.debt_amount);
    }
    mul_div_ceil(position.debt_amount, borrow_index, position.debt_index)
}

/// Roll pending interest into `debt_amount`.
pub fn settle(position: &mut AssetPosition, borrow_index: i128) -> Result<(), Error> {
    position.debt_amount = current_debt(position, borrow_index)?;
    position.debt_index = borrow_index;
    Ok(())
}

pub fn apply_deposit(
    position: &mut AssetPosition,
    pool: &mut PoolAccount,
    amount: i128,
) -> Result<(), Error> {
    position.collateral_amount = add(position.collateral_amount, amount)?;
    position.synthetic_minted = add(position.synthetic_minted, amount)?;
    pool.total_deposited = add(pool.total_deposited, amount)?;
    Ok(())
}

pub fn apply_withdraw(
    position: &mut AssetPosition,
    pool: &mut PoolAccount,
    amount: i128,
) -> Result<(), Error> {
    if amount > position.synthetic_minted {
        return Err(Error::InsufficientBalance);
    }
    let remaining = sub(pool.total_deposited, amount)?;
    if remaining < pool.total_borrowed {
        return Err(Error::InsufficientLiquidity);
    }
    position.collateral_amount = sub(position.collateral_amount, amount)?;
    position.synthetic_minted = sub(position.synthetic_minted, amount)?;
    pool.total_deposited = remaining;
    Ok(())
}

pub fn apply_borrow(
    position: &mut AssetPosition,
    pool: &mut PoolAccount,
    amount: i128,
) -> Result<(), Error> {
    let borrowed = add(pool.total_borrowed, amount)?;
    if borrowed > pool.total_deposited {
        return Err(Error::InsufficientLiquidity);
    }
    settle(position, pool.borrow_index)?;
    position.debt_amount = add(position.debt_amount, amount)?;
    pool.total_borrowed = borrowed;
    Ok(())
}

/// Overpayment is an error, never clamped. Returns the amount applied.
pub fn apply_repay(
    position: &mut AssetPosition,
    pool: &mut PoolAccount,
    amount: i128,
) -> Result<i128, Error> {
    settle(position, pool.borrow_index)?;
    if amount > position.debt_amount {
        return Err(Error::RepayExceedsDebt);
    }
    position.debt_amount -= amount;
    // Positions round up; the last repayment may exceed what the aggregate still holds.
    pool.total_borrowed = sub(pool.total_borrowed, amount)?.max(0);
    Ok(amount)
}

/// USD value (oracle decimals) of `amount` base units of a token with `decimals`.
pub fn value_of(amount: i128, price: i128, decimals: u32) -> Result<i128, Error> {
    let unit = 10i128.checked_pow(decimals).ok_or(Error::MathOverflow)?;
    mul_div(amount, price, unit)
}

/// `debt_value <= collateral_value * collateral_factor`.
pub fn within_limit(
    debt_value: i128,
    collateral_value: i128,
    collateral_factor_bps: u32,
) -> Result<bool, Error> {
    let lhs = debt_value
        .checked_mul(BPS_DENOMINATOR)
        .ok_or(Error::MathOverflow)?;
    let rhs = collateral_value
        .checked_mul(collateral_factor_bps as i128)
        .ok_or(Error::MathOverflow)?;
    Ok(lhs <= rhs)
}
