#![no_std]

use soroban_sdk::{contract, contractimpl, log, Address, Env};

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::{LoanRecord, LoanStatus};

use events::{liquidation_triggered_event, loan_recorded_event, reporter_updated_event};
use storage::{
    extend_instance, get_admin, get_collateral_factor, get_reporter, read_record, set_admin,
    set_collateral_factor, set_reporter, write_record,
};

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Largest loan `collateral_value` can carry at `collateral_factor_bps`.
pub fn allowed_loan(collateral_value: i128, collateral_factor_bps: u32) -> Option<i128> {
    collateral_value
        .checked_mul(collateral_factor_bps as i128)
        .map(|scaled| scaled / BPS_DENOMINATOR)
}

/// Amount by which `loan_value` exceeds the allowed loan, 0 when covered.
pub fn shortfall(
    loan_value: i128,
    collateral_value: i128,
    collateral_factor_bps: u32,
) -> Option<i128> {
    let allowed = allowed_loan(collateral_value, collateral_factor_bps)?;
    if loan_value > allowed {
        Some(loan_value - allowed)
    } else {
        Some(0)
    }
}

fn require_reporter(env: &Env) -> Result<(), Error> {
    let reporter = get_reporter(env).ok_or(Error::NotInitialized)?;
    reporter.require_auth();
    Ok(())
}

#[contract]
pub struct LiquidationEngine;

#[contractimpl]
impl LiquidationEngine {
    /// Initialize with the protocol-wide collateral factor in basis points.
    /// The admin is the initial reporter.
    pub fn initialize(env: Env, admin: Address, collateral_factor_bps: u32) -> Result<(), Error> {
        if get_admin(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }
        if collateral_factor_bps == 0 || collateral_factor_bps as i128 > BPS_DENOMINATOR {
            return Err(Error::InvalidCollateralFactor);
        }
        admin.require_auth();

        set_admin(&env, &admin);
        set_reporter(&env, &admin);
        set_collateral_factor(&env, collateral_factor_bps);
        extend_instance(&env);

        log!(&env, "LiquidationEngine: initialized", collateral_factor_bps);
        Ok(())
    }

    /// Allow another address (normally the lending pool) to record loans.
    /// Only callable by admin.
    pub fn set_reporter(env: Env, reporter: Address) -> Result<(), Error> {
        let admin = get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        extend_instance(&env);

        set_reporter(&env, &reporter);
        reporter_updated_event(&env, reporter);
        Ok(())
    }

    /// Record the inputs for the next check, replacing any previous record.
    pub fn set_loan_and_collateral(
        env: Env,
        borrower: Address,
        loan_value: i128,
        collateral_value: i128,
        recipient: Address,
    ) -> Result<(), Error> {
        require_reporter(&env)?;
        if loan_value < 0 || collateral_value < 0 {
            return Err(Error::NegativeValue);
        }
        let collateral_factor_bps = get_collateral_factor(&env).ok_or(Error::NotInitialized)?;
        extend_instance(&env);

        let status = match read_record(&env, &borrower) {
            Some(previous) => previous.status,
            None => LoanStatus::Healthy,
        };
        let record = LoanRecord {
            borrower: borrower.clone(),
            loan_value,
            collateral_value,
            collateral_factor_bps,
            recipient,
            status,
        };
        write_record(&env, &record);

        loan_recorded_event(&env, borrower, loan_value, collateral_value);
        Ok(())
    }

    /// Decide whether `borrower` can be liquidated.
    ///
    /// The recorded collateral is revalued at `current_collateral_price`
    /// (1 leaves it as recorded). Returns the shortfall, 0 when healthy.
    pub fn check_liquidation(
        env: Env,
        borrower: Address,
        current_collateral_price: i128,
    ) -> Result<i128, Error> {
        if current_collateral_price <= 0 {
            return Err(Error::ZeroOrNegativeAmount);
        }
        extend_instance(&env);

        let mut record = read_record(&env, &borrower).ok_or(Error::LoanNotFound)?;
        let collateral_value = record
            .collateral_value
            .checked_mul(current_collateral_price)
            .ok_or(Error::MathOverflow)?;
        let deficit = shortfall(
            record.loan_value,
            collateral_value,
            record.collateral_factor_bps,
        )
        .ok_or(Error::MathOverflow)?;

        if deficit > 0 {
            record.status = LoanStatus::Liquidatable;
            write_record(&env, &record);

            liquidation_triggered_event(&env, borrower.clone(), deficit, record.recipient);
            log!(&env, "liquidation triggered", borrower, deficit);
        } else if record.status != LoanStatus::Healthy {
            record.status = LoanStatus::Healthy;
            write_record(&env, &record);
        }

        Ok(deficit)
    }

    // --- Views ---

    pub fn loan_value(env: Env, borrower: Address) -> i128 {
        read_record(&env, &borrower).map_or(0, |record| record.loan_value)
    }

    pub fn collateral_value(env: Env, borrower: Address) -> i128 {
        read_record(&env, &borrower).map_or(0, |record| record.collateral_value)
    }

    pub fn get_status(env: Env, borrower: Address) -> LoanStatus {
        read_record(&env, &borrower).map_or(LoanStatus::Healthy, |record| record.status)
    }

    pub fn get_record(env: Env, borrower: Address) -> Option<LoanRecord> {
        read_record(&env, &borrower)
    }

    pub fn collateral_factor_bps(env: Env) -> Result<u32, Error> {
        extend_instance(&env);
        get_collateral_factor(&env).ok_or(Error::NotInitialized)
    }

    pub fn get_reporter(env: Env) -> Result<Address, Error> {
        get_reporter(&env).ok_or(Error::NotInitialized)
    }

    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }
}
