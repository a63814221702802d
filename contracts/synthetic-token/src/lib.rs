#![no_std]

//! Synthetic claim token minted 1:1 against collateral held by the lending
//! pool. SEP-41 compatible; only the minter (the pool) can mint or burn.

use soroban_sdk::{contract, contractimpl, log, Address, Env, String};
use soroban_token_sdk::TokenUtils;

mod error;
mod storage;

pub use error::Error;
pub use storage::TokenMetadata;

use storage::{
    extend_balance, extend_instance, read_admin, read_allowance, read_balance, read_metadata,
    read_minter, read_total_supply, write_admin, write_allowance, write_balance, write_metadata,
    write_minter, write_total_supply,
};

fn check_nonnegative(amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::NegativeAmount);
    }
    Ok(())
}

fn require_admin(env: &Env) -> Result<Address, Error> {
    let admin = read_admin(env).ok_or(Error::NotInitialized)?;
    admin.require_auth();
    Ok(admin)
}

fn require_minter(env: &Env) -> Result<Address, Error> {
    let minter = read_minter(env).ok_or(Error::NotInitialized)?;
    minter.require_auth();
    Ok(minter)
}

fn metadata(env: &Env) -> Result<TokenMetadata, Error> {
    read_metadata(env).ok_or(Error::NotInitialized)
}

fn spend_allowance(env: &Env, from: &Address, spender: &Address, amount: i128) -> Result<(), Error> {
    let allowance = read_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(Error::InsufficientAllowance);
    }
    if amount > 0 {
        write_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        );
    }
    Ok(())
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let from_balance = read_balance(env, from);
    if from_balance < amount {
        return Err(Error::InsufficientBalance);
    }
    write_balance(env, from, from_balance - amount);
    write_balance(env, to, read_balance(env, to) + amount);
    Ok(())
}

#[contract]
pub struct SyntheticToken;

#[contractimpl]
impl SyntheticToken {
    /// `minter` is the lending pool that holds the backing collateral.
    pub fn initialize(
        env: Env,
        admin: Address,
        minter: Address,
        decimals: u32,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        if read_admin(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }

        write_admin(&env, &admin);
        write_minter(&env, &minter);
        write_metadata(
            &env,
            &TokenMetadata {
                decimals,
                name,
                symbol,
            },
        );
        write_total_supply(&env, 0);
        extend_instance(&env);

        log!(&env, "SyntheticToken: initialized", minter);
        Ok(())
    }

    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }

    pub fn bump_balance(env: Env, user: Address) {
        extend_balance(&env, &user);
        extend_instance(&env);
    }

    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), Error> {
        check_nonnegative(amount)?;
        let minter = require_minter(&env)?;
        extend_instance(&env);

        write_balance(&env, &to, read_balance(&env, &to) + amount);
        write_total_supply(&env, read_total_supply(&env) + amount);

        TokenUtils::new(&env).events().mint(minter, to, amount);
        Ok(())
    }

    /// Burns from a holder's balance on collateral withdrawal. Minter only, no allowance.
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        check_nonnegative(amount)?;
        require_minter(&env)?;
        extend_instance(&env);

        let balance = read_balance(&env, &from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }
        write_balance(&env, &from, balance - amount);
        write_total_supply(&env, read_total_supply(&env) - amount);

        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    // --- SEP-41 ---

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        extend_instance(&env);
        read_allowance(&env, &from, &spender).amount
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), Error> {
        from.require_auth();
        check_nonnegative(amount)?;
        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            return Err(Error::InvalidExpiration);
        }
        extend_instance(&env);
        write_allowance(&env, &from, &spender, amount, expiration_ledger);

        TokenUtils::new(&env)
            .events()
            .approve(from, spender, amount, expiration_ledger);
        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        extend_instance(&env);
        read_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        move_balance(&env, &from, &to, amount)?;

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        move_balance(&env, &from, &to, amount)?;

        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    /// Holder-initiated burn. Leaves the pool's collateral untouched.
    pub fn burn_from(env: Env, spender: Address, from: Address, amount: i128) -> Result<(), Error> {
        spender.require_auth();
        check_nonnegative(amount)?;
        extend_instance(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        let balance = read_balance(&env, &from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }
        write_balance(&env, &from, balance - amount);
        write_total_supply(&env, read_total_supply(&env) - amount);

        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        extend_instance(&env);
        read_total_supply(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        extend_instance(&env);
        Ok(metadata(&env)?.decimals)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        extend_instance(&env);
        Ok(metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        extend_instance(&env);
        Ok(metadata(&env)?.symbol)
    }

    // --- Admin ---

    /// Point minting at a redeployed pool.
    pub fn set_minter(env: Env, new_minter: Address) -> Result<(), Error> {
        require_admin(&env)?;
        extend_instance(&env);
        write_minter(&env, &new_minter);
        Ok(())
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let admin = require_admin(&env)?;
        extend_instance(&env);
        write_admin(&env, &new_admin);

        TokenUtils::new(&env).events().set_admin(admin, new_admin);
        Ok(())
    }

    pub fn minter(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        read_minter(&env).ok_or(Error::NotInitialized)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        read_admin(&env).ok_or(Error::NotInitialized)
    }
}
