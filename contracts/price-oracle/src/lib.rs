#![no_std]

use soroban_sdk::{contract, contractimpl, log, Address, Env, Symbol};

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::PriceQuote;

use events::{feeder_updated_event, price_updated_event};
use storage::{
    extend_instance, get_admin, get_feeder, is_initialized, read_quote, set_admin, set_feeder,
    set_initialized, write_quote,
};

/// Quotes are fixed-point with this many decimals.
pub const PRICE_DECIMALS: u32 = 8;

#[contract]
pub struct PriceOracle;

#[contractimpl]
impl PriceOracle {
    /// Initialize the oracle. The admin starts out as the only feeder.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        set_admin(&env, &admin);
        set_feeder(&env, &admin);
        set_initialized(&env, true);
        extend_instance(&env);

        log!(&env, "PriceOracle: initialized", admin);
        Ok(())
    }

    /// Hand the feed role to another address. Only callable by admin.
    pub fn set_feeder(env: Env, feeder: Address) -> Result<(), Error> {
        let admin = get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        extend_instance(&env);

        set_feeder(&env, &feeder);
        feeder_updated_event(&env, feeder);
        Ok(())
    }

    /// Overwrite the quote for `asset`. Any non-negative value is accepted.
    pub fn set_price(env: Env, asset: Symbol, price: i128) -> Result<(), Error> {
        let feeder = get_feeder(&env).ok_or(Error::NotInitialized)?;
        feeder.require_auth();

        if price < 0 {
            return Err(Error::NegativePrice);
        }
        extend_instance(&env);

        let quote = PriceQuote {
            asset: asset.clone(),
            price,
            set_at: env.ledger().timestamp(),
        };
        write_quote(&env, &quote);

        price_updated_event(&env, asset, price);
        Ok(())
    }

    pub fn get_price(env: Env, asset: Symbol) -> Result<i128, Error> {
        Self::get_quote(env, asset).map(|quote| quote.price)
    }

    /// The read the lending pool uses. Same value as `get_price`.
    pub fn fetch_price(env: Env, asset: Symbol) -> Result<i128, Error> {
        Self::get_price(env, asset)
    }

    /// Full quote including the timestamp it was written at. No age check is
    /// applied here; callers that care about staleness compare `set_at`.
    pub fn get_quote(env: Env, asset: Symbol) -> Result<PriceQuote, Error> {
        extend_instance(&env);
        read_quote(&env, &asset).ok_or(Error::PriceNotSet)
    }

    pub fn decimals(_env: Env) -> u32 {
        PRICE_DECIMALS
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        get_admin(&env).ok_or(Error::NotInitialized)
    }

    pub fn get_feeder(env: Env) -> Result<Address, Error> {
        get_feeder(&env).ok_or(Error::NotInitialized)
    }

    /// Bump instance TTL. Anyone can call this to keep the contract alive.
    pub fn bump_instance(env: Env) {
        extend_instance(&env);
    }
}
