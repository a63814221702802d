use soroban_sdk::{contracttype, Address, Env, Symbol};

// ---------- TTL constants ----------
// Testnet: ~5s per ledger
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400; // bump to ~30 days
const QUOTE_LIFETIME_THRESHOLD: u32 = 518_400; // ~30 days
const QUOTE_BUMP_AMOUNT: u32 = 3_110_400; // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Feeder,
    Initialized,
    Price(Symbol),
}

/// Last value pushed for an asset symbol. `price` carries 8 decimals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceQuote {
    pub asset: Symbol,
    pub price: i128,
    pub set_at: u64,
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ADMIN

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

// FEEDER

pub fn get_feeder(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Feeder)
}

pub fn set_feeder(env: &Env, feeder: &Address) {
    env.storage().instance().set(&DataKey::Feeder, feeder);
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

// QUOTES

pub fn read_quote(env: &Env, asset: &Symbol) -> Option<PriceQuote> {
    let key = DataKey::Price(asset.clone());
    let quote: Option<PriceQuote> = env.storage().persistent().get(&key);
    if quote.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, QUOTE_LIFETIME_THRESHOLD, QUOTE_BUMP_AMOUNT);
    }
    quote
}

pub fn write_quote(env: &Env, quote: &PriceQuote) {
    let key = DataKey::Price(quote.asset.clone());
    env.storage().persistent().set(&key, quote);
    env.storage()
        .persistent()
        .extend_ttl(&key, QUOTE_LIFETIME_THRESHOLD, QUOTE_BUMP_AMOUNT);
}
