use soroban_sdk::{contracttype, Address, Env};

// ---------- TTL constants ----------
const INSTANCE_LIFETIME_THRESHOLD: u32 = 100_800; // ~7 days
const INSTANCE_BUMP_AMOUNT: u32 = 518_400; // bump to ~30 days
const RECORD_LIFETIME_THRESHOLD: u32 = 518_400; // ~30 days
const RECORD_BUMP_AMOUNT: u32 = 3_110_400; // bump to ~180 days

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Reporter,
    CollateralFactorBps,
    Loan(Address),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoanStatus {
    Healthy,
    Liquidatable,
}

/// Last inputs recorded for a borrower. Not authoritative: the lending pool
/// recomputes and overwrites it before every check.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRecord {
    pub borrower: Address,
    pub loan_value: i128,
    pub collateral_value: i128,
    pub collateral_factor_bps: u32,
    pub recipient: Address,
    pub status: LoanStatus,
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_reporter(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Reporter)
}

pub fn set_reporter(env: &Env, reporter: &Address) {
    env.storage().instance().set(&DataKey::Reporter, reporter);
}

pub fn get_collateral_factor(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::CollateralFactorBps)
}

pub fn set_collateral_factor(env: &Env, factor_bps: u32) {
    env.storage()
        .instance()
        .set(&DataKey::CollateralFactorBps, &factor_bps);
}

pub fn read_record(env: &Env, borrower: &Address) -> Option<LoanRecord> {
    let key = DataKey::Loan(borrower.clone());
    let record: Option<LoanRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
    record
}

pub fn write_record(env: &Env, record: &LoanRecord) {
    let key = DataKey::Loan(record.borrower.clone());
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}
