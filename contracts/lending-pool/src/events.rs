use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub fn deposit_event(env: &Env, user: Address, asset: Symbol, amount: i128) {
    let topics = (symbol_short!("deposit"), user);
    env.events().publish(topics, (asset, amount));
}

pub fn withdraw_event(env: &Env, user: Address, asset: Symbol, amount: i128) {
    let topics = (symbol_short!("withdraw"), user);
    env.events().publish(topics, (asset, amount));
}

pub fn borrow_event(env: &Env, user: Address, asset: Symbol, amount: i128) {
    let topics = (symbol_short!("borrow"), user);
    env.events().publish(topics, (asset, amount));
}

pub fn repay_event(env: &Env, user: Address, asset: Symbol, amount: i128) {
    let topics = (symbol_short!("repay"), user);
    env.events().publish(topics, (asset, amount));
}

// Emitted only when an accrual actually adds interest
pub fn accrue_event(env: &Env, asset: Symbol, interest: i128, rate: i128, borrow_index: i128) {
    let topics = (symbol_short!("accrue"), asset);
    env.events().publish(topics, (interest, rate, borrow_index));
}

pub fn asset_registered_event(env: &Env, asset: Symbol, underlying: Address, synthetic: Address) {
    let topics = (symbol_short!("asset_reg"), asset);
    env.events().publish(topics, (underlying, synthetic));
}
