use soroban_sdk::{symbol_short, Address, Env, Symbol};

// Event emitted whenever a quote is overwritten
pub fn price_updated_event(env: &Env, asset: Symbol, price: i128) {
    let topics = (symbol_short!("price_upd"), asset);
    env.events().publish(topics, price);
}

// Event emitted when the admin hands the feed role to another address
pub fn feeder_updated_event(env: &Env, feeder: Address) {
    let topics = (symbol_short!("feeder"),);
    env.events().publish(topics, feeder);
}
