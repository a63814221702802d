use soroban_sdk::{symbol_short, Address, Env};

// Event emitted when a borrower's loan exceeds the allowed loan
pub fn liquidation_triggered_event(
    env: &Env,
    borrower: Address,
    shortfall: i128,
    recipient: Address,
) {
    let topics = (symbol_short!("liq_trig"), borrower);
    env.events().publish(topics, (shortfall, recipient));
}

// Event emitted when fresh loan/collateral inputs are recorded
pub fn loan_recorded_event(env: &Env, borrower: Address, loan_value: i128, collateral_value: i128) {
    let topics = (symbol_short!("loan_set"), borrower);
    env.events().publish(topics, (loan_value, collateral_value));
}

pub fn reporter_updated_event(env: &Env, reporter: Address) {
    env.events().publish((symbol_short!("reporter"),), reporter);
}
