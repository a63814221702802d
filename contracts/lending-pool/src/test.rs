#![cfg(test)]

use super::*;
use interest_rate_model::{LinearInterestRateModel, LinearInterestRateModelClient};
use liquidation_engine::{LiquidationEngine, LiquidationEngineClient, LoanStatus};
use price_oracle::{PriceOracle, PriceOracleClient};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec,
};
use synthetic_token::{SyntheticToken, SyntheticTokenClient};

const ONE_ETH: i128 = 10_000_000; // 7 decimals
const ONE_BTC: i128 = 10_000_000;
const ETH_PRICE: i128 = 1_500_00000000; // $1500, 8 decimals
const BTC_PRICE: i128 = 20_000_00000000;
const BASE_RATE: i128 = 10_000_000_000_000_000; // 1%
const MAX_RATE: i128 = 100_000_000_000_000_000; // 10%
const COLLATERAL_FACTOR_BPS: u32 = 7_500;
const START: u64 = 1_700_000_000;
const YEAR: u64 = 31_536_000;

struct Market<'a> {
    underlying: TokenClient<'a>,
    underlying_admin: StellarAssetClient<'a>,
    synthetic: SyntheticTokenClient<'a>,
}

struct Setup<'a> {
    env: Env,
    pool_id: Address,
    pool: LendingPoolClient<'a>,
    oracle: PriceOracleClient<'a>,
    engine: LiquidationEngineClient<'a>,
    eth: Market<'a>,
    btc: Market<'a>,
}

fn eth() -> Symbol {
    symbol_short!("ETH")
}

fn btc() -> Symbol {
    symbol_short!("BTC")
}

fn create_market<'a>(
    env: &Env,
    admin: &Address,
    pool_id: &Address,
    name: &str,
    symbol: &str,
) -> Market<'a> {
    let underlying_id = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let synthetic_id = env.register_contract(None, SyntheticToken);
    let synthetic = SyntheticTokenClient::new(env, &synthetic_id);
    synthetic.initialize(
        admin,
        pool_id,
        &7u32,
        &String::from_str(env, name),
        &String::from_str(env, symbol),
    );

    Market {
        underlying: TokenClient::new(env, &underlying_id),
        underlying_admin: StellarAssetClient::new(env, &underlying_id),
        synthetic,
    }
}

fn setup_with_prices<'a>(set_prices: bool) -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let admin = Address::generate(&env);

    let oracle_id = env.register_contract(None, PriceOracle);
    let oracle = PriceOracleClient::new(&env, &oracle_id);
    oracle.initialize(&admin);
    if set_prices {
        oracle.set_price(&eth(), &ETH_PRICE);
        oracle.set_price(&btc(), &BTC_PRICE);
    }

    let rate_model_id = env.register_contract(None, LinearInterestRateModel);
    LinearInterestRateModelClient::new(&env, &rate_model_id).initialize(
        &admin,
        &BASE_RATE,
        &MAX_RATE,
    );

    let engine_id = env.register_contract(None, LiquidationEngine);
    let engine = LiquidationEngineClient::new(&env, &engine_id);
    engine.initialize(&admin, &COLLATERAL_FACTOR_BPS);

    let pool_id = env.register_contract(None, LendingPool);
    let pool = LendingPoolClient::new(&env, &pool_id);
    pool.initialize(&admin, &oracle_id, &rate_model_id, &engine_id);
    engine.set_reporter(&pool_id);

    let eth_market = create_market(&env, &admin, &pool_id, "Synthetic ETH", "sETH");
    let btc_market = create_market(&env, &admin, &pool_id, "Synthetic BTC", "sBTC");
    pool.register_asset(&eth(), &eth_market.underlying.address, &eth_market.synthetic.address);
    pool.register_asset(&btc(), &btc_market.underlying.address, &btc_market.synthetic.address);

    Setup {
        env,
        pool_id,
        pool,
        oracle,
        engine,
        eth: eth_market,
        btc: btc_market,
    }
}

fn setup<'a>() -> Setup<'a> {
    setup_with_prices(true)
}

fn funded_user(s: &Setup, market: &Market, amount: i128) -> Address {
    let user = Address::generate(&s.env);
    market.underlying_admin.mint(&user, &amount);
    user
}

#[test]
fn test_initialize() {
    let s = setup();

    assert_eq!(s.pool.get_collateral_factor(), COLLATERAL_FACTOR_BPS);
    assert_eq!(s.pool.get_price(&eth()), ETH_PRICE);

    let config = s.pool.get_asset_config(&btc());
    assert_eq!(config.underlying, s.btc.underlying.address);
    assert_eq!(config.synthetic, s.btc.synthetic.address);
    assert_eq!(config.decimals, 7);

    let pool = s.pool.get_pool(&eth());
    assert_eq!(pool.total_deposited, 0);
    assert_eq!(pool.borrow_index, ledger::SCALE);
    assert_eq!(pool.last_accrual_timestamp, START);

    let admin = s.pool.get_admin();
    assert_eq!(
        s.pool.try_initialize(&admin, &s.oracle.address, &s.oracle.address, &s.engine.address),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_deposit_withdraw_round_trip() {
    let s = setup();
    let user = funded_user(&s, &s.eth, 2 * ONE_ETH);

    s.pool.deposit(&user, &eth(), &ONE_ETH);
    assert_eq!(s.eth.underlying.balance(&user), ONE_ETH);
    assert_eq!(s.eth.underlying.balance(&s.pool_id), ONE_ETH);
    assert_eq!(s.eth.synthetic.balance(&user), ONE_ETH);
    assert_eq!(s.pool.get_collateral(&user, &eth()), ONE_ETH);
    assert_eq!(s.pool.get_deposit(&user), ETH_PRICE);
    assert_eq!(s.pool.get_debt(&user), 0);

    s.pool.withdraw(&user, &eth(), &ONE_ETH);
    assert_eq!(s.eth.underlying.balance(&user), 2 * ONE_ETH);
    assert_eq!(s.eth.underlying.balance(&s.pool_id), 0);
    assert_eq!(s.eth.synthetic.balance(&user), 0);
    assert_eq!(s.eth.synthetic.total_supply(), 0);

    let position = s.pool.get_position(&user, &eth());
    assert_eq!(position.collateral_amount, 0);
    assert_eq!(position.synthetic_minted, 0);
    assert_eq!(s.pool.get_pool(&eth()).total_deposited, 0);
}

#[test]
fn test_deposit_emits_event() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);

    s.pool.deposit(&user, &eth(), &ONE_ETH);

    let expected_topics: Vec<Val> = (symbol_short!("deposit"), user.clone()).into_val(&s.env);
    let mut found = false;
    for (contract, topics, data) in s.env.events().all().iter() {
        if contract == s.pool_id && topics == expected_topics {
            let (asset, amount) = <(Symbol, i128)>::try_from_val(&s.env, &data).unwrap();
            assert_eq!(asset, eth());
            assert_eq!(amount, ONE_ETH);
            found = true;
        }
    }
    assert!(found);
}

#[test]
fn test_unknown_asset_rejected() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);
    let invalid = symbol_short!("INVALID");

    assert_eq!(
        s.pool.try_deposit(&user, &invalid, &ONE_ETH),
        Err(Ok(Error::InvalidAssetType))
    );
    assert_eq!(
        s.pool.try_withdraw(&user, &invalid, &ONE_ETH),
        Err(Ok(Error::InvalidAssetType))
    );
    assert_eq!(
        s.pool.try_borrow(&user, &invalid, &ONE_ETH),
        Err(Ok(Error::InvalidAssetType))
    );
    assert_eq!(
        s.pool.try_repay(&user, &invalid, &ONE_ETH),
        Err(Ok(Error::InvalidAssetType))
    );
    assert_eq!(s.eth.underlying.balance(&user), ONE_ETH);
}

#[test]
fn test_non_positive_amounts_rejected() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);

    assert_eq!(
        s.pool.try_deposit(&user, &eth(), &0),
        Err(Ok(Error::ZeroOrNegativeAmount))
    );
    assert_eq!(
        s.pool.try_repay(&user, &eth(), &-5),
        Err(Ok(Error::ZeroOrNegativeAmount))
    );
}

#[test]
fn test_withdraw_more_than_deposited() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);

    s.pool.deposit(&user, &eth(), &(ONE_ETH / 2));
    assert_eq!(
        s.pool.try_withdraw(&user, &eth(), &ONE_ETH),
        Err(Ok(Error::InsufficientBalance))
    );
    assert_eq!(
        s.pool.try_withdraw(&Address::generate(&s.env), &eth(), &1),
        Err(Ok(Error::InsufficientBalance))
    );
    assert_eq!(s.pool.get_collateral(&user, &eth()), ONE_ETH / 2);
}

#[test]
fn test_borrow_gate() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);
    s.pool.deposit(&user, &eth(), &ONE_ETH);

    // $3000 of debt against $1500 of collateral
    assert_eq!(
        s.pool.try_borrow(&user, &eth(), &(2 * ONE_ETH)),
        Err(Ok(Error::InsufficientCollateral))
    );
    assert_eq!(s.pool.get_debt(&user), 0);

    s.pool.borrow(&user, &eth(), &(ONE_ETH / 2));
    assert_eq!(s.pool.get_borrowed(&user, &eth()), ONE_ETH / 2);
    assert_eq!(s.pool.get_debt(&user), ETH_PRICE / 2);
    assert_eq!(s.eth.underlying.balance(&user), ONE_ETH / 2);

    // $750 borrowed, limit is $1125
    assert_eq!(
        s.pool.try_borrow(&user, &eth(), &(ONE_ETH / 4 + 1)),
        Err(Ok(Error::InsufficientCollateral))
    );
}

#[test]
fn test_withdraw_blocked_by_debt() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);
    s.pool.deposit(&user, &eth(), &ONE_ETH);
    s.pool.borrow(&user, &eth(), &(ONE_ETH / 2));

    // Remaining $750 of collateral only backs $562.50
    assert_eq!(
        s.pool.try_withdraw(&user, &eth(), &(ONE_ETH / 2)),
        Err(Ok(Error::InsufficientCollateral))
    );

    s.pool.withdraw(&user, &eth(), &(ONE_ETH / 10));
    assert_eq!(s.pool.get_collateral(&user, &eth()), ONE_ETH - ONE_ETH / 10);
}

#[test]
fn test_borrow_needs_pool_liquidity() {
    let s = setup();
    let user = funded_user(&s, &s.eth, 10 * ONE_ETH);
    s.pool.deposit(&user, &eth(), &(10 * ONE_ETH));

    // Plenty of collateral, but nobody has supplied BTC
    assert_eq!(
        s.pool.try_borrow(&user, &btc(), &(ONE_BTC / 100)),
        Err(Ok(Error::InsufficientLiquidity))
    );
}

#[test]
fn test_repay() {
    let s = setup();
    let user = funded_user(&s, &s.eth, ONE_ETH);
    s.pool.deposit(&user, &eth(), &ONE_ETH);
    s.pool.borrow(&user, &eth(), &(ONE_ETH / 2));

    assert_eq!(
        s.pool.try_repay(&user, &eth(), &(ONE_ETH / 2 + 1)),
        Err(Ok(Error::RepayExceedsDebt))
    );

    assert_eq!(s.pool.repay(&user, &eth(), &(ONE_ETH / 5)), ONE_ETH / 5);
    assert_eq!(s.pool.get_borrowed(&user, &eth()), ONE_ETH / 2 - ONE_ETH / 5);

    s.pool.repay(&user, &eth(), &(ONE_ETH / 2 - ONE_ETH / 5));
    assert_eq!(s.pool.get_debt(&user), 0);
    assert_eq!(s.pool.get_pool(&eth()).total_borrowed, 0);

    s.pool.withdraw(&user, &eth(), &ONE_ETH);
    assert_eq!(s.eth.underlying.balance(&user), ONE_ETH);
}

#[test]
fn test_interest_accrues_over_a_year() {
    let s = setup();
    let user = funded_user(&s, &s.eth, 10 * ONE_ETH);
    s.pool.deposit(&user, &eth(), &(10 * ONE_ETH));
    s.pool.borrow(&user, &eth(), &(5 * ONE_ETH));

    s.env.ledger().with_mut(|li| li.timestamp = START + YEAR);

    // 50% utilization: 1% + 0.5 * 9% = 5.5% on 5 ETH
    assert_eq!(s.pool.get_borrowed(&user, &eth()), 52_750_000);
    // View does not write
    assert_eq!(s.pool.get_pool(&eth()).total_borrowed, 52_750_000);

    let pool = s.pool.accrue_interest(&eth());
    assert_eq!(pool.total_borrowed, 52_750_000);
    assert_eq!(pool.last_accrual_timestamp, START + YEAR);
    assert_eq!(pool.accrued_rate_per_period, 55_000_000_000_000_000);

    // Accruing again in the same ledger adds nothing
    assert_eq!(s.pool.accrue_interest(&eth()).total_borrowed, 52_750_000);
    assert_eq!(s.pool.get_borrowed(&user, &eth()), 52_750_000);
}

#[test]
fn test_accrue_event_only_when_interest_added() {
    let s = setup();
    let user = funded_user(&s, &s.eth, 10 * ONE_ETH);
    s.pool.deposit(&user, &eth(), &(10 * ONE_ETH));
    s.pool.borrow(&user, &eth(), &(5 * ONE_ETH));

    let accrue_topics: Vec<Val> = (symbol_short!("accrue"), eth()).into_val(&s.env);
    let accrue_events = |env: &Env| -> Vec<(i128, i128, i128)> {
        let mut found = Vec::new(env);
        for (contract, topics, data) in env.events().all().iter() {
            if contract == s.pool_id && topics == accrue_topics {
                found.push_back(<(i128, i128, i128)>::try_from_val(env, &data).unwrap());
            }
        }
        found
    };

    s.env.ledger().with_mut(|li| li.timestamp = START + YEAR);
    s.pool.accrue_interest(&eth());
    let events = accrue_events(&s.env);
    assert_eq!(events.len(), 1);
    let (interest, rate, borrow_index) = events.get(0).unwrap();
    assert_eq!(interest, 2_750_000);
    assert_eq!(rate, 55_000_000_000_000_000);
    assert_eq!(borrow_index, ledger::SCALE + 55_000_000_000_000_000);

    // Same ledger, nothing to add
    let pool = s.pool.accrue_interest(&eth());
    assert_eq!(pool.total_borrowed, 50_000_000 + 2_750_000);
    assert!(accrue_events(&s.env).len() <= 1);
}

#[test]
fn test_lender_exits_after_borrowers_repay_with_interest() {
    let s = setup();
    let lender = funded_user(&s, &s.eth, 10 * ONE_ETH);
    let alice = funded_user(&s, &s.btc, ONE_BTC);
    let bob = funded_user(&s, &s.btc, ONE_BTC);

    s.pool.deposit(&lender, &eth(), &(10 * ONE_ETH));
    s.pool.deposit(&alice, &btc(), &ONE_BTC);
    s.pool.deposit(&bob, &btc(), &ONE_BTC);
    s.pool.borrow(&alice, &eth(), &30_000_001);
    s.pool.borrow(&bob, &eth(), &20_000_003);

    s.env.ledger().with_mut(|li| li.timestamp = START + YEAR / 3 + 7);

    for borrower in [alice.clone(), bob.clone()] {
        let owed = s.pool.get_borrowed(&borrower, &eth());
        // Cover the interest on top of the borrowed principal
        s.eth.underlying_admin.mint(&borrower, &ONE_ETH);
        assert_eq!(s.pool.repay(&borrower, &eth(), &owed), owed);
        assert_eq!(s.pool.get_borrowed(&borrower, &eth()), 0);
    }
    assert_eq!(s.pool.get_pool(&eth()).total_borrowed, 0);

    s.pool.withdraw(&lender, &eth(), &(10 * ONE_ETH));
    assert_eq!(s.eth.underlying.balance(&lender), 10 * ONE_ETH);
    assert_eq!(s.pool.get_pool(&eth()).total_deposited, 0);
}

#[test]
fn test_interest_split_between_borrowers() {
    let s = setup();
    let lender = funded_user(&s, &s.eth, 10 * ONE_ETH);
    let alice = funded_user(&s, &s.btc, ONE_BTC);
    let bob = funded_user(&s, &s.btc, ONE_BTC);

    s.pool.deposit(&lender, &eth(), &(10 * ONE_ETH));
    s.pool.deposit(&alice, &btc(), &ONE_BTC);
    s.pool.deposit(&bob, &btc(), &ONE_BTC);
    s.pool.borrow(&alice, &eth(), &(3 * ONE_ETH));
    s.pool.borrow(&bob, &eth(), &(2 * ONE_ETH));

    s.env.ledger().with_mut(|li| li.timestamp = START + YEAR);
    s.pool.accrue_interest(&eth());

    let alice_debt = s.pool.get_borrowed(&alice, &eth());
    let bob_debt = s.pool.get_borrowed(&bob, &eth());
    assert_eq!(alice_debt, 31_650_000);
    assert_eq!(bob_debt, 21_100_000);

    let pool = s.pool.get_pool(&eth());
    assert!(alice_debt + bob_debt >= pool.total_borrowed);
    assert!(pool.total_borrowed <= pool.total_deposited);
}

#[test]
fn test_pool_accounting_stays_consistent() {
    let s = setup();
    let lender = funded_user(&s, &s.eth, 5 * ONE_ETH);
    let borrower = funded_user(&s, &s.btc, ONE_BTC);

    s.pool.deposit(&lender, &eth(), &(5 * ONE_ETH));
    s.pool.deposit(&borrower, &btc(), &ONE_BTC);
    s.pool.borrow(&borrower, &eth(), &(3 * ONE_ETH));
    s.pool.repay(&borrower, &eth(), &ONE_ETH);
    s.pool.withdraw(&lender, &eth(), &ONE_ETH);

    for market_symbol in [eth(), btc()] {
        let market = if market_symbol == eth() { &s.eth } else { &s.btc };
        let pool = s.pool.get_pool(&market_symbol);

        assert!(pool.total_borrowed <= pool.total_deposited);
        assert_eq!(
            market.underlying.balance(&s.pool_id),
            pool.total_deposited - pool.total_borrowed
        );
        assert_eq!(market.synthetic.total_supply(), pool.total_deposited);
    }

    // Lender can't pull out what's lent
    assert_eq!(
        s.pool.try_withdraw(&lender, &eth(), &(3 * ONE_ETH)),
        Err(Ok(Error::InsufficientLiquidity))
    );
}

#[test]
fn test_liquidation_after_price_drop() {
    let s = setup();
    let supplier = funded_user(&s, &s.btc, ONE_BTC);
    let user = funded_user(&s, &s.eth, ONE_ETH);

    s.pool.deposit(&supplier, &btc(), &ONE_BTC);
    s.pool.deposit(&user, &eth(), &ONE_ETH);
    // 0.05 BTC = $1000 against $1500 of ETH
    s.pool.borrow(&user, &btc(), &(ONE_BTC / 20));

    assert_eq!(s.pool.check_liquidation(&user), 0);
    assert_eq!(s.engine.get_status(&user), LoanStatus::Healthy);

    // ETH to $1200: allowed $900, owed $1000
    s.oracle.set_price(&eth(), &1_200_00000000);
    assert_eq!(s.pool.check_liquidation(&user), 100_00000000);
    assert_eq!(s.engine.get_status(&user), LoanStatus::Liquidatable);
    assert_eq!(s.engine.loan_value(&user), 1_000_00000000);
    assert_eq!(s.engine.collateral_value(&user), 1_200_00000000);
}

#[test]
fn test_price_not_set() {
    let s = setup_with_prices(false);
    let user = funded_user(&s, &s.eth, ONE_ETH);

    // Deposits need no price
    s.pool.deposit(&user, &eth(), &ONE_ETH);

    assert_eq!(s.pool.try_get_deposit(&user), Err(Ok(Error::PriceNotSet)));
    assert_eq!(s.pool.try_get_price(&eth()), Err(Ok(Error::PriceNotSet)));
    assert_eq!(
        s.pool.try_borrow(&user, &eth(), &1),
        Err(Ok(Error::PriceNotSet))
    );
}
