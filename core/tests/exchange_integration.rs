use dexcore::*;

use alloy_primitives::{Address, U256};
use std::cell::RefCell;
use std::rc::Rc;
use testutil::fixtures::key_seed;
use testutil::generators::falling_series;

const OWNER: Address = Address::repeat_byte(0xAA);
const POOL: Address = Address::repeat_byte(0xBB);
const STRATEGY: Address = Address::repeat_byte(0xCC);

type FeedHandle = Rc<RefCell<MockPriceFeed>>;

fn new_exchange(initial_price: f64) -> (Exchange, FeedHandle) {
    new_exchange_with(initial_price, ExchangeConfig::default())
}

fn new_exchange_with(initial_price: f64, config: ExchangeConfig) -> (Exchange, FeedHandle) {
    let feed = Rc::new(RefCell::new(MockPriceFeed::new(
        Price::from_float(initial_price),
        0,
    )));
    let dex = Exchange::new(
        OWNER,
        POOL,
        STRATEGY,
        Box::new(feed.clone()),
        Box::new(EcdsaVerifier),
        config,
    );
    (dex, feed)
}

fn trader(i: u8) -> OrderSigner {
    OrderSigner::from_bytes(&key_seed(i)).unwrap()
}

/// Commit, reveal, and settle an order for `signer`; assumes the reveal
/// window has already opened at the exchange's current height
fn reveal(
    dex: &mut Exchange,
    signer: &OrderSigner,
    amount: U256,
    price: Price,
    kind: OrderKind,
    side: Side,
) -> OrderId {
    let digest = commitment_digest(signer.address(), amount, price, kind);
    let commit_id = dex.place_commit(signer.address(), digest);
    let height = dex.height().max(commit_id_window(dex, commit_id));
    dex.sync_height(height);
    let signature = signer.sign_order(amount, price, kind);
    dex.reveal_order(commit_id, signer.address(), amount, price, kind, side, &signature)
        .unwrap()
}

fn commit_id_window(dex: &Exchange, commit_id: CommitId) -> Height {
    dex.commit(commit_id).unwrap().reveal_height
}

// --- commit-reveal lifecycle ---

/// commit -> delay -> reveal -> evaluate -> settle, the whole lifecycle
#[test]
fn test_full_order_lifecycle() {
    let (mut dex, _feed) = new_exchange(200.0);
    let alice = trader(1);
    let (amount, price) = (U256::from(100), Price::from_float(200.0));

    dex.deposit_collateral(alice.address(), U256::from(50_000));

    // 1. Hidden commitment
    let digest = commitment_digest(alice.address(), amount, price, OrderKind::Market);
    let commit_id = dex.place_commit(alice.address(), digest);
    assert_eq!(commit_id, 0);

    // 2. Reveal before the delay elapses is rejected, state untouched
    let signature = alice.sign_order(amount, price, OrderKind::Market);
    let err = dex
        .reveal_order(
            commit_id,
            alice.address(),
            amount,
            price,
            OrderKind::Market,
            Side::Buy,
            &signature,
        )
        .unwrap_err();
    assert!(matches!(err, DexError::NotYetRevealable { .. }));
    assert!(!dex.commit(0).unwrap().revealed);

    // 3. After the delay, the same reveal materializes Order 0
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    let order_id = dex
        .reveal_order(
            commit_id,
            alice.address(),
            amount,
            price,
            OrderKind::Market,
            Side::Buy,
            &signature,
        )
        .unwrap();
    assert_eq!(order_id, 0);
    assert!(dex.order(0).unwrap().active);
    assert!(dex.drain_events().contains(&Event::OrderRevealed {
        commit_id: 0,
        order_id: 0,
        trader: alice.address(),
        kind: OrderKind::Market,
        amount,
        price,
    }));

    // 4. Market order settles on the next evaluation pass
    let settled = dex.run_evaluation(0).unwrap();
    assert_eq!(settled, vec![0]);
    assert!(!dex.order(0).unwrap().active);
    // notional = 100 * 200 units
    assert_eq!(dex.collateral_balance(&POOL), U256::from(20_000));
    assert_eq!(dex.collateral_balance(&alice.address()), U256::from(30_000));

    // 5. Re-evaluation is a no-op: settlement is exactly-once
    dex.drain_events();
    assert!(dex.run_evaluation(0).unwrap().is_empty());
    assert!(dex.events().is_empty());
}

#[test]
fn test_double_reveal_rejected_end_to_end() {
    let (mut dex, _feed) = new_exchange(100.0);
    let alice = trader(1);
    let (amount, price) = (U256::from(5), Price::from_float(100.0));

    let digest = commitment_digest(alice.address(), amount, price, OrderKind::Limit);
    dex.place_commit(alice.address(), digest);
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    let signature = alice.sign_order(amount, price, OrderKind::Limit);

    dex.reveal_order(
        0,
        alice.address(),
        amount,
        price,
        OrderKind::Limit,
        Side::Sell,
        &signature,
    )
    .unwrap();

    let err = dex
        .reveal_order(
            0,
            alice.address(),
            amount,
            price,
            OrderKind::Limit,
            Side::Sell,
            &signature,
        )
        .unwrap_err();
    assert_eq!(err, DexError::AlreadyRevealed(0));
}

// --- condition evaluation scenarios ---

#[test]
fn test_limit_buy_waits_for_favorable_price() {
    let (mut dex, feed) = new_exchange(210.0);
    let bob = trader(2);

    dex.deposit_collateral(bob.address(), U256::from(1_000_000));
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    reveal(
        &mut dex,
        &bob,
        U256::from(100),
        Price::from_float(200.0),
        OrderKind::Limit,
        Side::Buy,
    );

    // P = 210 > L = 200: no execution
    assert!(dex.run_evaluation(0).unwrap().is_empty());
    assert!(dex.order(0).unwrap().active);

    // P = 195 <= L: executes and deactivates
    feed.borrow_mut().update(Price::from_float(195.0), 1);
    let settled = dex.run_evaluation(1).unwrap();
    assert_eq!(settled, vec![0]);
    assert!(!dex.order(0).unwrap().active);
    assert_eq!(dex.collateral_balance(&POOL), U256::from(19_500));
}

#[test]
fn test_stop_loss_fires_on_drop() {
    let (mut dex, feed) = new_exchange(100.0);
    let bob = trader(2);

    // pool must be able to pay the seller
    dex.deposit_collateral(POOL, U256::from(1_000_000));
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    reveal(
        &mut dex,
        &bob,
        U256::from(50),
        Price::from_float(95.0),
        OrderKind::StopLoss,
        Side::Sell,
    );

    // above the trigger: still open
    assert!(dex.run_evaluation(0).unwrap().is_empty());

    // crosses the trigger: settles at the snapshot price
    feed.borrow_mut().update(Price::from_float(94.0), 1);
    assert_eq!(dex.run_evaluation(1).unwrap(), vec![0]);
    // pool pays 50 * 94
    assert_eq!(dex.collateral_balance(&bob.address()), U256::from(4_700));
}

#[test]
fn test_pass_settles_ascending_ids_regardless_of_reveal_order() {
    let (mut dex, _feed) = new_exchange(10.0);
    let alice = trader(1);
    let bob = trader(2);
    let carol = trader(3);
    dex.deposit_collateral(alice.address(), U256::from(1_000_000));
    dex.deposit_collateral(bob.address(), U256::from(1_000_000));
    dex.deposit_collateral(carol.address(), U256::from(1_000_000));

    // commits 0..=3; reveal 3 and 1 only, and 3 first
    let signers = [&alice, &bob, &carol, &alice];
    let mut amounts = Vec::new();
    for (i, signer) in signers.iter().enumerate() {
        let amount = U256::from(10 + i as u64);
        let digest = commitment_digest(signer.address(), amount, Price(0), OrderKind::Market);
        dex.place_commit(signer.address(), digest);
        amounts.push(amount);
    }
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    for commit_id in [3u64, 1u64] {
        let signer = signers[commit_id as usize];
        let amount = amounts[commit_id as usize];
        let signature = signer.sign_order(amount, Price(0), OrderKind::Market);
        dex.reveal_order(
            commit_id,
            signer.address(),
            amount,
            Price(0),
            OrderKind::Market,
            Side::Buy,
            &signature,
        )
        .unwrap();
    }
    dex.drain_events();

    // deterministic: id 1 settles before id 3, submission order is irrelevant
    let settled = dex.run_evaluation(0).unwrap();
    assert_eq!(settled, vec![1, 3]);
    let settle_events: Vec<OrderId> = dex
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::OrderSettled { order_id, .. } => Some(order_id),
            _ => None,
        })
        .collect();
    assert_eq!(settle_events, vec![1, 3]);
}

#[test]
fn test_insolvent_trader_retries_on_later_pass() {
    let (mut dex, _feed) = new_exchange(100.0);
    let bob = trader(2);

    dex.sync_height(DEFAULT_REVEAL_DELAY);
    reveal(
        &mut dex,
        &bob,
        U256::from(100),
        Price::from_float(100.0),
        OrderKind::Market,
        Side::Buy,
    );

    // no collateral: the leg fails, the order stays open, the pass succeeds
    assert!(dex.run_evaluation(0).unwrap().is_empty());
    assert!(dex.order(0).unwrap().active);

    dex.deposit_collateral(bob.address(), U256::from(10_000));
    assert_eq!(dex.run_evaluation(1).unwrap(), vec![0]);
    assert_eq!(dex.collateral_balance(&bob.address()), U256::ZERO);
}

#[test]
fn test_cancelled_order_never_settles() {
    let (mut dex, _feed) = new_exchange(100.0);
    let bob = trader(2);
    dex.deposit_collateral(bob.address(), U256::from(1_000_000));

    dex.sync_height(DEFAULT_REVEAL_DELAY);
    let order_id = reveal(
        &mut dex,
        &bob,
        U256::from(10),
        Price::from_float(100.0),
        OrderKind::Market,
        Side::Buy,
    );
    dex.cancel_order(order_id, bob.address()).unwrap();
    dex.drain_events();

    assert!(dex.run_evaluation(0).unwrap().is_empty());
    assert!(dex.events().is_empty());
    assert_eq!(dex.collateral_balance(&bob.address()), U256::from(1_000_000));
}

#[test]
fn test_stale_oracle_blocks_evaluation() {
    let (mut dex, _feed) = new_exchange_with(
        100.0,
        ExchangeConfig {
            engine: EngineConfig { max_snapshot_age: 30 },
            ..Default::default()
        },
    );
    let bob = trader(2);
    dex.deposit_collateral(bob.address(), U256::from(1_000_000));
    dex.sync_height(DEFAULT_REVEAL_DELAY);
    reveal(
        &mut dex,
        &bob,
        U256::from(10),
        Price::from_float(100.0),
        OrderKind::Market,
        Side::Buy,
    );

    // snapshot was taken at t=0; evaluating at t=100 exceeds the bound
    let err = dex.run_evaluation(100).unwrap_err();
    assert!(matches!(err, DexError::StalePrice { age: 100, max_age: 30 }));
    assert!(dex.order(0).unwrap().active);
}

// --- collateral scenarios ---

#[test]
fn test_deposit_withdraw_round_trip_and_overdraw() {
    let (mut dex, _feed) = new_exchange(100.0);
    let alice = trader(1);

    // deposit 1 unit, withdraw 2: rejected, balance stays 1
    dex.deposit_collateral(alice.address(), U256::from(1));
    let err = dex
        .withdraw_collateral(alice.address(), U256::from(2))
        .unwrap_err();
    assert!(matches!(err, DexError::InsufficientCollateral { .. }));
    assert_eq!(dex.collateral_balance(&alice.address()), U256::from(1));

    // withdraw the full unit: back to zero
    dex.withdraw_collateral(alice.address(), U256::from(1)).unwrap();
    assert_eq!(dex.collateral_balance(&alice.address()), U256::ZERO);
}

// --- strategy ---

#[test]
fn test_strategy_buys_falling_market_with_collateral() {
    let window = 5;
    let (mut dex, feed) = new_exchange_with(
        0.0,
        ExchangeConfig {
            strategy: StrategyConfig {
                window,
                trade_amount: U256::from(10),
                ..Default::default()
            },
            ..Default::default()
        },
    );
    dex.deposit_collateral(STRATEGY, U256::from(1_000_000_000));

    let mut signals = Vec::new();
    for (t, price) in falling_series(Price::from_float(100.0).0, Price::SCALE, window)
        .into_iter()
        .enumerate()
    {
        feed.borrow_mut().update(Price(price), t as u64);
        signals.push(dex.run_strategy(t as u64).unwrap());
    }

    // the window fills on the last observation of a falling series: buy
    assert_eq!(signals.last().unwrap(), &Some(Side::Buy));
    let events = dex.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::StrategyTradeExecuted { side: Side::Buy, .. }
    )));
    // the trade actually moved collateral to the pool
    assert!(dex.collateral_balance(&POOL) > U256::ZERO);
}

#[test]
fn test_strategy_respects_collateral_checks() {
    let window = 3;
    let (mut dex, feed) = new_exchange_with(
        0.0,
        ExchangeConfig {
            strategy: StrategyConfig {
                window,
                trade_amount: U256::from(10),
                ..Default::default()
            },
            ..Default::default()
        },
    );
    // strategy account holds nothing: a buy signal cannot settle

    for (t, price) in falling_series(Price::from_float(100.0).0, Price::SCALE, window)
        .into_iter()
        .enumerate()
    {
        feed.borrow_mut().update(Price(price), t as u64);
        let result = dex.run_strategy(t as u64);
        if t + 1 < window {
            assert_eq!(result.unwrap(), None);
        } else {
            assert!(matches!(
                result.unwrap_err(),
                DexError::InsufficientCollateral { .. }
            ));
        }
    }
    assert!(!dex
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::StrategyTradeExecuted { .. })));
}

// --- administration ---

#[test]
fn test_admin_surface() {
    let (mut dex, _feed) = new_exchange(100.0);
    let stranger = Address::repeat_byte(0x01);
    let service = Address::repeat_byte(0x55);

    assert_eq!(
        dex.set_liquidity_pool(stranger, Address::ZERO),
        Err(DexError::Unauthorized)
    );
    dex.set_liquidity_pool(OWNER, Address::repeat_byte(0xDD)).unwrap();
    assert_eq!(dex.liquidity_pool(), Address::repeat_byte(0xDD));

    dex.register_with_fee_service(OWNER, service).unwrap();
    dex.register_with_fee_service(OWNER, service).unwrap();
    let registrations = dex
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, Event::RegisteredWithFeeService { .. }))
        .count();
    assert_eq!(registrations, 1);
}
