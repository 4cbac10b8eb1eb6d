use crate::auth::{RecoverableSignature, SignatureVerifier};
use crate::collateral::CollateralLedger;
use crate::commits::CommitBook;
use crate::error::{DexError, Result};
use crate::evaluation::{ConditionEngine, EngineConfig};
use crate::events::{Event, EventLog};
use crate::oracle::PriceFeed;
use crate::strategy::{AlgorithmicStrategy, StrategyConfig};
use crate::types::*;
use alloy_primitives::{Address, U256};
use tracing::info;

/// Facade configuration
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfig {
    pub reveal_delay: Option<Height>,
    pub engine: EngineConfig,
    pub strategy: StrategyConfig,
}

/// The only surface external actors invoke
///
/// Composes the commit book, collateral ledger, condition engine, and
/// strategy behind one state machine, and holds the references to the
/// external collaborators (price feed, liquidity pool, fee service). The
/// embedding ledger drives `sync_height`; the core never waits on time
/// itself.
pub struct Exchange {
    owner: Address,
    liquidity_pool: Address,
    fee_service: Option<Address>,
    strategy_account: Address,
    height: Height,
    feed: Box<dyn PriceFeed>,
    commits: CommitBook,
    ledger: CollateralLedger,
    engine: ConditionEngine,
    strategy: AlgorithmicStrategy,
    events: EventLog,
}

impl Exchange {
    pub fn new(
        owner: Address,
        liquidity_pool: Address,
        strategy_account: Address,
        feed: Box<dyn PriceFeed>,
        verifier: Box<dyn SignatureVerifier>,
        config: ExchangeConfig,
    ) -> Self {
        let reveal_delay = config
            .reveal_delay
            .unwrap_or(crate::commits::DEFAULT_REVEAL_DELAY);
        Self {
            owner,
            liquidity_pool,
            fee_service: None,
            strategy_account,
            height: 0,
            feed,
            commits: CommitBook::new(reveal_delay, verifier),
            ledger: CollateralLedger::new(),
            engine: ConditionEngine::new(config.engine),
            strategy: AlgorithmicStrategy::new(config.strategy),
            events: EventLog::new(),
        }
    }

    // --- ledger-driven clock ---

    /// Adopt the external ledger's current height
    pub fn sync_height(&mut self, height: Height) {
        self.height = height;
    }

    pub fn height(&self) -> Height {
        self.height
    }

    // --- commit-reveal ---

    pub fn place_commit(&mut self, committer: Address, commitment: [u8; 32]) -> CommitId {
        self.commits
            .place_commit(committer, commitment, self.height, &mut self.events)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reveal_order(
        &mut self,
        commit_id: CommitId,
        revealer: Address,
        amount: U256,
        price: Price,
        kind: OrderKind,
        side: Side,
        signature: &RecoverableSignature,
    ) -> Result<OrderId> {
        self.commits.reveal_order(
            commit_id,
            revealer,
            amount,
            price,
            kind,
            side,
            signature,
            self.height,
            &mut self.events,
        )
    }

    pub fn cancel_order(&mut self, order_id: OrderId, caller: Address) -> Result<()> {
        self.commits.cancel_order(order_id, caller, &mut self.events)
    }

    pub fn commit(&self, id: CommitId) -> Option<&Commit> {
        self.commits.commit(id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.commits.order(id)
    }

    // --- collateral ---

    pub fn deposit_collateral(&mut self, account: Address, amount: U256) {
        self.ledger.deposit(account, amount, &mut self.events);
    }

    pub fn withdraw_collateral(&mut self, account: Address, amount: U256) -> Result<()> {
        self.ledger.withdraw(account, amount, &mut self.events)
    }

    pub fn collateral_balance(&self, account: &Address) -> U256 {
        self.ledger.balance(account)
    }

    // --- evaluation and strategy ---

    /// Scan all open orders against one fresh oracle snapshot
    pub fn run_evaluation(&mut self, now: u64) -> Result<Vec<OrderId>> {
        let snapshot = self.feed.latest_price();
        self.engine.evaluate_pass(
            now,
            snapshot,
            self.commits.orders_mut(),
            &mut self.ledger,
            self.liquidity_pool,
            &mut self.events,
        )
    }

    /// Feed the strategy one oracle observation; execute its signal, if any,
    /// as an ordinary market trade of the strategy account
    pub fn run_strategy(&mut self, now: u64) -> Result<Option<Side>> {
        let snapshot = self.feed.latest_price();
        self.engine.ensure_fresh(now, &snapshot)?;

        let Some(side) = self.strategy.observe(snapshot.price) else {
            return Ok(None);
        };

        let amount = self.strategy.config().trade_amount;
        let notional = amount * U256::from(snapshot.price.0) / U256::from(Price::SCALE);
        match side {
            Side::Buy => {
                self.ledger.debit(self.strategy_account, notional)?;
                self.ledger.credit(self.liquidity_pool, notional);
            }
            Side::Sell => {
                self.ledger.debit(self.liquidity_pool, notional)?;
                self.ledger.credit(self.strategy_account, notional);
            }
        }
        info!(?side, %amount, price = snapshot.price.0, "strategy trade executed");
        self.events.emit(Event::StrategyTradeExecuted {
            trader: self.strategy_account,
            side,
            amount,
            price: snapshot.price,
        });
        Ok(Some(side))
    }

    // --- administration ---

    /// Re-point the settlement counterparty; owner only
    pub fn set_liquidity_pool(&mut self, caller: Address, pool: Address) -> Result<()> {
        if caller != self.owner {
            return Err(DexError::Unauthorized);
        }
        info!(%pool, "liquidity pool updated");
        self.liquidity_pool = pool;
        Ok(())
    }

    pub fn liquidity_pool(&self) -> Address {
        self.liquidity_pool
    }

    /// One-shot registration with the external fee-sharing service; owner
    /// only, idempotent (repeat calls are accepted and emit nothing)
    pub fn register_with_fee_service(&mut self, caller: Address, service: Address) -> Result<()> {
        if caller != self.owner {
            return Err(DexError::Unauthorized);
        }
        if self.fee_service.is_some() {
            return Ok(());
        }
        self.fee_service = Some(service);
        info!(%service, "registered with fee service");
        self.events.emit(Event::RegisteredWithFeeService { service });
        Ok(())
    }

    pub fn fee_service(&self) -> Option<Address> {
        self.fee_service
    }

    // --- events ---

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
