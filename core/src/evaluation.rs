use crate::collateral::CollateralLedger;
use crate::error::{DexError, Result};
use crate::events::{Event, EventLog};
use crate::types::*;
use alloy_primitives::Address;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Condition engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum acceptable age of a price snapshot (ledger-time units);
    /// evaluation against anything older is rejected outright
    pub max_snapshot_age: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_snapshot_age: 60,
        }
    }
}

/// Decides which open orders execute at the current oracle price and settles
/// them against the liquidity pool
#[derive(Debug, Clone, Default)]
pub struct ConditionEngine {
    config: EngineConfig,
}

impl ConditionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Reject snapshots older than the configured bound
    pub fn ensure_fresh(&self, now: u64, snapshot: &PriceSnapshot) -> Result<()> {
        let age = now.saturating_sub(snapshot.updated_at);
        if age > self.config.max_snapshot_age {
            return Err(DexError::StalePrice {
                age,
                max_age: self.config.max_snapshot_age,
            });
        }
        Ok(())
    }

    /// Eligibility at price `p`, exhaustive over (kind, side)
    ///
    /// Limit executes when `p` is at least as favorable as the limit price:
    /// buy at or below, sell at or above. StopLoss fires when `p` crosses the
    /// trigger against the position it protects: a sell stop guards a long
    /// and fires at or below, a buy stop guards a short and fires at or
    /// above.
    pub fn is_eligible(order: &Order, p: Price) -> bool {
        match (order.kind, order.side) {
            (OrderKind::Market, _) => true,
            (OrderKind::Limit, Side::Buy) => p <= order.price,
            (OrderKind::Limit, Side::Sell) => p >= order.price,
            (OrderKind::StopLoss, Side::Sell) => p <= order.price,
            (OrderKind::StopLoss, Side::Buy) => p >= order.price,
        }
    }

    /// One evaluation pass over all open orders
    ///
    /// Uses the single `snapshot` for every order and walks ascending order
    /// id, so outcomes are deterministic and auditable. Idempotent: inactive
    /// orders are skipped. A settlement leg that fails its solvency check
    /// leaves the order open for a later pass; that is normal control flow,
    /// not an error of the pass.
    pub fn evaluate_pass(
        &self,
        now: u64,
        snapshot: PriceSnapshot,
        orders: &mut BTreeMap<OrderId, Order>,
        ledger: &mut CollateralLedger,
        pool: Address,
        events: &mut EventLog,
    ) -> Result<Vec<OrderId>> {
        self.ensure_fresh(now, &snapshot)?;

        let mut settled = Vec::new();
        for order in orders.values_mut() {
            if !order.active {
                continue;
            }
            if !Self::is_eligible(order, snapshot.price) {
                continue;
            }

            let notional = order.notional(snapshot.price);
            let leg = match order.side {
                // buyer pays the pool, pool pays the seller
                Side::Buy => ledger
                    .debit(order.trader, notional)
                    .map(|()| ledger.credit(pool, notional)),
                Side::Sell => ledger
                    .debit(pool, notional)
                    .map(|()| ledger.credit(order.trader, notional)),
            };
            if let Err(err) = leg {
                // recoverable: the order stays open and retries next pass
                warn!(order_id = order.id, %err, "settlement leg skipped");
                continue;
            }

            order.active = false;
            info!(
                order_id = order.id,
                trader = %order.trader,
                kind = ?order.kind,
                price = snapshot.price.0,
                "order settled"
            );
            events.emit(Event::OrderSettled {
                order_id: order.id,
                trader: order.trader,
                kind: order.kind,
                amount: order.amount,
                price: snapshot.price,
            });
            settled.push(order.id);
        }

        debug!(settled = settled.len(), price = snapshot.price.0, "evaluation pass complete");
        Ok(settled)
    }
}
