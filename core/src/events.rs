use crate::types::*;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Events emitted by the core for off-chain indexers and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    CommitPlaced {
        commit_id: CommitId,
        committer: Address,
        reveal_height: Height,
    },
    OrderRevealed {
        commit_id: CommitId,
        order_id: OrderId,
        trader: Address,
        kind: OrderKind,
        amount: U256,
        price: Price,
    },
    CollateralDeposited {
        account: Address,
        amount: U256,
    },
    CollateralWithdrawn {
        account: Address,
        amount: U256,
    },
    OrderSettled {
        order_id: OrderId,
        trader: Address,
        kind: OrderKind,
        amount: U256,
        price: Price,
    },
    OrderCancelled {
        order_id: OrderId,
        trader: Address,
    },
    /// Distinct from OrderSettled: tags the trade as strategy-originated
    StrategyTradeExecuted {
        trader: Address,
        side: Side,
        amount: U256,
        price: Price,
    },
    RegisteredWithFeeService {
        service: Address,
    },
}

/// Append-only event log
///
/// The core only ever pushes; consumers either drain (tests, relays) or
/// iterate in emission order (indexers).
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Remove and return all pending events, oldest first
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
