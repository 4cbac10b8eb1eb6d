use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Unique commit identifier (position in the append-only commit arena)
pub type CommitId = u64;

/// Unique order identifier
///
/// Orders share the commit id space: a revealed commit materializes an order
/// under the same sequence number, so one commit yields at most one order.
pub type OrderId = u64;

/// Ledger height (external sequencing unit, e.g. block number)
pub type Height = u64;

/// Price in fixed-point representation (8 decimals, oracle precision)
/// Example: 100_000_000_000 = $1000.00
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub u64);

impl Price {
    pub const DECIMALS: u32 = 8;
    pub const SCALE: u64 = 100_000_000;

    pub fn from_float(price: f64) -> Self {
        Self((price * Self::SCALE as f64) as u64)
    }

    pub fn to_float(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Executes at the current oracle price as soon as it is open
    Market,
    /// Executes when the oracle price is at least as favorable as the limit
    Limit,
    /// Executes when the oracle price crosses the trigger against the position
    StopLoss,
}

impl OrderKind {
    /// Wire discriminant used in the canonical signing/commitment encoding
    pub fn discriminant(&self) -> u64 {
        match self {
            OrderKind::Market => 0,
            OrderKind::Limit => 1,
            OrderKind::StopLoss => 2,
        }
    }
}

/// A hidden order commitment
///
/// Append-only: commits are never deleted, only flagged as revealed, so the
/// arena doubles as an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub committer: Address,
    /// keccak256 digest of the canonical order message; opaque until reveal
    pub commitment: [u8; 32],
    /// Earliest height at which the commit may be revealed
    pub reveal_height: Height,
    pub revealed: bool,
}

/// A revealed, authenticated order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: Address,
    pub kind: OrderKind,
    pub side: Side,
    /// Size in base asset units
    pub amount: U256,
    /// Limit or trigger price; execution reference for market orders
    pub price: Price,
    /// Cleared exactly once, at settlement or cancellation
    pub active: bool,
}

impl Order {
    /// Notional value at `price`: amount * price / SCALE, truncating
    pub fn notional(&self, price: Price) -> U256 {
        self.amount * U256::from(price.0) / U256::from(Price::SCALE)
    }
}

/// Oracle price observation, consumed at evaluation time and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: Price,
    /// Ledger-time of the oracle's last update
    pub updated_at: u64,
}
