use crate::types::{CommitId, Height, OrderId};
use alloy_primitives::U256;
use thiserror::Error;

/// Rejection taxonomy for the settlement core
///
/// Every variant is recoverable from the caller's perspective: a rejected
/// operation leaves all shared state unchanged and reports the specific
/// reason. Retry policy belongs to the caller, not the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DexError {
    #[error("commit {commit_id} not revealable until height {reveal_height}, current {current}")]
    NotYetRevealable {
        commit_id: CommitId,
        reveal_height: Height,
        current: Height,
    },

    #[error("commit {0} already revealed")]
    AlreadyRevealed(CommitId),

    #[error("revealed parameters do not match commitment for commit {0}")]
    CommitmentMismatch(CommitId),

    #[error("signature does not authenticate the claimed trader")]
    BadSignature,

    #[error("insufficient collateral: requested {requested}, available {available}")]
    InsufficientCollateral { requested: U256, available: U256 },

    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {0} is already inactive")]
    OrderAlreadyInactive(OrderId),

    #[error("price snapshot is stale: age {age} exceeds bound {max_age}")]
    StalePrice { age: u64, max_age: u64 },
}

pub type Result<T> = std::result::Result<T, DexError>;
