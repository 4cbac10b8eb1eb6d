use crate::auth::{commitment_digest, encode_order_message, RecoverableSignature, SignatureVerifier};
use crate::error::{DexError, Result};
use crate::events::{Event, EventLog};
use crate::types::*;
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Blocks between commit and earliest reveal, bounding how fast a committer
/// can react to intervening activity
pub const DEFAULT_REVEAL_DELAY: Height = 10;

/// Commit-reveal order protocol
///
/// Commits live in an append-only arena indexed by sequence id; orders share
/// that id space, so commit `n` reveals to order `n` or to nothing. Neither
/// is ever deleted — status flags flip exactly once.
pub struct CommitBook {
    commits: Vec<Commit>,
    orders: BTreeMap<OrderId, Order>,
    reveal_delay: Height,
    verifier: Box<dyn SignatureVerifier>,
}

impl CommitBook {
    pub fn new(reveal_delay: Height, verifier: Box<dyn SignatureVerifier>) -> Self {
        Self {
            commits: Vec::new(),
            orders: BTreeMap::new(),
            reveal_delay,
            verifier,
        }
    }

    /// Record a hidden commitment
    ///
    /// The digest is accepted as-is: its contents are hidden until reveal, so
    /// there is nothing to validate here.
    pub fn place_commit(
        &mut self,
        committer: Address,
        commitment: [u8; 32],
        height: Height,
        events: &mut EventLog,
    ) -> CommitId {
        let id = self.commits.len() as CommitId;
        let reveal_height = height + self.reveal_delay;
        self.commits.push(Commit {
            id,
            committer,
            commitment,
            reveal_height,
            revealed: false,
        });
        info!(
            commit_id = id,
            %committer,
            reveal_height,
            commitment = %hex::encode(commitment),
            "commit placed"
        );
        events.emit(Event::CommitPlaced {
            commit_id: id,
            committer,
            reveal_height,
        });
        id
    }

    /// Reveal the order behind a commitment
    ///
    /// Validation order: reveal window, single-reveal, digest match, then
    /// signature. Each rejection leaves the commit untouched.
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
        height: Height,
        events: &mut EventLog,
    ) -> Result<OrderId> {
        let commit = self
            .commits
            .get(commit_id as usize)
            .ok_or(DexError::OrderNotFound(commit_id))?;

        if height < commit.reveal_height {
            return Err(DexError::NotYetRevealable {
                commit_id,
                reveal_height: commit.reveal_height,
                current: height,
            });
        }
        if commit.revealed {
            return Err(DexError::AlreadyRevealed(commit_id));
        }
        if commitment_digest(revealer, amount, price, kind) != commit.commitment {
            debug!(commit_id, %revealer, "revealed parameters do not hash to commitment");
            return Err(DexError::CommitmentMismatch(commit_id));
        }
        let message = encode_order_message(revealer, amount, price, kind);
        if !self.verifier.verify(revealer, &message, signature) {
            return Err(DexError::BadSignature);
        }

        // all gates passed; transition is committed from here on
        self.commits[commit_id as usize].revealed = true;
        let order_id = commit_id;
        self.orders.insert(
            order_id,
            Order {
                id: order_id,
                trader: revealer,
                kind,
                side,
                amount,
                price,
                active: true,
            },
        );
        info!(commit_id, order_id, trader = %revealer, ?kind, ?side, "order revealed");
        events.emit(Event::OrderRevealed {
            commit_id,
            order_id,
            trader: revealer,
            kind,
            amount,
            price,
        });
        Ok(order_id)
    }

    /// Deactivate the caller's own open order
    pub fn cancel_order(
        &mut self,
        order_id: OrderId,
        caller: Address,
        events: &mut EventLog,
    ) -> Result<()> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(DexError::OrderNotFound(order_id))?;
        if order.trader != caller {
            return Err(DexError::Unauthorized);
        }
        if !order.active {
            return Err(DexError::OrderAlreadyInactive(order_id));
        }
        order.active = false;
        info!(order_id, trader = %caller, "order cancelled");
        events.emit(Event::OrderCancelled {
            order_id,
            trader: caller,
        });
        Ok(())
    }

    pub fn commit(&self, id: CommitId) -> Option<&Commit> {
        self.commits.get(id as usize)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// All revealed orders, ascending id (BTreeMap iteration order)
    pub(crate) fn orders_mut(&mut self) -> &mut BTreeMap<OrderId, Order> {
        &mut self.orders
    }

    pub fn open_order_count(&self) -> usize {
        self.orders.values().filter(|o| o.active).count()
    }
}
