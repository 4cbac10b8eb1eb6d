use crate::error::{DexError, Result};
use crate::events::{Event, EventLog};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-account collateral accounting with solvency enforcement
///
/// Accounts are created implicitly on first deposit and never deleted; a
/// balance can return to zero but never go negative. Each debit performs its
/// own solvency check at the moment it executes — balances are never
/// pre-computed and reused across operations.
#[derive(Debug, Default)]
pub struct CollateralLedger {
    balances: HashMap<Address, U256>,
}

impl CollateralLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Current balance, zero for unknown accounts
    pub fn balance(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    /// Credit the caller's account
    ///
    /// A zero deposit is a no-op: the value-transfer collaborator never
    /// delivers one, so there is nothing to record and no event to emit.
    pub fn deposit(&mut self, account: Address, amount: U256, events: &mut EventLog) {
        if amount == U256::ZERO {
            return;
        }
        let balance = self.balances.entry(account).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
        debug!(%account, %amount, "collateral deposited");
        events.emit(Event::CollateralDeposited { account, amount });
    }

    /// Debit the caller's account and release the value back to them
    pub fn withdraw(&mut self, account: Address, amount: U256, events: &mut EventLog) -> Result<()> {
        self.debit(account, amount)?;
        debug!(%account, %amount, "collateral withdrawn");
        events.emit(Event::CollateralWithdrawn { account, amount });
        Ok(())
    }

    /// Settlement-leg debit: fails atomically if it would drive the balance
    /// negative, leaving the balance untouched
    pub(crate) fn debit(&mut self, account: Address, amount: U256) -> Result<()> {
        let balance = self.balances.entry(account).or_insert(U256::ZERO);
        if *balance < amount {
            warn!(%account, requested = %amount, available = %balance, "debit exceeds balance");
            return Err(DexError::InsufficientCollateral {
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    /// Settlement-leg credit
    pub(crate) fn credit(&mut self, account: Address, amount: U256) {
        let balance = self.balances.entry(account).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
    }
}
