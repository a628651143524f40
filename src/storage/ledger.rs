use crate::core::{Identity, TransferId};
use crate::error::{LedgerError, Result};
use log::info;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<Identity, u64>,
    /// Sum of all balances; only `credit` changes it
    total_supply: u64,
    applied: HashSet<TransferId>,
}

impl LedgerState {
    fn balance(&self, identity: &Identity) -> u64 {
        self.balances.get(identity).copied().unwrap_or(0)
    }

    // Caller holds the write lock. Every check happens before the first write.
    fn transfer(&mut self, sender: &Identity, recipient: &Identity, amount: u64) -> Result<u64> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(
                "Transfer amount must be positive".to_string(),
            ));
        }

        let available = self.balance(sender);
        let new_sender_balance = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                required: amount,
                available,
            })?;

        if sender == recipient {
            return Ok(available);
        }

        let new_recipient_balance = self
            .balance(recipient)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(recipient.to_hex()))?;

        self.balances.insert(*sender, new_sender_balance);
        self.balances.insert(*recipient, new_recipient_balance);
        Ok(new_sender_balance)
    }
}

/// Owner of every balance on the node.
///
/// All mutation goes through one `RwLock`: transfers and credits take the write
/// lock for their whole read-check-write sequence, reads take the read lock. A
/// reader therefore sees a transfer either fully applied or not at all. No I/O
/// happens while the lock is held.
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: RwLock<LedgerState>,
}

impl LedgerStore {
    pub fn new() -> LedgerStore {
        LedgerStore::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire ledger read lock: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.inner
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire ledger write lock: {e}")))
    }

    /// Balance of `identity`, zero if it was never credited. Creates no entry.
    pub fn get_balance(&self, identity: &Identity) -> Result<u64> {
        Ok(self.read()?.balance(identity))
    }

    /// Balances of several identities read under one lock, so they are mutually consistent
    pub fn get_balances(&self, identities: &[Identity]) -> Result<Vec<u64>> {
        let state = self.read()?;
        Ok(identities.iter().map(|id| state.balance(id)).collect())
    }

    /// Move `amount` from `sender` to `recipient` as one indivisible step.
    ///
    /// Returns the sender's new balance. On any error nothing changes.
    pub fn try_transfer(&self, sender: &Identity, recipient: &Identity, amount: u64) -> Result<u64> {
        self.write()?.transfer(sender, recipient, amount)
    }

    /// `try_transfer` that also refuses an id it has already committed.
    ///
    /// The id is recorded in the same critical section as the balance change,
    /// so two racing copies of one request cannot both succeed.
    pub fn commit_transfer(
        &self,
        id: &TransferId,
        sender: &Identity,
        recipient: &Identity,
        amount: u64,
    ) -> Result<u64> {
        let mut state = self.write()?;
        if state.applied.contains(id) {
            return Err(LedgerError::DuplicateTransfer(id.to_string()));
        }
        let new_sender_balance = state.transfer(sender, recipient, amount)?;
        state.applied.insert(*id);
        Ok(new_sender_balance)
    }

    /// Issue new value to `identity`. This is the only way the total supply grows.
    pub fn credit(&self, identity: &Identity, amount: u64) -> Result<u64> {
        let mut state = self.write()?;
        let total_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| LedgerError::SupplyOverflow(format!("crediting {amount}")))?;
        // bounded by total_supply, which just fit
        let new_balance = state.balance(identity) + amount;
        state.balances.insert(*identity, new_balance);
        state.total_supply = total_supply;
        drop(state);

        info!("Credited {amount} to {identity}, balance now {new_balance}");
        Ok(new_balance)
    }

    pub fn total_supply(&self) -> Result<u64> {
        Ok(self.read()?.total_supply)
    }

    /// Sum of balances computed from the table itself
    pub fn sum_of_balances(&self) -> Result<u128> {
        Ok(self
            .read()?
            .balances
            .values()
            .map(|balance| u128::from(*balance))
            .sum())
    }

    pub fn account_count(&self) -> Result<usize> {
        Ok(self.read()?.balances.len())
    }

    pub fn applied_transfers(&self) -> Result<usize> {
        Ok(self.read()?.applied.len())
    }

    pub fn is_applied(&self, id: &TransferId) -> Result<bool> {
        Ok(self.read()?.applied.contains(id))
    }
}
