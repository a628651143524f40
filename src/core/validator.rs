//! Transfer admission pipeline
//!
//! Each stage returns a tagged result and the pipeline stops at the first
//! failure, so every rejection reason stays distinct:
//!
//! 1. structure: positive amount, sender differs from recipient (policy)
//! 2. signature: the sender signed exactly these fields
//! 3. funds: delegated to the ledger's atomic commit, which also refuses replays
//!
//! Nothing is mutated unless all three stages pass.

use crate::core::{RejectReason, TransferPolicy, TransferRequest};
use crate::error::LedgerError;
use crate::storage::LedgerStore;
use log::{error, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionValidator {
    policy: TransferPolicy,
}

impl TransactionValidator {
    pub fn new(policy: TransferPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransferPolicy {
        self.policy
    }

    pub fn check_structure(&self, tx: &TransferRequest) -> Result<(), RejectReason> {
        if tx.amount == 0 {
            return Err(RejectReason::ZeroAmount);
        }
        if tx.sender == tx.recipient && !self.policy.allow_self_transfer {
            return Err(RejectReason::SelfTransferRejected);
        }
        Ok(())
    }

    pub fn check_signature(&self, tx: &TransferRequest) -> Result<(), RejectReason> {
        if tx.verify_signature() {
            Ok(())
        } else {
            Err(RejectReason::InvalidSignature)
        }
    }

    /// Runs the whole pipeline and commits on success, returning the sender's new balance
    pub fn admit(&self, ledger: &LedgerStore, tx: &TransferRequest) -> Result<u64, RejectReason> {
        self.check_structure(tx)?;
        self.check_signature(tx)?;

        let id = tx.id();
        ledger
            .commit_transfer(&id, &tx.sender, &tx.recipient, tx.amount)
            .map_err(|e| {
                let reason = reject_reason_for(&e, tx.amount);
                if reason == RejectReason::Internal {
                    error!("Ledger fault while committing transfer {id}: {e}");
                } else {
                    info!("Transfer {id} refused by ledger: {e}");
                }
                reason
            })
    }
}

fn reject_reason_for(err: &LedgerError, requested: u64) -> RejectReason {
    match err {
        LedgerError::InsufficientFunds { available, .. } => RejectReason::InsufficientFunds {
            available: *available,
            requested,
        },
        LedgerError::DuplicateTransfer(_) => RejectReason::DuplicateTransfer,
        LedgerError::BalanceOverflow(_) => RejectReason::BalanceOverflow,
        LedgerError::InvalidAmount(_) => RejectReason::ZeroAmount,
        _ => RejectReason::Internal,
    }
}
