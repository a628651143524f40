//! Core ledger types and rules
//!
//! This module contains account identities, the signed request types, the
//! rejection taxonomy, and the transfer admission pipeline.

pub mod identity;
pub mod policy;
pub mod rejection;
pub mod transfer;
pub mod validator;

pub use identity::{Identity, Signature, IDENTITY_LEN, SIGNATURE_LEN};
pub use policy::{QueryPolicy, TransferPolicy};
pub use rejection::RejectReason;
pub use transfer::{
    balance_signing_bytes, transfer_signing_bytes, BalanceQuery, TransferId, TransferRequest,
};
pub use validator::TransactionValidator;
