//! Account state
//!
//! This module holds the in-memory ledger: the table of identity to balance,
//! the set of committed transfer ids, and the atomic operations over both.
//! State lives for the lifetime of the node process.

pub mod ledger;

pub use ledger::LedgerStore;
