//! Fixtures shared by the unit tests: deterministic wallets, funded ledgers
//! and a node config bound to an ephemeral port.

pub mod test_utils;

pub use test_utils::*;
