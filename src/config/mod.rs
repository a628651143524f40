//! Configuration management
//!
//! This module handles node settings: listening address, session limits,
//! transfer and query policy, and the genesis allocations that seed the
//! ledger at startup.

pub mod settings;

pub use settings::{GenesisAllocation, NodeConfig};
