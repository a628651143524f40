//! # Simple Ledger - My Single-Node Ledger Service
//!
//! A node that keeps account balances in memory and a client that signs
//! transfers and balance queries and sends them over TCP.
//! When I come back to this code, here's what I need to remember:
//!
//! ## What I Built
//! - **Ledger Store**: one lock around every balance, so value is conserved under concurrency
//! - **Signed Transfers**: Ed25519 over a canonical byte string with a replay nonce
//! - **Wire Protocol**: magic + length framed bincode, one response per request
//! - **Sessions**: a thread per connection, a bad frame only kills its own session
//!
//! ## How I Organized My Code
//! - `core/`: identities, signed requests, policies, rejection reasons, the validator
//! - `storage/`: the in-memory ledger
//! - `network/`: framing, sessions, the server and the client
//! - `wallet/`: the client's signing key
//! - `config/`: node settings and genesis allocations
//! - `utils/`: crypto primitives and wire serialization
//! - `cli/`: argument parsing for both binaries
//!
//! ## When I Need to Understand Something
//! 1. Start with `network/session.rs` for the per-connection loop
//! 2. `core/validator.rs` has the order transfer checks run in
//! 3. `storage/ledger.rs` is where balances actually move

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{ClientAction, ClientOpt, NodeOpt};
pub use config::{GenesisAllocation, NodeConfig};
pub use core::{
    BalanceQuery, Identity, QueryPolicy, RejectReason, Signature, TransactionValidator,
    TransferId, TransferPolicy, TransferRequest,
};
pub use error::{LedgerError, ProtocolError, Result};
pub use network::{
    LedgerClient, LedgerService, Request, Response, Server, ServerHandle, CLIENT_TIMEOUT,
};
pub use storage::LedgerStore;
pub use wallet::Wallet;
