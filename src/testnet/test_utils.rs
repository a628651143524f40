//! Test utilities for ledger testing

use crate::config::NodeConfig;
use crate::core::{Identity, QueryPolicy, TransactionValidator};
use crate::network::{LedgerService, Server, ServerHandle};
use crate::storage::LedgerStore;
use crate::wallet::Wallet;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Deterministic wallet whose seed is `n` repeated
pub fn test_wallet(n: u8) -> Wallet {
    Wallet::from_seed(&[n; 32]).unwrap()
}

/// Identity of `test_wallet(n)`
pub fn test_identity(n: u8) -> Identity {
    test_wallet(n).identity()
}

/// Ledger credited with each `(identity, balance)` pair
pub fn funded_ledger(accounts: &[(Identity, u64)]) -> LedgerStore {
    let ledger = LedgerStore::new();
    for (identity, balance) in accounts {
        ledger.credit(identity, *balance).unwrap();
    }
    ledger
}

/// Service over a funded ledger with default policies
pub fn test_service(accounts: &[(Identity, u64)]) -> LedgerService {
    LedgerService::new(
        Arc::new(funded_ledger(accounts)),
        TransactionValidator::default(),
        QueryPolicy::default(),
    )
}

/// Node config listening on an ephemeral localhost port
pub fn test_node_config() -> NodeConfig {
    NodeConfig {
        socket: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        ..NodeConfig::default()
    }
}

/// In-process node on an ephemeral port, funded with `accounts`
pub fn spawn_test_server(accounts: &[(Identity, u64)]) -> ServerHandle {
    Server::bind(&test_node_config(), test_service(accounts))
        .unwrap()
        .spawn()
        .unwrap()
}
