use crate::config::NodeConfig;
use crate::core::{BalanceQuery, QueryPolicy, RejectReason, TransactionValidator, TransferRequest};
use crate::error::Result;
use crate::network::protocol::{Request, Response};
use crate::storage::LedgerStore;
use log::{error, info};
use std::sync::Arc;

/// Request dispatcher shared by every session.
///
/// Sessions reach the ledger only through `handle`, which never panics and
/// never returns an error: every failure becomes a `Response::Reject`.
#[derive(Debug)]
pub struct LedgerService {
    ledger: Arc<LedgerStore>,
    validator: TransactionValidator,
    query_policy: QueryPolicy,
}

impl LedgerService {
    pub fn new(
        ledger: Arc<LedgerStore>,
        validator: TransactionValidator,
        query_policy: QueryPolicy,
    ) -> Self {
        Self {
            ledger,
            validator,
            query_policy,
        }
    }

    /// Fresh ledger seeded with the configured genesis allocations
    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        let ledger = Arc::new(LedgerStore::new());
        for allocation in &config.genesis {
            ledger.credit(&allocation.identity, allocation.balance)?;
        }
        info!(
            "Ledger initialized with {} genesis allocations, total supply {}",
            config.genesis.len(),
            ledger.total_supply()?
        );

        Ok(Self::new(
            ledger,
            TransactionValidator::new(config.transfer_policy()),
            config.query_policy,
        ))
    }

    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Transfer(tx) => self.handle_transfer(&tx),
            Request::BalanceQuery(query) => self.handle_balance_query(&query),
        }
    }

    fn handle_transfer(&self, tx: &TransferRequest) -> Response {
        match self.validator.admit(&self.ledger, tx) {
            Ok(new_sender_balance) => {
                info!(
                    "Transfer {} committed: {} -> {} amount {}",
                    tx.id(),
                    tx.sender,
                    tx.recipient,
                    tx.amount
                );
                Response::Ack { new_sender_balance }
            }
            Err(reason) => {
                info!("Transfer from {} rejected: {reason}", tx.sender);
                Response::Reject(reason)
            }
        }
    }

    fn handle_balance_query(&self, query: &BalanceQuery) -> Response {
        if !self.query_policy.permits(query) {
            info!("Balance query for {} refused by policy", query.identity);
            return Response::Reject(RejectReason::Unauthorized);
        }

        match self.ledger.get_balance(&query.identity) {
            Ok(balance) => Response::BalanceReply { balance },
            Err(e) => {
                error!("Ledger fault while reading {}: {e}", query.identity);
                Response::Reject(RejectReason::Internal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenesisAllocation;
    use crate::testnet::{test_identity, test_service, test_wallet};

    #[test]
    fn test_transfer_then_balance() {
        let alice = test_wallet(1);
        let bob = test_wallet(2);
        let service = test_service(&[(alice.identity(), 100)]);

        let tx = TransferRequest::new_signed(&alice, bob.identity(), 30, 1).unwrap();
        assert_eq!(
            service.handle(Request::Transfer(tx)),
            Response::Ack {
                new_sender_balance: 70
            }
        );
        assert_eq!(
            service.handle(Request::BalanceQuery(BalanceQuery::public(bob.identity()))),
            Response::BalanceReply { balance: 30 }
        );
    }

    #[test]
    fn test_unknown_identity_balance_is_zero() {
        let service = test_service(&[]);
        let response =
            service.handle(Request::BalanceQuery(BalanceQuery::public(test_identity(77))));
        assert_eq!(response, Response::BalanceReply { balance: 0 });
        assert_eq!(service.ledger().account_count().unwrap(), 0);
    }

    #[test]
    fn test_owner_only_policy() {
        let alice = test_wallet(1);
        let ledger = Arc::new(LedgerStore::new());
        ledger.credit(&alice.identity(), 5).unwrap();
        let service = LedgerService::new(
            ledger,
            TransactionValidator::default(),
            QueryPolicy::OwnerOnly,
        );

        let public = Request::BalanceQuery(BalanceQuery::public(alice.identity()));
        assert_eq!(
            service.handle(public),
            Response::Reject(RejectReason::Unauthorized)
        );

        let owned = Request::BalanceQuery(BalanceQuery::owned(&alice).unwrap());
        assert_eq!(service.handle(owned), Response::BalanceReply { balance: 5 });
    }

    #[test]
    fn test_from_config_applies_genesis() {
        let config = NodeConfig {
            genesis: vec![
                GenesisAllocation {
                    identity: test_identity(1),
                    balance: 40,
                },
                GenesisAllocation {
                    identity: test_identity(2),
                    balance: 2,
                },
            ],
            ..NodeConfig::default()
        };
        let service = LedgerService::from_config(&config).unwrap();
        assert_eq!(service.ledger().total_supply().unwrap(), 42);
        assert_eq!(service.ledger().get_balance(&test_identity(1)).unwrap(), 40);
    }
}
