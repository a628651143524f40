use crate::core::BalanceQuery;
use serde::Deserialize;

/// Structural rules applied before any signature or balance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferPolicy {
    pub allow_self_transfer: bool,
}

/// Who may read a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryPolicy {
    /// Any identity's balance is disclosed to anyone
    #[default]
    Public,
    /// Only a query signed by the queried identity is answered
    OwnerOnly,
}

impl QueryPolicy {
    pub fn permits(&self, query: &BalanceQuery) -> bool {
        match self {
            QueryPolicy::Public => true,
            QueryPolicy::OwnerOnly => query.has_valid_proof(),
        }
    }
}
