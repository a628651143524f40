use serde::Serialize;
use std::fmt;

/// Client-visible reason a request was refused.
///
/// Every validation stage maps to its own variant so operators can tell
/// failures apart without reading node logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, bincode::Encode, bincode::Decode)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Transfer amount was zero
    ZeroAmount,
    /// Sender and recipient are the same identity
    SelfTransferRejected,
    /// Signature does not verify for the exact request bytes
    InvalidSignature,
    /// Sender balance below the requested amount at commit time
    InsufficientFunds { available: u64, requested: u64 },
    /// This exact signed transfer was already committed
    DuplicateTransfer,
    /// Recipient balance would exceed the representable maximum
    BalanceOverflow,
    /// Balance query lacked a valid ownership proof
    Unauthorized,
    /// Frame could not be decoded; the session is closing
    ProtocolViolation,
    /// Session limit reached; the connection is closing
    ServerBusy,
    /// Node-side fault unrelated to the request
    Internal,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ZeroAmount => write!(f, "amount must be positive"),
            RejectReason::SelfTransferRejected => write!(f, "self-transfer rejected"),
            RejectReason::InvalidSignature => write!(f, "invalid signature"),
            RejectReason::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient funds: requested {requested}, available {available}"
            ),
            RejectReason::DuplicateTransfer => write!(f, "duplicate transfer"),
            RejectReason::BalanceOverflow => write!(f, "recipient balance overflow"),
            RejectReason::Unauthorized => write!(f, "unauthorized balance query"),
            RejectReason::ProtocolViolation => write!(f, "protocol violation"),
            RejectReason::ServerBusy => write!(f, "server busy"),
            RejectReason::Internal => write!(f, "internal node error"),
        }
    }
}
