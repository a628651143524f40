//! Error handling for the ledger
//!
//! This module provides the error types shared by the node and the client.
//! `LedgerError` is the crate-wide error; `ProtocolError` describes frames that
//! could not be decoded and always ends the offending session.

use crate::core::RejectReason;
use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Reasons a frame failed to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame did not start with the protocol magic
    BadMagic([u8; 4]),
    /// Declared body length exceeds the frame limit
    FrameTooLarge { len: usize, max: usize },
    /// Stream or buffer ended in the middle of a frame
    Truncated,
    /// Enum tag outside the known variants
    UnknownTag(u32),
    /// Body decoded but bytes were left over
    TrailingBytes(usize),
    /// Any other structural decode failure
    Malformed(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::BadMagic(magic) => write!(f, "bad frame magic {magic:02x?}"),
            ProtocolError::FrameTooLarge { len, max } => {
                write!(f, "frame length {len} exceeds maximum {max}")
            }
            ProtocolError::Truncated => write!(f, "truncated frame"),
            ProtocolError::UnknownTag(tag) => write!(f, "unknown variant tag {tag}"),
            ProtocolError::TrailingBytes(n) => write!(f, "{n} trailing bytes after frame body"),
            ProtocolError::Malformed(msg) => write!(f, "malformed frame: {msg}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Error types for ledger operations
#[derive(Debug, Clone)]
pub enum LedgerError {
    /// Undecodable frame
    Protocol(ProtocolError),
    /// Transport failure (refused, reset, timed out)
    Connection(String),
    /// File I/O errors
    Io(String),
    /// Key handling and signing errors
    Crypto(String),
    /// Identity that is not 32 bytes of hex
    InvalidIdentity(String),
    /// Amount rejected before touching balances
    InvalidAmount(String),
    /// Sender balance below the requested amount
    InsufficientFunds { required: u64, available: u64 },
    /// Transfer id already committed
    DuplicateTransfer(String),
    /// Recipient balance would not fit in u64
    BalanceOverflow(String),
    /// Issuance would push the total supply past u64
    SupplyOverflow(String),
    /// Ledger state unavailable (poisoned lock)
    Storage(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// Node answered with a rejection
    Rejected(RejectReason),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Protocol(err) => write!(f, "Protocol error: {err}"),
            LedgerError::Connection(msg) => write!(f, "Connection error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::InvalidIdentity(msg) => write!(f, "Invalid identity: {msg}"),
            LedgerError::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            LedgerError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: required {required}, available {available}"
                )
            }
            LedgerError::DuplicateTransfer(id) => write!(f, "Duplicate transfer: {id}"),
            LedgerError::BalanceOverflow(msg) => write!(f, "Balance overflow: {msg}"),
            LedgerError::SupplyOverflow(msg) => write!(f, "Supply overflow: {msg}"),
            LedgerError::Storage(msg) => write!(f, "Storage error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Rejected(reason) => write!(f, "Rejected: {reason}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<ProtocolError> for LedgerError {
    fn from(err: ProtocolError) -> Self {
        LedgerError::Protocol(err)
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Protocol(ProtocolError::from(err))
    }
}

impl From<bincode::error::DecodeError> for ProtocolError {
    fn from(err: bincode::error::DecodeError) -> Self {
        use bincode::error::DecodeError;
        match err {
            DecodeError::UnexpectedEnd { .. } => ProtocolError::Truncated,
            DecodeError::UnexpectedVariant { found, .. } => ProtocolError::UnknownTag(found),
            other => ProtocolError::Malformed(other.to_string()),
        }
    }
}
