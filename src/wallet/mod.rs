//! Key management and signing
//!
//! This module wraps the Ed25519 key pair a client signs requests with.

#[allow(clippy::module_inception)]
pub mod wallet;

pub use wallet::Wallet;
