//! Utility functions and helpers
//!
//! This module contains the cryptographic primitives and the wire
//! serialization helpers used by both the node and the client.

pub mod crypto;
pub mod serialization;

pub use crypto::{ed25519_public_key, ed25519_sign, ed25519_verify, new_seed, sha256_digest};

pub use serialization::{deserialize, serialize, wire_config};
