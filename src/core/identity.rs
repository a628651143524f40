// Account identities and signatures as they appear on the wire and at the CLI
use crate::error::{LedgerError, Result};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use std::fmt;
use std::str::FromStr;

/// Length of an identity (Ed25519 public key) in bytes
pub const IDENTITY_LEN: usize = 32;

/// Length of an Ed25519 signature in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Public key of an account; doubles as its address.
///
/// There is no account-creation step: any 32-byte value is a valid identity and
/// its balance is zero until credited.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(pub [u8; IDENTITY_LEN]);

impl Identity {
    pub fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Identity(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Parse a 64-character hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.trim().as_bytes())
            .map_err(|e| LedgerError::InvalidIdentity(format!("{hex}: {e}")))?;
        let bytes: [u8; IDENTITY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            LedgerError::InvalidIdentity(format!(
                "expected {IDENTITY_LEN} bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Identity(bytes))
    }

    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Identity::from_hex(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Identity::from_hex(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_hex()
    }
}

/// Ed25519 signature bytes
#[derive(Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Signature(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // prefix is enough to tell signatures apart in logs
        write!(f, "Signature({}..)", HEXLOWER.encode(&self.0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let identity = Identity([0xab; IDENTITY_LEN]);
        let hex = identity.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Identity::from_hex(&hex).unwrap(), identity);
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let identity = Identity::from_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(identity, Identity([0xab; IDENTITY_LEN]));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result = Identity::from_hex(&"ab".repeat(31));
        assert!(matches!(result, Err(LedgerError::InvalidIdentity(_))));
    }

    #[test]
    fn test_non_hex_rejected() {
        let result = Identity::from_hex(&"zz".repeat(32));
        assert!(matches!(result, Err(LedgerError::InvalidIdentity(_))));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        #[derive(serde::Deserialize)]
        struct Holder {
            identity: Identity,
        }

        let toml = format!("identity = \"{}\"", "01".repeat(32));
        let holder: Holder = toml::from_str(&toml).unwrap();
        assert_eq!(holder.identity, Identity([1; IDENTITY_LEN]));
    }
}
