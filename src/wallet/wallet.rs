use crate::core::{Identity, Signature, IDENTITY_LEN};
use crate::error::{LedgerError, Result};
use crate::utils::crypto::{ed25519_key_pair, new_seed, SEED_LEN};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use ring::signature::{Ed25519KeyPair, KeyPair};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Ed25519 signing key held only in process memory.
///
/// The seed is wiped when the wallet is dropped.
#[derive(ZeroizeOnDrop)]
pub struct Wallet {
    seed: [u8; SEED_LEN],
    #[zeroize(skip)]
    key_pair: Ed25519KeyPair,
    #[zeroize(skip)]
    identity: Identity,
}

impl Wallet {
    /// Create a wallet with a fresh random key
    pub fn generate() -> Result<Wallet> {
        let seed = Zeroizing::new(new_seed()?);
        Wallet::from_seed(&seed)
    }

    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Result<Wallet> {
        let key_pair = ed25519_key_pair(seed)?;
        let mut public_key = [0u8; IDENTITY_LEN];
        public_key.copy_from_slice(key_pair.public_key().as_ref());
        Ok(Wallet {
            seed: *seed,
            key_pair,
            identity: Identity(public_key),
        })
    }

    /// Load a wallet from the 64-character hex seed given on the command line
    pub fn from_hex(hex: &str) -> Result<Wallet> {
        let mut bytes = HEXLOWER_PERMISSIVE
            .decode(hex.trim().as_bytes())
            .map_err(|e| LedgerError::Crypto(format!("Private key is not valid hex: {e}")))?;
        if bytes.len() != SEED_LEN {
            let len = bytes.len();
            bytes.zeroize();
            return Err(LedgerError::Crypto(format!(
                "Private key must be {SEED_LEN} bytes, got {len}"
            )));
        }
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        seed.copy_from_slice(&bytes);
        bytes.zeroize();
        Wallet::from_seed(&seed)
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let signature = self.key_pair.sign(message);
        let bytes = signature
            .as_ref()
            .try_into()
            .map_err(|_| LedgerError::Crypto("Unexpected signature length".to_string()))?;
        Ok(Signature(bytes))
    }

    /// Hex seed for handing to the operator; treat the result as a secret
    pub fn seed_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(HEXLOWER.encode(&self.seed))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("identity", &self.identity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ed25519_verify;

    #[test]
    fn test_hex_seed_round_trip() {
        let wallet = Wallet::generate().unwrap();
        let restored = Wallet::from_hex(&wallet.seed_hex()).unwrap();
        assert_eq!(wallet.identity(), restored.identity());
    }

    #[test]
    fn test_signature_verifies_against_identity() {
        let wallet = Wallet::from_seed(&[3u8; SEED_LEN]).unwrap();
        let signature = wallet.sign(b"hello").unwrap();
        assert!(ed25519_verify(
            wallet.identity().as_bytes(),
            signature.as_bytes(),
            b"hello"
        ));
    }

    #[test]
    fn test_bad_key_rejected() {
        assert!(matches!(
            Wallet::from_hex("not-hex"),
            Err(LedgerError::Crypto(_))
        ));
        assert!(matches!(
            Wallet::from_hex(&"ab".repeat(16)),
            Err(LedgerError::Crypto(_))
        ));
    }

    #[test]
    fn test_debug_hides_seed() {
        let wallet = Wallet::from_seed(&[5u8; SEED_LEN]).unwrap();
        let debug = format!("{wallet:?}");
        assert!(!debug.contains(&HEXLOWER.encode(&[5u8; SEED_LEN])));
    }
}
