use ring::digest::{Context, SHA256};
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{Ed25519KeyPair, KeyPair, UnparsedPublicKey, ED25519};

use crate::error::{LedgerError, Result};

/// Length of an Ed25519 seed (private key) in bytes
pub const SEED_LEN: usize = 32;

pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_ref());
    out
}

/// Fresh random seed from the system CSPRNG
pub fn new_seed() -> Result<[u8; SEED_LEN]> {
    let rng = SystemRandom::new();
    let mut seed = [0u8; SEED_LEN];
    rng.fill(&mut seed)
        .map_err(|e| LedgerError::Crypto(format!("Failed to generate seed: {e}")))?;
    Ok(seed)
}

pub fn ed25519_key_pair(seed: &[u8]) -> Result<Ed25519KeyPair> {
    Ed25519KeyPair::from_seed_unchecked(seed)
        .map_err(|e| LedgerError::Crypto(format!("Failed to create key pair from seed: {e}")))
}

pub fn ed25519_public_key(seed: &[u8]) -> Result<[u8; 32]> {
    let key_pair = ed25519_key_pair(seed)?;
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(key_pair.public_key().as_ref());
    Ok(public_key)
}

pub fn ed25519_sign(seed: &[u8], message: &[u8]) -> Result<[u8; 64]> {
    let key_pair = ed25519_key_pair(seed)?;
    let mut signature = [0u8; 64];
    signature.copy_from_slice(key_pair.sign(message).as_ref());
    Ok(signature)
}

/// Never errors: a malformed key or signature simply fails verification
pub fn ed25519_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let peer_public_key = UnparsedPublicKey::new(&ED25519, public_key);
    peer_public_key.verify(message, signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let seed = [42u8; SEED_LEN];
        let public_key = ed25519_public_key(&seed).unwrap();
        let signature = ed25519_sign(&seed, b"payload").unwrap();

        assert!(ed25519_verify(&public_key, &signature, b"payload"));
        assert!(!ed25519_verify(&public_key, &signature, b"payloaD"));
        assert!(!ed25519_verify(&[0u8; 32], &signature, b"payload"));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let seed = [7u8; SEED_LEN];
        assert_eq!(
            ed25519_sign(&seed, b"abc").unwrap(),
            ed25519_sign(&seed, b"abc").unwrap()
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(!ed25519_verify(&[1u8; 5], &[2u8; 64], b"x"));
        assert!(!ed25519_verify(&[1u8; 32], &[2u8; 3], b"x"));
    }

    #[test]
    fn test_new_seed_differs() {
        assert_ne!(new_seed().unwrap(), new_seed().unwrap());
    }

    #[test]
    fn test_sha256_known_vector() {
        let digest = sha256_digest(b"abc");
        assert_eq!(digest[0], 0xba);
        assert_eq!(digest[31], 0xad);
    }
}
