// This file defines the two requests a client can make and the exact bytes each one signs.
// Nothing in here touches balances; it only describes and authenticates intent.

use crate::core::{Identity, Signature};
use crate::error::Result;
use crate::utils::{ed25519_verify, sha256_digest};
use crate::wallet::Wallet;
use data_encoding::HEXLOWER;
use std::fmt;

const TRANSFER_DOMAIN: &[u8] = b"simple-ledger/transfer/v1";
const BALANCE_DOMAIN: &[u8] = b"simple-ledger/balance/v1";

/// Hash of a transfer's canonical bytes; the replay-protection key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferId([u8; 32]);

impl TransferId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl fmt::Debug for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransferId({self})")
    }
}

/// Signed instruction to move `amount` from `sender` to `recipient`
#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct TransferRequest {
    pub sender: Identity,
    pub recipient: Identity,
    pub amount: u64,
    /// Client-chosen value that makes otherwise identical transfers distinct
    pub nonce: u64,
    pub signature: Signature,
}

impl TransferRequest {
    /// Build and sign a transfer from the wallet's identity
    pub fn new_signed(
        wallet: &Wallet,
        recipient: Identity,
        amount: u64,
        nonce: u64,
    ) -> Result<TransferRequest> {
        let sender = wallet.identity();
        let message = transfer_signing_bytes(&sender, &recipient, amount, nonce);
        let signature = wallet.sign(&message)?;
        Ok(TransferRequest {
            sender,
            recipient,
            amount,
            nonce,
            signature,
        })
    }

    /// Bytes covered by the signature; every field except the signature itself
    pub fn signing_bytes(&self) -> Vec<u8> {
        transfer_signing_bytes(&self.sender, &self.recipient, self.amount, self.nonce)
    }

    pub fn id(&self) -> TransferId {
        TransferId(sha256_digest(&self.signing_bytes()))
    }

    pub fn verify_signature(&self) -> bool {
        ed25519_verify(
            self.sender.as_bytes(),
            self.signature.as_bytes(),
            &self.signing_bytes(),
        )
    }
}

/// Canonical layout: domain || sender || recipient || amount (BE) || nonce (BE)
pub fn transfer_signing_bytes(
    sender: &Identity,
    recipient: &Identity,
    amount: u64,
    nonce: u64,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(TRANSFER_DOMAIN.len() + 32 + 32 + 8 + 8);
    bytes.extend_from_slice(TRANSFER_DOMAIN);
    bytes.extend_from_slice(sender.as_bytes());
    bytes.extend_from_slice(recipient.as_bytes());
    bytes.extend_from_slice(&amount.to_be_bytes());
    bytes.extend_from_slice(&nonce.to_be_bytes());
    bytes
}

/// Request for an identity's balance, optionally proving ownership
#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct BalanceQuery {
    pub identity: Identity,
    pub proof: Option<Signature>,
}

impl BalanceQuery {
    /// Query that anyone may send under a public read policy
    pub fn public(identity: Identity) -> BalanceQuery {
        BalanceQuery {
            identity,
            proof: None,
        }
    }

    /// Query for the wallet's own balance, signed by the wallet
    pub fn owned(wallet: &Wallet) -> Result<BalanceQuery> {
        let identity = wallet.identity();
        let proof = wallet.sign(&balance_signing_bytes(&identity))?;
        Ok(BalanceQuery {
            identity,
            proof: Some(proof),
        })
    }

    /// True only when a proof is present and signed by the queried identity
    pub fn has_valid_proof(&self) -> bool {
        match &self.proof {
            Some(proof) => ed25519_verify(
                self.identity.as_bytes(),
                proof.as_bytes(),
                &balance_signing_bytes(&self.identity),
            ),
            None => false,
        }
    }
}

pub fn balance_signing_bytes(identity: &Identity) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(BALANCE_DOMAIN.len() + 32);
    bytes.extend_from_slice(BALANCE_DOMAIN);
    bytes.extend_from_slice(identity.as_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::{test_identity, test_wallet};

    #[test]
    fn test_signed_transfer_verifies() {
        let wallet = test_wallet(1);
        let tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        assert_eq!(tx.sender, wallet.identity());
        assert!(tx.verify_signature());
    }

    #[test]
    fn test_altered_recipient_fails() {
        let wallet = test_wallet(1);
        let mut tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        tx.recipient = test_identity(3);
        assert!(!tx.verify_signature());
    }

    #[test]
    fn test_altered_amount_fails() {
        let wallet = test_wallet(1);
        let mut tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        tx.amount = 300;
        assert!(!tx.verify_signature());
    }

    #[test]
    fn test_altered_nonce_fails() {
        let wallet = test_wallet(1);
        let mut tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        tx.nonce = 8;
        assert!(!tx.verify_signature());
    }

    #[test]
    fn test_replayed_against_other_sender_fails() {
        let wallet = test_wallet(1);
        let mut tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        tx.sender = test_wallet(4).identity();
        assert!(!tx.verify_signature());
    }

    #[test]
    fn test_swapped_fields_change_message() {
        let a = test_identity(1);
        let b = test_identity(2);
        assert_ne!(
            transfer_signing_bytes(&a, &b, 5, 0),
            transfer_signing_bytes(&b, &a, 5, 0)
        );
        assert_ne!(
            transfer_signing_bytes(&a, &b, 5, 6),
            transfer_signing_bytes(&a, &b, 6, 5)
        );
    }

    #[test]
    fn test_id_depends_on_nonce() {
        let wallet = test_wallet(1);
        let first = TransferRequest::new_signed(&wallet, test_identity(2), 30, 1).unwrap();
        let second = TransferRequest::new_signed(&wallet, test_identity(2), 30, 2).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.id(), first.clone().id());
    }

    #[test]
    fn test_balance_proof() {
        let wallet = test_wallet(1);
        let query = BalanceQuery::owned(&wallet).unwrap();
        assert!(query.has_valid_proof());

        let forged = BalanceQuery {
            identity: test_wallet(2).identity(),
            proof: query.proof,
        };
        assert!(!forged.has_valid_proof());
        assert!(!BalanceQuery::public(wallet.identity()).has_valid_proof());
    }

    #[test]
    fn test_transfer_signature_not_valid_as_balance_proof() {
        let wallet = test_wallet(1);
        let tx = TransferRequest::new_signed(&wallet, test_identity(2), 30, 7).unwrap();
        let query = BalanceQuery {
            identity: wallet.identity(),
            proof: Some(tx.signature),
        };
        assert!(!query.has_valid_proof());
    }
}
