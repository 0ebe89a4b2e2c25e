//! Payload signing.
//!
//! A payload signature covers the compact JSON encoding of the vote. The
//! local signer produces EIP-191 personal-message signatures, so the owner
//! identity is the signer's address and anyone can verify a payload by
//! recovering it.

use std::path::Path;

use alloy_primitives::{Address, Signature};
use alloy_signer::{Signer, k256::ecdsa::SigningKey};
use alloy_signer_local::{LocalSigner, PrivateKeySigner};
use async_trait::async_trait;
use serde::Serialize;
use vigil_primitives::{SignedPayload, WalletAddress};

use crate::{LedgerError, LedgerResult};

/// Signs vote payloads on behalf of a wallet.
#[async_trait]
pub trait PayloadSigner: Send + Sync {
    /// Wallet address that appears as `senderAddress`.
    fn address(&self) -> WalletAddress;

    /// Public identity that appears as `owner`.
    fn owner(&self) -> String;

    /// Sign `message`, returning the hex encoded signature.
    async fn sign(&self, message: &[u8]) -> LedgerResult<String>;
}

/// Wrap `vote` in a signed envelope.
pub async fn sign_payload<T>(signer: &dyn PayloadSigner, vote: T) -> LedgerResult<SignedPayload<T>>
where
    T: Serialize + Send,
{
    let message = serde_json::to_vec(&vote).map_err(|e| LedgerError::Signing(e.to_string()))?;
    let signature = signer.sign(&message).await?;
    Ok(SignedPayload {
        vote,
        sender_address: signer.address(),
        signature,
        owner: signer.owner(),
    })
}

/// Check that `payload.signature` was produced by `payload.owner` over the
/// encoded vote.
///
/// Only meaningful for payloads signed by a [`LocalPayloadSigner`]. Malformed
/// signatures or owners are errors; a well formed signature by someone else
/// is `Ok(false)`.
pub fn verify_payload<T: Serialize>(payload: &SignedPayload<T>) -> LedgerResult<bool> {
    let message =
        serde_json::to_vec(&payload.vote).map_err(|e| LedgerError::Signing(e.to_string()))?;

    let owner: Address = payload
        .owner
        .parse()
        .map_err(|e| LedgerError::Signing(format!("invalid owner: {e}")))?;

    let raw = hex::decode(payload.signature.trim_start_matches("0x"))
        .map_err(|e| LedgerError::Signing(format!("invalid signature hex: {e}")))?;
    let signature = Signature::try_from(raw.as_slice())
        .map_err(|e| LedgerError::Signing(format!("invalid signature: {e}")))?;

    let recovered = signature
        .recover_address_from_msg(&message)
        .map_err(|e| LedgerError::Signing(e.to_string()))?;

    Ok(recovered == owner)
}

/// [`PayloadSigner`] backed by a local secp256k1 key.
#[derive(Debug, Clone)]
pub struct LocalPayloadSigner {
    inner: PrivateKeySigner,
}

impl LocalPayloadSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self::new(PrivateKeySigner::random())
    }

    pub fn from_signing_key(key: SigningKey) -> Self {
        Self::new(LocalSigner::from_signing_key(key))
    }

    /// Parse a hex private key, with or without `0x`.
    pub fn from_hex(key: &str) -> LedgerResult<Self> {
        key.parse::<PrivateKeySigner>()
            .map(Self::new)
            .map_err(|e| LedgerError::Signing(format!("invalid private key: {e}")))
    }

    /// Decrypt an Ethereum JSON v3 keystore file.
    pub fn from_keystore(path: impl AsRef<Path>, password: &str) -> LedgerResult<Self> {
        let path = path.as_ref();
        LocalSigner::decrypt_keystore(path, password)
            .map(Self::new)
            .map_err(|e| {
                LedgerError::Signing(format!("failed to decrypt keystore {}: {e}", path.display()))
            })
    }

    pub fn signer_address(&self) -> Address {
        self.inner.address()
    }
}

#[async_trait]
impl PayloadSigner for LocalPayloadSigner {
    fn address(&self) -> WalletAddress {
        WalletAddress::new(self.inner.address().to_string())
    }

    fn owner(&self) -> String {
        self.inner.address().to_string()
    }

    async fn sign(&self, message: &[u8]) -> LedgerResult<String> {
        let signature = self
            .inner
            .sign_message(message)
            .await
            .map_err(|e| LedgerError::Signing(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use vigil_primitives::{RelayVote, VoteId};

    use super::*;

    #[tokio::test]
    async fn test_sign_and_verify() {
        let signer = LocalPayloadSigner::random();
        let payload = sign_payload(&signer, RelayVote::new(VoteId::new(7), true))
            .await
            .unwrap();

        assert_eq!(payload.sender_address, signer.address());
        assert_eq!(payload.owner, signer.owner());
        assert!(payload.signature.starts_with("0x"));
        assert!(verify_payload(&payload).unwrap());
    }

    #[tokio::test]
    async fn test_tampered_vote_fails_verification() {
        let signer = LocalPayloadSigner::random();
        let mut payload = sign_payload(&signer, RelayVote::new(VoteId::new(7), true))
            .await
            .unwrap();
        payload.vote = RelayVote::new(VoteId::new(7), false);

        assert!(!verify_payload(&payload).unwrap());
    }

    #[tokio::test]
    async fn test_foreign_owner_fails_verification() {
        let signer = LocalPayloadSigner::random();
        let other = LocalPayloadSigner::random();
        let mut payload = sign_payload(&signer, RelayVote::new(VoteId::new(1), false))
            .await
            .unwrap();
        payload.owner = other.owner();

        assert!(!verify_payload(&payload).unwrap());
    }

    #[test]
    fn test_malformed_signature() {
        let payload = SignedPayload {
            vote: RelayVote::new(VoteId::new(1), true),
            sender_address: WalletAddress::new("0x0"),
            signature: "zz".into(),
            owner: Address::ZERO.to_string(),
        };
        assert_matches!(verify_payload(&payload), Err(LedgerError::Signing(_)));
    }

    #[test]
    fn test_from_hex() {
        let key = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        let a = LocalPayloadSigner::from_hex(key).unwrap();
        let b = LocalPayloadSigner::from_hex(key.trim_start_matches("0x")).unwrap();
        assert_eq!(a.signer_address(), b.signer_address());
        assert_matches!(
            LocalPayloadSigner::from_hex("nope"),
            Err(LedgerError::Signing(_))
        );
    }
}
