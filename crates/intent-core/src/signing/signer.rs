//! Client-side intent signing.
//!
//! Holds a local secp256k1 key and produces the packed signatures the intent
//! pool and the on-chain verifier expect.

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use std::str::FromStr;
use tracing::debug;

use super::domain::IntentDomain;
use super::signature::{sign_with, PackedSignature};
use super::typed_data::signing_digest;
use crate::types::Intent;
use crate::{Error, Result};

/// Environment variable read by [`IntentSigner::from_env`].
pub const SIGNER_KEY_ENV: &str = "INTENT_SIGNER_PRIVATE_KEY";

/// Signs intents for a fixed EIP-712 domain.
#[derive(Clone)]
pub struct IntentSigner {
    signer: PrivateKeySigner,
    domain: IntentDomain,
}

impl IntentSigner {
    pub fn new(signer: PrivateKeySigner, domain: IntentDomain) -> Self {
        Self { signer, domain }
    }

    /// Create a signer from a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - A 64-character hex string, optionally prefixed with "0x"
    ///
    /// # Errors
    ///
    /// Returns an encoding error if the key is not a valid secp256k1 scalar.
    pub fn from_private_key(key: &str, domain: IntentDomain) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");

        let signer = PrivateKeySigner::from_str(key_clean).map_err(|_| {
            Error::encoding("invalid private key format - expected 64 hex characters")
        })?;

        Ok(Self::new(signer, domain))
    }

    /// Load the key from `INTENT_SIGNER_PRIVATE_KEY`.
    pub fn from_env(domain: IntentDomain) -> Result<Self> {
        let key = std::env::var(SIGNER_KEY_ENV).map_err(|_| Error::Config {
            message: format!("{SIGNER_KEY_ENV} environment variable not set"),
        })?;
        Self::from_private_key(&key, domain)
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn domain(&self) -> &IntentDomain {
        &self.domain
    }

    /// Sign an arbitrary 32-byte digest.
    pub fn sign_digest(&self, digest: &B256) -> Result<PackedSignature> {
        sign_with(&self.signer, digest)
    }

    /// Sign the EIP-712 digest of `intent`.
    pub fn sign_intent(&self, intent: &Intent) -> Result<PackedSignature> {
        let digest = signing_digest(intent, &self.domain)?;
        let signature = self.sign_digest(&digest)?;

        debug!(
            signer = %self.address(),
            nonce = %intent.nonce,
            digest = %digest,
            "Signed intent"
        );

        Ok(signature)
    }
}

impl std::fmt::Debug for IntentSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.debug_struct("IntentSigner")
            .field("address", &format!("{:?}", self.address()))
            .field("chain_id", &self.domain.chain_id)
            .finish()
    }
}
