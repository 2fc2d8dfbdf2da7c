//! Packed 65-byte ECDSA signatures and signer recovery.
//!
//! The on-chain verifier splits signatures as `abi.encodePacked(r, s, v)`, so
//! that is the only layout accepted here. DER and 64-byte compact forms are
//! rejected, as are high-s signatures that OpenZeppelin's `ECDSA.recover`
//! would revert on.

use alloy_primitives::{uint, Address, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use super::domain::IntentDomain;
use super::typed_data::signing_digest;
use crate::types::Intent;
use crate::{Error, Result};

/// Length of a packed `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Half the secp256k1 group order; canonical signatures keep `s` at or below it.
pub const SECP256K1N_HALF: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// `r (32) || s (32) || v (1)` signature bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedSignature([u8; SIGNATURE_LENGTH]);

impl PackedSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Accepts exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            Error::invalid_signature(format!(
                "expected {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Decode from hex, `0x` prefix optional.
    pub fn from_hex(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let raw = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
            .map_err(|e| Error::invalid_signature(format!("signature is not hex: {e}")))?;
        Self::from_slice(&raw)
    }

    pub fn r(&self) -> B256 {
        B256::from_slice(&self.0[..32])
    }

    pub fn s(&self) -> B256 {
        B256::from_slice(&self.0[32..64])
    }

    /// Recovery byte as transmitted.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Hex with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Map `v` onto the y-parity bit; only {27, 28} and {0, 1} are accepted.
    fn y_parity(&self) -> Result<bool> {
        match self.v() {
            0 | 27 => Ok(false),
            1 | 28 => Ok(true),
            v => Err(Error::invalid_signature(format!("unsupported recovery id {v}"))),
        }
    }
}

impl From<Signature> for PackedSignature {
    fn from(signature: Signature) -> Self {
        Self(signature.as_bytes())
    }
}

impl std::fmt::Debug for PackedSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PackedSignature({})", self.to_hex())
    }
}

impl std::fmt::Display for PackedSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Sign a 32-byte digest with a raw secp256k1 private key.
///
/// Nonces are derived per RFC 6979, so the same key and digest always give
/// the same signature. `v` is 27 or 28.
pub fn sign(digest: &B256, private_key: &B256) -> Result<PackedSignature> {
    let signer = PrivateKeySigner::from_bytes(private_key)
        .map_err(|e| Error::encoding(format!("invalid private key: {e}")))?;
    sign_with(&signer, digest)
}

pub(crate) fn sign_with(signer: &PrivateKeySigner, digest: &B256) -> Result<PackedSignature> {
    let signature = signer
        .sign_hash_sync(digest)
        .map_err(|e| Error::invalid_signature(format!("signing failed: {e}")))?;
    Ok(PackedSignature::from(signature))
}

/// Recover the address that produced `signature` over `digest`.
pub fn recover(digest: &B256, signature: &PackedSignature) -> Result<Address> {
    let y_parity = signature.y_parity()?;
    let r = U256::from_be_bytes(signature.r().0);
    let s = U256::from_be_bytes(signature.s().0);
    if s > SECP256K1N_HALF {
        return Err(Error::invalid_signature(
            "non-canonical signature: s is in the upper half of the curve order",
        ));
    }

    Signature::new(r, s, y_parity)
        .recover_address_from_prehash(digest)
        .map_err(|e| Error::invalid_signature(format!("public key recovery failed: {e}")))
}

/// Recover the signer of `intent` under `domain`.
///
/// Callers compare the result against `intent.user`; a mismatch is a
/// rejection at their level, not an error here.
pub fn recover_intent_signer(
    intent: &Intent,
    signature: &PackedSignature,
    domain: &IntentDomain,
) -> Result<Address> {
    recover(&signing_digest(intent, domain)?, signature)
}
