//! EIP-712 struct hashing for pool keys and LP intents.
//!
//! Must stay byte-for-byte identical to `IntentVerifier.hashPoolKey` and
//! `IntentVerifier.hashIntent` on-chain. The intent struct hash doubles as the
//! Merkle leaf for batch commitments.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use std::str::FromStr;

use super::domain::IntentDomain;
use crate::types::{Intent, PoolKey, MAX_UINT24};
use crate::{Error, Result};

/// Type string of the `PoolKey` struct.
pub const POOL_KEY_TYPE: &str =
    "PoolKey(address currency0,address currency1,uint24 fee,int24 tickSpacing,address hooks)";

/// Type string of the `LPIntent` struct, without its referenced `PoolKey`.
pub const LP_INTENT_TYPE: &str = "LPIntent(address user,PoolKey pool,int24 tickLower,int24 tickUpper,uint256 amount,uint256 nonce,uint256 deadline)";

const INT24_MIN: i32 = -(1 << 23);
const INT24_MAX: i32 = (1 << 23) - 1;

/// `keccak256` of the `PoolKey` type string.
pub fn pool_key_type_hash() -> B256 {
    keccak256(POOL_KEY_TYPE.as_bytes())
}

/// `keccak256` of the `LPIntent` type string with `PoolKey` appended.
pub fn lp_intent_type_hash() -> B256 {
    keccak256(format!("{LP_INTENT_TYPE}{POOL_KEY_TYPE}").as_bytes())
}

/// Parse a 20-byte hex address, `0x` prefix optional.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| Error::encoding(format!("invalid address '{value}': {e}")))
}

/// Compute the EIP-712 struct hash of a pool key.
pub fn hash_pool_key(pool: &PoolKey) -> Result<B256> {
    let encoded = (
        pool_key_type_hash(),
        pool.currency0.into_word(),
        pool.currency1.into_word(),
        encode_uint24(pool.fee)?,
        encode_int24(pool.tick_spacing)?,
        pool.hooks.into_word(),
    )
        .abi_encode_packed();

    Ok(keccak256(&encoded))
}

/// Compute the EIP-712 struct hash of an intent.
///
/// The pool is encoded as its own struct hash, not inline.
pub fn hash_intent(intent: &Intent) -> Result<B256> {
    let encoded = (
        lp_intent_type_hash(),
        intent.user.into_word(),
        hash_pool_key(&intent.pool)?,
        encode_int24(intent.tick_lower)?,
        encode_int24(intent.tick_upper)?,
        intent.amount,
        intent.nonce,
        U256::from(intent.deadline),
    )
        .abi_encode_packed();

    Ok(keccak256(&encoded))
}

/// Domain separator and struct hash that together make up the signed digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningPayload {
    pub domain_separator: B256,
    pub struct_hash: B256,
}

impl SigningPayload {
    /// `keccak256("\x19\x01" ++ domainSeparator ++ structHash)`.
    pub fn digest(&self) -> B256 {
        let mut buf = [0u8; 66];
        buf[0] = 0x19;
        buf[1] = 0x01;
        buf[2..34].copy_from_slice(self.domain_separator.as_slice());
        buf[34..].copy_from_slice(self.struct_hash.as_slice());
        keccak256(buf)
    }
}

/// Build the payload a user signs for `intent` on the given deployment.
pub fn build_signing_payload(
    intent: &Intent,
    chain_id: u64,
    verifying_contract: Address,
) -> Result<SigningPayload> {
    signing_payload(intent, &IntentDomain::new(chain_id, verifying_contract))
}

/// Build the signing payload against an explicit domain.
pub fn signing_payload(intent: &Intent, domain: &IntentDomain) -> Result<SigningPayload> {
    Ok(SigningPayload {
        domain_separator: domain.separator(),
        struct_hash: hash_intent(intent)?,
    })
}

/// The final 32-byte digest signed for `intent`.
pub fn signing_digest(intent: &Intent, domain: &IntentDomain) -> Result<B256> {
    Ok(signing_payload(intent, domain)?.digest())
}

fn encode_uint24(value: u32) -> Result<U256> {
    if value > MAX_UINT24 {
        return Err(Error::encoding(format!("{value} does not fit in uint24")));
    }
    Ok(U256::from(value))
}

/// Sign-extend an `int24` to a 32-byte word.
fn encode_int24(value: i32) -> Result<B256> {
    if !(INT24_MIN..=INT24_MAX).contains(&value) {
        return Err(Error::encoding(format!("{value} does not fit in int24")));
    }
    let mut word = if value < 0 { [0xff; 32] } else { [0u8; 32] };
    word[28..].copy_from_slice(&value.to_be_bytes());
    Ok(B256::from(word))
}
