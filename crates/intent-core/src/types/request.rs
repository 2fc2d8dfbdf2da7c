//! Wire-shaped intent submission as it arrives from a client.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::pool_key::PoolKey;
use crate::signing::{parse_address, PackedSignature};
use crate::{Error, Result};

/// Flat intent submission with string-encoded addresses and big integers.
///
/// Amounts and nonces are strings so they survive JSON clients that cannot
/// represent 256-bit integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub user: String,
    pub pool_currency0: String,
    pub pool_currency1: String,
    pub pool_fee: u32,
    pub pool_tick_spacing: i32,
    pub pool_hooks: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount: String,
    pub nonce: String,
    pub deadline: u64,
    /// Hex-encoded 65-byte signature, `0x` prefix optional.
    pub signature: String,
}

impl IntentRequest {
    /// Decode and validate the intent fields.
    pub fn to_intent(&self) -> Result<Intent> {
        let pool = PoolKey::new(
            parse_address(&self.pool_currency0)?,
            parse_address(&self.pool_currency1)?,
            self.pool_fee,
            self.pool_tick_spacing,
            parse_address(&self.pool_hooks)?,
        );

        let intent = Intent {
            user: parse_address(&self.user)?,
            pool,
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            amount: parse_uint("amount", &self.amount)?,
            nonce: parse_uint("nonce", &self.nonce)?,
            deadline: self.deadline,
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Decode the attached signature.
    pub fn decode_signature(&self) -> Result<PackedSignature> {
        PackedSignature::from_hex(&self.signature)
    }

    /// Decode both the intent and its signature.
    pub fn into_parts(self) -> Result<(Intent, PackedSignature)> {
        let intent = self.to_intent()?;
        let signature = self.decode_signature()?;
        Ok((intent, signature))
    }
}

/// Parse a decimal (or `0x` hex) string into a `uint256`.
fn parse_uint(field: &str, value: &str) -> Result<U256> {
    value
        .trim()
        .parse::<U256>()
        .map_err(|e| Error::encoding(format!("{field} '{value}' is not a uint256: {e}")))
}
