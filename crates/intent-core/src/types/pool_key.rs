//! Uniswap v4 pool key.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest value representable by a Solidity `uint24`.
pub const MAX_UINT24: u32 = (1 << 24) - 1;

/// Largest tick spacing the pool manager accepts.
pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// 0.05% fee tier.
pub const FEE_TIER_LOW: u32 = 500;
/// 0.30% fee tier.
pub const FEE_TIER_MEDIUM: u32 = 3000;
/// 1.00% fee tier.
pub const FEE_TIER_HIGH: u32 = 10000;

/// Tick spacing conventionally paired with a fee tier.
pub fn tick_spacing_for_fee(fee: u32) -> Option<i32> {
    match fee {
        FEE_TIER_LOW => Some(10),
        FEE_TIER_MEDIUM => Some(60),
        FEE_TIER_HIGH => Some(200),
        _ => None,
    }
}

/// Identifies a pool: the sorted currency pair, fee tier, tick spacing and hooks.
///
/// Matches the Solidity `PoolKey` struct field for field. `currency0` is always
/// the numerically lower address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKey {
    /// The lower currency of the pool.
    pub currency0: Address,
    /// The higher currency of the pool.
    pub currency1: Address,
    /// LP fee in hundredths of a basis point.
    pub fee: u32,
    /// Positions must sit on multiples of this spacing.
    pub tick_spacing: i32,
    /// Hooks contract, zero when the pool has none.
    pub hooks: Address,
}

impl PoolKey {
    /// Create a pool key, placing the two tokens in canonical order.
    pub fn new(token_a: Address, token_b: Address, fee: u32, tick_spacing: i32, hooks: Address) -> Self {
        let (currency0, currency1) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        }
    }

    /// Create a pool key using the tick spacing that belongs to `fee`.
    pub fn for_fee_tier(token_a: Address, token_b: Address, fee: u32, hooks: Address) -> Result<Self> {
        let tick_spacing = tick_spacing_for_fee(fee)
            .ok_or_else(|| Error::validation(format!("no default tick spacing for fee tier {fee}")))?;
        Ok(Self::new(token_a, token_b, fee, tick_spacing, hooks))
    }

    /// Check the invariants the on-chain pool manager enforces.
    pub fn validate(&self) -> Result<()> {
        if self.currency0 == self.currency1 {
            return Err(Error::validation("pool currencies must differ"));
        }
        if self.currency0 > self.currency1 {
            return Err(Error::validation(format!(
                "pool currencies out of order: {} > {}",
                self.currency0, self.currency1
            )));
        }
        if self.fee > MAX_UINT24 {
            return Err(Error::validation(format!("fee {} exceeds uint24", self.fee)));
        }
        if self.tick_spacing <= 0 || self.tick_spacing > MAX_TICK_SPACING {
            return Err(Error::validation(format!(
                "tick spacing {} outside 1..={MAX_TICK_SPACING}",
                self.tick_spacing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(suffix: u64) -> Address {
        Address::left_padding_from(&suffix.to_be_bytes())
    }

    #[test]
    fn test_new_sorts_currencies() {
        let key = PoolKey::new(addr(0x2222), addr(0x1111), 3000, 60, Address::ZERO);
        assert_eq!(key.currency0, addr(0x1111));
        assert_eq!(key.currency1, addr(0x2222));

        let same = PoolKey::new(addr(0x1111), addr(0x2222), 3000, 60, Address::ZERO);
        assert_eq!(key, same);
    }

    #[test]
    fn test_for_fee_tier() {
        let key = PoolKey::for_fee_tier(addr(1), addr(2), FEE_TIER_HIGH, Address::ZERO).unwrap();
        assert_eq!(key.tick_spacing, 200);

        let err = PoolKey::for_fee_tier(addr(1), addr(2), 1234, Address::ZERO);
        assert!(matches!(err, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_validate() {
        assert!(PoolKey::new(addr(1), addr(2), 3000, 60, Address::ZERO).validate().is_ok());
        assert!(PoolKey::new(addr(1), addr(1), 3000, 60, Address::ZERO).validate().is_err());
        assert!(PoolKey::new(addr(1), addr(2), 3000, 0, Address::ZERO).validate().is_err());
        assert!(PoolKey::new(addr(1), addr(2), MAX_UINT24 + 1, 60, Address::ZERO)
            .validate()
            .is_err());

        let unordered = PoolKey {
            currency0: addr(2),
            currency1: addr(1),
            fee: 3000,
            tick_spacing: 60,
            hooks: Address::ZERO,
        };
        assert!(unordered.validate().is_err());
    }
}
