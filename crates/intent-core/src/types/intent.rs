//! LP intent matching the on-chain `LPIntent` struct.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::pool_key::PoolKey;
use crate::{Error, Result};

/// Lowest tick a position may use.
pub const MIN_TICK: i32 = -887272;
/// Highest tick a position may use.
pub const MAX_TICK: i32 = 887272;

/// A signed request to provide liquidity in `[tick_lower, tick_upper)` of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Owner of the liquidity and signer of the intent.
    pub user: Address,
    pub pool: PoolKey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Amount in token base units.
    pub amount: U256,
    /// Per-user replay protection.
    pub nonce: U256,
    /// Unix timestamp after which the intent is void.
    pub deadline: u64,
}

impl Intent {
    /// Check the range and pool invariants before the intent enters the core.
    pub fn validate(&self) -> Result<()> {
        self.pool.validate()?;

        if self.tick_lower >= self.tick_upper {
            return Err(Error::validation(format!(
                "tick_lower {} must be below tick_upper {}",
                self.tick_lower, self.tick_upper
            )));
        }
        if self.tick_lower < MIN_TICK || self.tick_upper > MAX_TICK {
            return Err(Error::validation(format!(
                "range [{}, {}] outside [{MIN_TICK}, {MAX_TICK}]",
                self.tick_lower, self.tick_upper
            )));
        }

        let spacing = self.pool.tick_spacing;
        if self.tick_lower % spacing != 0 || self.tick_upper % spacing != 0 {
            return Err(Error::validation(format!(
                "ticks [{}, {}] are not multiples of spacing {spacing}",
                self.tick_lower, self.tick_upper
            )));
        }
        Ok(())
    }

    /// Whether the deadline has passed at unix time `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.deadline < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_intent() -> Intent {
        Intent {
            user: Address::left_padding_from(&[0x01]),
            pool: PoolKey::new(
                Address::left_padding_from(&[0x11, 0x11]),
                Address::left_padding_from(&[0x22, 0x22]),
                3000,
                60,
                Address::ZERO,
            ),
            tick_lower: -887220,
            tick_upper: 887220,
            amount: U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64)),
            nonce: U256::ZERO,
            deadline: 99_999_999_999,
        }
    }

    #[test]
    fn test_valid_intent() {
        assert!(test_intent().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let intent = Intent {
            tick_lower: 120,
            tick_upper: 60,
            ..test_intent()
        };
        assert!(matches!(intent.validate(), Err(Error::Validation { .. })));

        let empty = Intent {
            tick_lower: 60,
            tick_upper: 60,
            ..test_intent()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_unaligned_tick_rejected() {
        let intent = Intent {
            tick_lower: -100,
            ..test_intent()
        };
        assert!(matches!(intent.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let intent = Intent {
            tick_upper: 887280,
            ..test_intent()
        };
        assert!(intent.validate().is_err());
    }

    #[test]
    fn test_expiry() {
        let intent = test_intent();
        assert!(!intent.is_expired(intent.deadline));
        assert!(intent.is_expired(intent.deadline + 1));
    }
}
