//! ABI bindings for `BatchExecutor.executeBatch`.

use alloy_primitives::aliases::{I24, U24};
use alloy_primitives::{Bytes, B256, U256};
use alloy_sol_types::SolCall;
use intent_core::signing::PackedSignature;
use intent_core::types::{Intent, PoolKey};
use intent_core::{Error, Result};

mod bindings {
    alloy_sol_types::sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct PoolKey {
            address currency0;
            address currency1;
            uint24 fee;
            int24 tickSpacing;
            address hooks;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct LPIntent {
            address user;
            PoolKey pool;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount;
            uint256 nonce;
            uint256 deadline;
        }

        #[derive(Debug, PartialEq, Eq)]
        function executeBatch(LPIntent[] intents, bytes[] signatures, bytes32[][] proofs);
    }
}

pub use bindings::{executeBatchCall, LPIntent as SolLPIntent, PoolKey as SolPoolKey};

impl TryFrom<&PoolKey> for SolPoolKey {
    type Error = Error;

    fn try_from(pool: &PoolKey) -> Result<Self> {
        Ok(Self {
            currency0: pool.currency0,
            currency1: pool.currency1,
            fee: U24::try_from(pool.fee).map_err(|_| out_of_width("fee", pool.fee))?,
            tickSpacing: int24("tickSpacing", pool.tick_spacing)?,
            hooks: pool.hooks,
        })
    }
}

impl TryFrom<&Intent> for SolLPIntent {
    type Error = Error;

    fn try_from(intent: &Intent) -> Result<Self> {
        Ok(Self {
            user: intent.user,
            pool: SolPoolKey::try_from(&intent.pool)?,
            tickLower: int24("tickLower", intent.tick_lower)?,
            tickUpper: int24("tickUpper", intent.tick_upper)?,
            amount: intent.amount,
            nonce: intent.nonce,
            deadline: U256::from(intent.deadline),
        })
    }
}

/// ABI-encode an `executeBatch` call, selector included.
pub fn encode_execute_batch(
    intents: &[Intent],
    signatures: &[PackedSignature],
    proofs: &[Vec<B256>],
) -> Result<Bytes> {
    if intents.len() != signatures.len() || intents.len() != proofs.len() {
        return Err(Error::Validation {
            message: format!(
                "batch arrays differ in length: {} intents, {} signatures, {} proofs",
                intents.len(),
                signatures.len(),
                proofs.len()
            ),
        });
    }

    let call = executeBatchCall {
        intents: intents
            .iter()
            .map(SolLPIntent::try_from)
            .collect::<Result<Vec<_>>>()?,
        signatures: signatures
            .iter()
            .map(|sig| Bytes::copy_from_slice(sig.as_bytes()))
            .collect(),
        proofs: proofs.to_vec(),
    };

    Ok(call.abi_encode().into())
}

fn int24(field: &str, value: i32) -> Result<I24> {
    I24::try_from(value).map_err(|_| out_of_width(field, value))
}

fn out_of_width(field: &str, value: impl std::fmt::Display) -> Error {
    Error::Encoding {
        message: format!("{field} {value} does not fit its ABI type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address};
    use alloy_sol_types::SolStruct;
    use intent_core::signing::{hash_intent, sign};
    use intent_core::types::MAX_UINT24;

    fn test_intent() -> Intent {
        Intent {
            user: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            pool: PoolKey::new(
                address!("0000000000000000000000000000000000001111"),
                address!("0000000000000000000000000000000000002222"),
                3000,
                60,
                Address::ZERO,
            ),
            tick_lower: -600,
            tick_upper: 600,
            amount: U256::from(1_000_000u64),
            nonce: U256::from(3u64),
            deadline: 99_999_999_999,
        }
    }

    #[test]
    fn test_conversion_preserves_struct_hash() {
        let intent = test_intent();
        let sol = SolLPIntent::try_from(&intent).unwrap();

        assert_eq!(sol.tickLower, I24::try_from(-600).unwrap());
        assert_eq!(sol.pool.fee, U24::from(3000u32));
        assert_eq!(sol.eip712_hash_struct(), hash_intent(&intent).unwrap());
    }

    #[test]
    fn test_out_of_width_fields_rejected() {
        let mut intent = test_intent();
        intent.pool.fee = MAX_UINT24 + 1;
        assert!(matches!(
            SolLPIntent::try_from(&intent),
            Err(Error::Encoding { .. })
        ));

        let mut intent = test_intent();
        intent.tick_upper = 1 << 23;
        assert!(SolLPIntent::try_from(&intent).is_err());
    }

    #[test]
    fn test_execute_batch_calldata_round_trip() {
        let intents = vec![test_intent(), Intent { nonce: U256::from(4u64), ..test_intent() }];
        let key = B256::repeat_byte(0x42);
        let signatures: Vec<PackedSignature> = intents
            .iter()
            .map(|i| sign(&hash_intent(i).unwrap(), &key).unwrap())
            .collect();
        let proofs = vec![vec![B256::repeat_byte(0x01)], vec![B256::repeat_byte(0x02)]];

        let calldata = encode_execute_batch(&intents, &signatures, &proofs).unwrap();
        assert_eq!(&calldata[..4], executeBatchCall::SELECTOR.as_slice());

        let decoded = executeBatchCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.intents.len(), 2);
        assert_eq!(decoded.intents[1].nonce, U256::from(4u64));
        assert_eq!(decoded.signatures[0].as_ref(), signatures[0].as_bytes().as_slice());
        assert_eq!(decoded.proofs, proofs);
    }

    #[test]
    fn test_selector_matches_solidity_signature() {
        assert_eq!(
            executeBatchCall::SIGNATURE,
            "executeBatch((address,(address,address,uint24,int24,address),int24,int24,uint256,uint256,uint256)[],bytes[],bytes32[][])"
        );
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = encode_execute_batch(&[test_intent()], &[], &[vec![]]);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
