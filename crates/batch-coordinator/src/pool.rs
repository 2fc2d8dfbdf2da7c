//! In-memory intake queue for signed intents.
//!
//! The pool is a plain owned value: every mutation goes through `&mut self`,
//! and callers that share it across tasks wrap it in their own lock.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use intent_core::signing::{recover_intent_signer, IntentDomain, PackedSignature};
use intent_core::types::{Intent, IntentRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Reasons an intent is turned away at intake.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Intent deadline {deadline} has passed (now {now})")]
    Expired { deadline: u64, now: u64 },

    #[error("Duplicate nonce {nonce} for user {user}")]
    DuplicateNonce { user: Address, nonce: U256 },

    #[error("Signature mismatch: recovered {recovered}, expected {expected}")]
    SignerMismatch {
        recovered: Address,
        expected: Address,
    },

    #[error(transparent)]
    Core(#[from] intent_core::Error),
}

/// An accepted intent waiting for the next batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIntent {
    pub intent: Intent,
    pub signature: PackedSignature,
    pub received_at: DateTime<Utc>,
}

/// Snapshot of the pool's batching state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub pending_intents: usize,
    pub last_batch_root: Option<B256>,
    pub last_batch_tx: Option<B256>,
    pub batches_executed: u64,
}

/// A batch that was committed on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: Uuid,
    pub root: B256,
    pub tx_hash: B256,
    pub intent_count: usize,
    pub executed_at: DateTime<Utc>,
}

/// Validated intents awaiting batching, plus the record of executed batches.
#[derive(Debug)]
pub struct IntentPool {
    domain: IntentDomain,
    pending: Vec<PendingIntent>,
    history: Vec<BatchRecord>,
}

impl IntentPool {
    /// Create an empty pool that verifies signatures against `domain`.
    pub fn new(domain: IntentDomain) -> Self {
        Self {
            domain,
            pending: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn domain(&self) -> &IntentDomain {
        &self.domain
    }

    /// Validate and enqueue a signed intent.
    ///
    /// Checks, in order: structural validity, deadline against `now` (unix
    /// seconds), that the signature recovers to `intent.user`, and that no
    /// pending intent from the same user carries the same nonce.
    ///
    /// Returns the number of pending intents after insertion.
    pub fn submit(
        &mut self,
        intent: Intent,
        signature: PackedSignature,
        now: u64,
    ) -> Result<usize, IntakeError> {
        let result = self.check(&intent, &signature, now);
        if let Err(e) = &result {
            warn!(user = %intent.user, nonce = %intent.nonce, error = %e, "Rejected intent");
        }
        result?;

        self.pending.push(PendingIntent {
            intent,
            signature,
            received_at: Utc::now(),
        });

        let accepted = &self.pending[self.pending.len() - 1].intent;
        info!(
            user = %accepted.user,
            nonce = %accepted.nonce,
            pending = self.pending.len(),
            "Accepted intent"
        );
        Ok(self.pending.len())
    }

    /// Decode a wire request and submit it.
    pub fn submit_request(
        &mut self,
        request: IntentRequest,
        now: u64,
    ) -> Result<usize, IntakeError> {
        let (intent, signature) = request.into_parts()?;
        self.submit(intent, signature, now)
    }

    fn check(
        &self,
        intent: &Intent,
        signature: &PackedSignature,
        now: u64,
    ) -> Result<(), IntakeError> {
        intent.validate()?;

        if intent.is_expired(now) {
            return Err(IntakeError::Expired {
                deadline: intent.deadline,
                now,
            });
        }

        let recovered = recover_intent_signer(intent, signature, &self.domain)?;
        if recovered != intent.user {
            return Err(IntakeError::SignerMismatch {
                recovered,
                expected: intent.user,
            });
        }

        let duplicate = self
            .pending
            .iter()
            .any(|p| p.intent.user == intent.user && p.intent.nonce == intent.nonce);
        if duplicate {
            return Err(IntakeError::DuplicateNonce {
                user: intent.user,
                nonce: intent.nonce,
            });
        }

        Ok(())
    }

    /// Pending intents in arrival order.
    pub fn pending(&self) -> &[PendingIntent] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every pending intent.
    pub fn drain(&mut self) -> Vec<PendingIntent> {
        std::mem::take(&mut self.pending)
    }

    /// Put drained intents back ahead of anything submitted since.
    pub fn requeue(&mut self, intents: Vec<PendingIntent>) {
        if intents.is_empty() {
            return;
        }
        warn!(count = intents.len(), "Requeued intents");
        self.pending.splice(0..0, intents);
    }

    /// Record a batch that landed on-chain.
    pub fn record_batch(&mut self, root: B256, tx_hash: B256, intent_count: usize) -> &BatchRecord {
        self.history.push(BatchRecord {
            id: Uuid::new_v4(),
            root,
            tx_hash,
            intent_count,
            executed_at: Utc::now(),
        });
        info!(%root, %tx_hash, intent_count, "Recorded batch");
        &self.history[self.history.len() - 1]
    }

    pub fn status(&self) -> BatchStatus {
        let last = self.history.last();
        BatchStatus {
            pending_intents: self.pending.len(),
            last_batch_root: last.map(|b| b.root),
            last_batch_tx: last.map(|b| b.tx_hash),
            batches_executed: self.history.len() as u64,
        }
    }

    /// Executed batches, oldest first.
    pub fn history(&self) -> &[BatchRecord] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, uint};
    use intent_core::signing::{IntentSigner, ANVIL_CHAIN_ID};
    use intent_core::types::PoolKey;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const OTHER_PRIVATE_KEY: &str =
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const NOW: u64 = 1_700_000_000;

    fn domain() -> IntentDomain {
        IntentDomain::new(
            ANVIL_CHAIN_ID,
            address!("0000000000000000000000000000000000001234"),
        )
    }

    fn signer(key: &str) -> IntentSigner {
        IntentSigner::from_private_key(key, domain()).unwrap()
    }

    fn intent_for(user: Address, nonce: u64) -> Intent {
        Intent {
            user,
            pool: PoolKey::new(
                address!("0000000000000000000000000000000000001111"),
                address!("0000000000000000000000000000000000002222"),
                3000,
                60,
                Address::ZERO,
            ),
            tick_lower: -600,
            tick_upper: 600,
            amount: U256::from(1_000u64),
            nonce: U256::from(nonce),
            deadline: NOW + 3600,
        }
    }

    fn signed(key: &str, nonce: u64) -> (Intent, PackedSignature) {
        let signer = signer(key);
        let intent = intent_for(signer.address(), nonce);
        let signature = signer.sign_intent(&intent).unwrap();
        (intent, signature)
    }

    #[test]
    fn test_submit_accepts_valid_intent() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 0);

        assert_eq!(pool.submit(intent.clone(), signature, NOW).unwrap(), 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pending()[0].intent, intent);
    }

    #[test]
    fn test_expired_intent_rejected() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 0);

        let result = pool.submit(intent, signature, NOW + 7200);
        assert!(matches!(result, Err(IntakeError::Expired { .. })));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_deadline_equal_to_now_accepted() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 0);
        let deadline = intent.deadline;
        assert!(pool.submit(intent, signature, deadline).is_ok());
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let mut pool = IntentPool::new(domain());
        let victim = signer(TEST_PRIVATE_KEY).address();
        let intent = intent_for(victim, 0);
        let signature = signer(OTHER_PRIVATE_KEY).sign_intent(&intent).unwrap();

        match pool.submit(intent, signature, NOW) {
            Err(IntakeError::SignerMismatch { expected, recovered }) => {
                assert_eq!(expected, victim);
                assert_eq!(recovered, signer(OTHER_PRIVATE_KEY).address());
            }
            other => panic!("expected signer mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_signature_from_other_domain_rejected() {
        let mut pool = IntentPool::new(domain());
        let foreign = IntentSigner::from_private_key(
            TEST_PRIVATE_KEY,
            IntentDomain::new(1, address!("0000000000000000000000000000000000001234")),
        )
        .unwrap();
        let intent = intent_for(foreign.address(), 0);
        let signature = foreign.sign_intent(&intent).unwrap();

        assert!(pool.submit(intent, signature, NOW).is_err());
    }

    #[test]
    fn test_high_s_signature_rejected() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 0);

        // n - s with the parity flipped still recovers the same address
        let order =
            uint!(0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141_U256);
        let s = U256::from_be_bytes(signature.s().0);
        let mut bytes = *signature.as_bytes();
        bytes[32..64].copy_from_slice(&(order - s).to_be_bytes::<32>());
        bytes[64] = if signature.v() == 27 { 28 } else { 27 };

        let result = pool.submit(intent, PackedSignature::from_bytes(bytes), NOW);
        assert!(matches!(
            result,
            Err(IntakeError::Core(intent_core::Error::InvalidSignature { .. }))
        ));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_duplicate_nonce_rejected() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 5);
        pool.submit(intent.clone(), signature, NOW).unwrap();

        let result = pool.submit(intent, signature, NOW);
        assert!(matches!(result, Err(IntakeError::DuplicateNonce { .. })));
        assert_eq!(pool.len(), 1);

        // same nonce from a different user is fine
        let (other, other_sig) = signed(OTHER_PRIVATE_KEY, 5);
        assert_eq!(pool.submit(other, other_sig, NOW).unwrap(), 2);
    }

    #[test]
    fn test_nonce_reusable_after_drain() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 1);
        pool.submit(intent.clone(), signature, NOW).unwrap();
        pool.drain();
        assert!(pool.submit(intent, signature, NOW).is_ok());
    }

    #[test]
    fn test_invalid_intent_is_core_error() {
        let mut pool = IntentPool::new(domain());
        let (mut intent, signature) = signed(TEST_PRIVATE_KEY, 0);
        intent.tick_lower = -610;

        let result = pool.submit(intent, signature, NOW);
        assert!(matches!(
            result,
            Err(IntakeError::Core(intent_core::Error::Validation { .. }))
        ));
    }

    #[test]
    fn test_submit_request() {
        let mut pool = IntentPool::new(domain());
        let (intent, signature) = signed(TEST_PRIVATE_KEY, 9);

        let request = IntentRequest {
            user: intent.user.to_string(),
            pool_currency0: intent.pool.currency0.to_string(),
            pool_currency1: intent.pool.currency1.to_string(),
            pool_fee: intent.pool.fee,
            pool_tick_spacing: intent.pool.tick_spacing,
            pool_hooks: intent.pool.hooks.to_string(),
            tick_lower: intent.tick_lower,
            tick_upper: intent.tick_upper,
            amount: intent.amount.to_string(),
            nonce: intent.nonce.to_string(),
            deadline: intent.deadline,
            signature: signature.to_hex(),
        };

        assert_eq!(pool.submit_request(request.clone(), NOW).unwrap(), 1);

        let mut bad = request;
        bad.signature = "0x1234".to_string();
        assert!(matches!(
            pool.submit_request(bad, NOW),
            Err(IntakeError::Core(intent_core::Error::InvalidSignature { .. }))
        ));
    }

    #[test]
    fn test_drain_and_requeue_preserve_order() {
        let mut pool = IntentPool::new(domain());
        for nonce in 0..3 {
            let (intent, signature) = signed(TEST_PRIVATE_KEY, nonce);
            pool.submit(intent, signature, NOW).unwrap();
        }

        let drained = pool.drain();
        assert!(pool.is_empty());

        let (late, late_sig) = signed(OTHER_PRIVATE_KEY, 0);
        pool.submit(late, late_sig, NOW).unwrap();
        pool.requeue(drained);

        let nonces: Vec<U256> = pool.pending().iter().map(|p| p.intent.nonce).collect();
        assert_eq!(
            nonces,
            vec![U256::from(0u64), U256::from(1u64), U256::from(2u64), U256::from(0u64)]
        );
    }

    #[test]
    fn test_record_batch_updates_status() {
        let mut pool = IntentPool::new(domain());
        assert_eq!(
            pool.status(),
            BatchStatus {
                pending_intents: 0,
                last_batch_root: None,
                last_batch_tx: None,
                batches_executed: 0,
            }
        );

        let root = B256::repeat_byte(0xaa);
        let tx = B256::repeat_byte(0xbb);
        let record_id = pool.record_batch(root, tx, 3).id;

        let status = pool.status();
        assert_eq!(status.last_batch_root, Some(root));
        assert_eq!(status.last_batch_tx, Some(tx));
        assert_eq!(status.batches_executed, 1);

        pool.record_batch(B256::repeat_byte(0xcc), tx, 2);
        assert_eq!(pool.history().len(), 2);
        assert_eq!(pool.history()[0].id, record_id);
        assert_ne!(pool.history()[1].id, record_id);
        assert_eq!(pool.status().last_batch_root, Some(B256::repeat_byte(0xcc)));
    }

    #[test]
    fn test_status_serializes() {
        let mut pool = IntentPool::new(domain());
        pool.record_batch(B256::repeat_byte(0x01), B256::repeat_byte(0x02), 2);

        let json = serde_json::to_value(pool.status()).unwrap();
        assert_eq!(json["batches_executed"], 1);
        assert_eq!(json["pending_intents"], 0);
        assert!(json["last_batch_root"].as_str().unwrap().starts_with("0x0101"));
    }
}
