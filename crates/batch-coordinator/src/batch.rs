//! Batch assembly: Merkle commitment and `executeBatch` calldata.

use alloy_primitives::{Bytes, B256};
use intent_core::config::BatchConfig;
use intent_core::merkle::{verify_proof, BatchMerkleTree};
use intent_core::signing::PackedSignature;
use intent_core::types::Intent;
use intent_core::Result;
use tracing::{error, info};

use crate::abi::encode_execute_batch;
use crate::pool::{IntentPool, PendingIntent};

/// Everything needed to submit one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBatch {
    pub intents: Vec<Intent>,
    pub signatures: Vec<PackedSignature>,
    pub leaves: Vec<B256>,
    pub root: B256,
    /// One proof per intent, in intent order.
    pub proofs: Vec<Vec<B256>>,
    /// ABI-encoded `executeBatch(intents, signatures, proofs)`.
    pub calldata: Bytes,
}

impl PreparedBatch {
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Root as `0x`-prefixed hex.
    pub fn root_hex(&self) -> String {
        alloy_primitives::hex::encode_prefixed(self.root)
    }

    /// Check every proof against the root.
    pub fn verify_all(&self) -> bool {
        self.leaves
            .iter()
            .zip(&self.proofs)
            .all(|(leaf, proof)| verify_proof(leaf, proof, &self.root))
    }
}

/// Turns pending intents into submittable batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAssembler {
    min_batch_size: usize,
}

impl BatchAssembler {
    pub fn new(min_batch_size: usize) -> Self {
        Self {
            min_batch_size: min_batch_size.max(1),
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.min_batch_size)
    }

    pub fn min_batch_size(&self) -> usize {
        self.min_batch_size
    }

    /// Whether `pool` holds enough intents to assemble a batch.
    pub fn is_ready(&self, pool: &IntentPool) -> bool {
        pool.len() >= self.min_batch_size
    }

    /// Build the tree, proofs and calldata for `pending`, in order.
    pub fn prepare(&self, pending: &[PendingIntent]) -> Result<PreparedBatch> {
        let intents: Vec<Intent> = pending.iter().map(|p| p.intent.clone()).collect();
        let signatures: Vec<PackedSignature> = pending.iter().map(|p| p.signature).collect();

        let tree = BatchMerkleTree::from_intents(&intents)?;
        let proofs = tree.proofs();
        let calldata = encode_execute_batch(&intents, &signatures, &proofs)?;

        Ok(PreparedBatch {
            leaves: tree.leaves().to_vec(),
            root: tree.root(),
            intents,
            signatures,
            proofs,
            calldata,
        })
    }

    /// Drain and assemble a batch once enough intents are pending.
    ///
    /// Returns `Ok(None)` and leaves the pool untouched below the threshold.
    /// If assembly fails the drained intents are put back.
    pub fn take_ready(&self, pool: &mut IntentPool) -> Result<Option<PreparedBatch>> {
        if !self.is_ready(pool) {
            return Ok(None);
        }

        let pending = pool.drain();
        match self.prepare(&pending) {
            Ok(batch) => {
                info!(
                    intents = batch.len(),
                    root = %batch.root,
                    calldata_bytes = batch.calldata.len(),
                    "Assembled batch"
                );
                Ok(Some(batch))
            }
            Err(e) => {
                error!(error = %e, intents = pending.len(), "Batch assembly failed");
                pool.requeue(pending);
                Err(e)
            }
        }
    }
}

impl Default for BatchAssembler {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}
