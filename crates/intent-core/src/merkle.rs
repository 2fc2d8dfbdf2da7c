//! Batch Merkle tree over intent leaves.
//!
//! Mirrors `BatchMerkle.computeRoot` on-chain: sibling pairs are hashed in
//! sorted order and an odd node at the end of a layer is promoted to the next
//! layer unchanged. Proofs therefore carry no left/right flags, and a carried
//! node contributes no sibling for that layer.

use alloy_primitives::{keccak256, B256};
use tracing::debug;

use crate::signing::hash_intent;
use crate::types::Intent;
use crate::{Error, Result};

/// Hash two nodes after ordering them bytewise.
pub fn hash_pair(a: &B256, b: &B256) -> B256 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(first.as_slice());
    buf[32..].copy_from_slice(second.as_slice());
    keccak256(buf)
}

/// Fold `leaf` through `proof` and compare against `root`.
pub fn verify_proof(leaf: &B256, proof: &[B256], root: &B256) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |node, sibling| hash_pair(&node, sibling));
    computed == *root
}

/// Merkle leaf for an intent: its EIP-712 struct hash.
pub fn compute_leaf(intent: &Intent) -> Result<B256> {
    hash_intent(intent)
}

/// Immutable Merkle tree committing an ordered batch of leaves.
///
/// Identical leaves are accepted; their proofs verify but cannot be told
/// apart from one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMerkleTree {
    /// `layers[0]` holds the leaves, the last layer holds only the root.
    layers: Vec<Vec<B256>>,
}

impl BatchMerkleTree {
    /// Build the tree bottom-up from an ordered, non-empty leaf sequence.
    pub fn build(leaves: &[B256]) -> Result<Self> {
        if leaves.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let mut layers = vec![leaves.to_vec()];
        while layers[layers.len() - 1].len() > 1 {
            let next = layers[layers.len() - 1]
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [carried] => *carried,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        let tree = Self { layers };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            root = %tree.root(),
            "Built batch Merkle tree"
        );
        Ok(tree)
    }

    /// Build a tree whose leaves are the struct hashes of `intents`, in order.
    pub fn from_intents(intents: &[Intent]) -> Result<Self> {
        let leaves = intents
            .iter()
            .map(compute_leaf)
            .collect::<Result<Vec<_>>>()?;
        Self::build(&leaves)
    }

    pub fn root(&self) -> B256 {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaves(&self) -> &[B256] {
        &self.layers[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of hashing layers above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn layers(&self) -> &[Vec<B256>] {
        &self.layers
    }

    /// Sibling hashes from the leaf at `index` up to the root.
    pub fn proof(&self, index: usize) -> Result<Vec<B256>> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(Error::IndexOutOfRange { index, leaf_count });
        }

        Ok(self.sibling_path(index))
    }

    /// Proofs for every leaf, in leaf order.
    pub fn proofs(&self) -> Vec<Vec<B256>> {
        (0..self.leaf_count())
            .map(|i| self.sibling_path(i))
            .collect()
    }

    // `index` must be below `leaf_count()`.
    fn sibling_path(&self, index: usize) -> Vec<B256> {
        let mut proof = Vec::with_capacity(self.depth());
        let mut idx = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            if idx % 2 == 0 {
                // a carried node has no right sibling
                if let Some(sibling) = layer.get(idx + 1) {
                    proof.push(*sibling);
                }
            } else {
                proof.push(layer[idx - 1]);
            }
            idx /= 2;
        }
        proof
    }

    /// Verify `proof` for `leaf` against this tree's root.
    pub fn verify(&self, leaf: &B256, proof: &[B256]) -> bool {
        verify_proof(leaf, proof, &self.root())
    }
}
