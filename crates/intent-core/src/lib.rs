//! PrivBatch Intent Core
//!
//! Typed-data hashing, signatures and batch Merkle commitments for LP intents
//! executed by the PrivBatch Uniswap v4 hook.

pub mod config;
pub mod error;
pub mod merkle;
pub mod signing;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use merkle::{compute_leaf, hash_pair, verify_proof, BatchMerkleTree};
pub use signing::{IntentDomain, IntentSigner, PackedSignature};
pub use types::{Intent, IntentRequest, PoolKey};
