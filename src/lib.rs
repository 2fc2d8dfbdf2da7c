//! PrivBatch: private batched liquidity intents for Uniswap v4
//!
//! This is the root crate that provides benchmark access to the internal modules.
//! For actual functionality, use the individual crates directly:
//!
//! - `intent-core`: Intent types, EIP-712 hashing, signatures, batch Merkle trees, config
//! - `range-optimizer`: Tick math, realized volatility, range sizing
//! - `batch-coordinator`: Intent intake pool, batch assembly, `executeBatch` calldata

// Re-export for benchmarks
pub use batch_coordinator as batch;
pub use intent_core as core;
pub use range_optimizer as range;
