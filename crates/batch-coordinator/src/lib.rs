//! Batch Coordinator
//!
//! Intent intake, batch assembly and `executeBatch` calldata for the
//! PrivBatch executor contract.

pub mod abi;
pub mod batch;
pub mod pool;

pub use abi::{encode_execute_batch, executeBatchCall, SolLPIntent, SolPoolKey};
pub use batch::{BatchAssembler, PreparedBatch};
pub use pool::{BatchRecord, BatchStatus, IntakeError, IntentPool, PendingIntent};
