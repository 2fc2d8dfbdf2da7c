//! Core domain types for LP intents.

pub mod intent;
pub mod pool_key;
pub mod request;

pub use intent::*;
pub use pool_key::*;
pub use request::*;
