//! Error types for the PrivBatch intent core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A field could not be encoded into its fixed-width EIP-712 slot.
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    /// A field is well-formed but semantically invalid.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Signature bytes are malformed or public key recovery failed.
    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    #[error("Cannot build a Merkle tree from an empty batch")]
    EmptyBatch,

    #[error("Leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_signature(message: impl Into<String>) -> Self {
        Error::InvalidSignature {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
