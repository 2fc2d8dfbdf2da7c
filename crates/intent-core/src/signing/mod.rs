//! EIP-712 typed data hashing and signatures for LP intents.
//!
//! # Architecture
//!
//! ```text
//! Intent ──► typed_data::hash_intent ──► struct hash ──► Merkle leaf
//!                     │
//! IntentDomain ──► separator
//!                     │
//!                     ▼
//!        keccak256(0x1901 ++ separator ++ struct hash)
//!                     │
//!        IntentSigner::sign_intent / signature::recover
//!                     │
//!                     ▼
//!           PackedSignature (r ++ s ++ v)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use intent_core::signing::{recover_intent_signer, IntentDomain, IntentSigner};
//!
//! let domain = IntentDomain::new(31337, verifier_address);
//! let signer = IntentSigner::from_private_key("0x...", domain.clone())?;
//! let signature = signer.sign_intent(&intent)?;
//!
//! assert_eq!(recover_intent_signer(&intent, &signature, &domain)?, intent.user);
//! ```

pub mod domain;
pub mod signature;
pub mod signer;
pub mod typed_data;

pub use domain::{
    IntentDomain, ANVIL_CHAIN_ID, DOMAIN_NAME, DOMAIN_VERSION, EIP712_DOMAIN_TYPE,
    SEPOLIA_CHAIN_ID,
};

pub use signature::{
    recover, recover_intent_signer, sign, PackedSignature, SECP256K1N_HALF, SIGNATURE_LENGTH,
};

pub use signer::{IntentSigner, SIGNER_KEY_ENV};

pub use typed_data::{
    build_signing_payload, hash_intent, hash_pool_key, lp_intent_type_hash, parse_address,
    pool_key_type_hash, signing_digest, signing_payload, SigningPayload, LP_INTENT_TYPE,
    POOL_KEY_TYPE,
};
