//! EIP-712 domain separator for PrivBatch intents.
//!
//! Signatures are bound to the protocol name, version, chain and the
//! contract that verifies them, so an intent signed for one deployment
//! cannot be replayed against another.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// Protocol name used in the domain separator.
pub const DOMAIN_NAME: &str = "PrivBatch";

/// Domain version string.
pub const DOMAIN_VERSION: &str = "1";

/// Chain ID for Ethereum Sepolia.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Chain ID for a local Anvil node.
pub const ANVIL_CHAIN_ID: u64 = 31337;

/// Type string of the EIP-712 domain struct.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 domain the intent verifier contract was deployed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDomain {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain ID.
    pub chain_id: U256,
    /// Verifying contract address.
    pub verifying_contract: Address,
}

impl IntentDomain {
    /// PrivBatch domain on `chain_id` for the given verifier contract.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self::custom(DOMAIN_NAME, DOMAIN_VERSION, chain_id, verifying_contract)
    }

    /// Create domain with custom parameters.
    pub fn custom(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(EIP712_DOMAIN_TYPE.as_bytes());

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());

        let encoded = (
            domain_type_hash,
            name_hash,
            version_hash,
            self.chain_id,
            self.verifying_contract.into_word(),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}
