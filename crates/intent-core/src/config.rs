//! Configuration management for PrivBatch.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::signing::{parse_address, IntentDomain, SEPOLIA_CHAIN_ID};
use crate::{Error, Result};

/// Prefix for environment overrides layered over a config file.
pub const ENV_PREFIX: &str = "PRIVBATCH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chain: ChainConfig,
    pub batch: BatchConfig,
    pub optimizer: OptimizerConfig,
}

/// Deployment the intents are signed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Address of the hook contract that verifies intents.
    pub verifying_contract: Address,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            verifying_contract: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pending intents required before a batch is assembled.
    pub min_batch_size: usize,
    pub max_batch_wait_secs: u64,
    pub batch_check_interval_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_batch_size: 2,
            max_batch_wait_secs: 60,
            batch_check_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Range half-width in standard deviations.
    pub k_multiplier: f64,
    /// Number of hourly prices used for volatility.
    pub volatility_window: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            k_multiplier: 2.0,
            volatility_window: 24,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Unset variables fall back to defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let verifying_contract = match env::var("VERIFYING_CONTRACT")
            .or_else(|_| env::var("HOOK_ADDRESS"))
        {
            Ok(value) => parse_address(&value)?,
            Err(_) => defaults.chain.verifying_contract,
        };

        let config = Self {
            chain: ChainConfig {
                chain_id: parse_var("CHAIN_ID", defaults.chain.chain_id)?,
                verifying_contract,
            },
            batch: BatchConfig {
                min_batch_size: parse_var("MIN_BATCH_SIZE", defaults.batch.min_batch_size)?,
                max_batch_wait_secs: parse_var(
                    "MAX_BATCH_WAIT_SECS",
                    defaults.batch.max_batch_wait_secs,
                )?,
                batch_check_interval_secs: parse_var(
                    "BATCH_CHECK_INTERVAL_SECS",
                    defaults.batch.batch_check_interval_secs,
                )?,
            },
            optimizer: OptimizerConfig {
                k_multiplier: parse_var("K_MULTIPLIER", defaults.optimizer.k_multiplier)?,
                volatility_window: parse_var(
                    "VOLATILITY_WINDOW",
                    defaults.optimizer.volatility_window,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a config file (format inferred from the extension) with
    /// `PRIVBATCH__SECTION__FIELD` environment overrides on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch.min_batch_size == 0 {
            return Err(Error::Config {
                message: "min_batch_size must be at least 1".to_string(),
            });
        }
        if !(self.optimizer.k_multiplier.is_finite() && self.optimizer.k_multiplier > 0.0) {
            return Err(Error::Config {
                message: format!(
                    "k_multiplier must be a positive number, got {}",
                    self.optimizer.k_multiplier
                ),
            });
        }
        if self.optimizer.volatility_window < 2 {
            return Err(Error::Config {
                message: "volatility_window must cover at least two prices".to_string(),
            });
        }
        Ok(())
    }

    /// EIP-712 domain for the configured deployment.
    pub fn domain(&self) -> IntentDomain {
        IntentDomain::new(self.chain.chain_id, self.chain.verifying_contract)
    }

    /// Local Anvil deployment, used by tests.
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            chain: ChainConfig {
                chain_id: crate::signing::ANVIL_CHAIN_ID,
                verifying_contract: alloy_primitives::address!(
                    "0000000000000000000000000000000000001234"
                ),
            },
            ..Self::default()
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e| Error::Config {
            message: format!("{name} is not valid: {e}"),
        }),
        Err(_) => Ok(default),
    }
}
