//! Range optimizer errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Price must be positive and finite, got {price}")]
    InvalidPrice { price: f64 },

    #[error("Tick spacing must be between 1 and 887272, got {spacing}")]
    InvalidTickSpacing { spacing: i32 },

    #[error("Multiplier must be positive and finite, got {k}")]
    InvalidMultiplier { k: f64 },

    #[error("Volatility must be finite, got {volatility}")]
    InvalidVolatility { volatility: f64 },

    #[error("Need at least one price to size a range")]
    NoPrices,
}

pub type Result<T> = std::result::Result<T, RangeError>;
