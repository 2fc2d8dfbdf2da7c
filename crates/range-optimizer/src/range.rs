//! Volatility-driven liquidity range sizing.
//!
//! The range spans `k` standard deviations of annualized volatility on each
//! side of the current price:
//!
//! ```text
//! lower = round(tick(p * e^(-k * vol)))
//! upper = round(tick(p * e^( k * vol))) + spacing
//! ```

use intent_core::config::OptimizerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RangeError, Result};
use crate::tick_math::{
    max_usable_tick, min_usable_tick, price_to_tick, round_tick, tick_to_price,
};
use crate::volatility::historical_volatility;

/// Volatility used when the measured value is zero or negative.
pub const MIN_VOLATILITY: f64 = 0.01;

/// A `[lower, upper)` tick range aligned to a pool's spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl TickRange {
    /// Width in ticks.
    pub fn width(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }

    /// Prices at the two range edges.
    pub fn price_bounds(&self) -> (f64, f64) {
        (tick_to_price(self.tick_lower), tick_to_price(self.tick_upper))
    }

    pub fn contains_price(&self, price: f64) -> bool {
        let (lower, upper) = self.price_bounds();
        price >= lower && price < upper
    }
}

/// Size a range around `price` for the given volatility and multiplier.
///
/// Both edges are multiples of `tick_spacing` and lie within the usable tick
/// bounds for that spacing, with `tick_lower < tick_upper`.
pub fn optimal_range(
    price: f64,
    volatility: f64,
    k_multiplier: f64,
    tick_spacing: i32,
) -> Result<TickRange> {
    price_to_tick(price)?;
    if !(k_multiplier.is_finite() && k_multiplier > 0.0) {
        return Err(RangeError::InvalidMultiplier { k: k_multiplier });
    }
    if volatility.is_nan() || volatility.is_infinite() {
        return Err(RangeError::InvalidVolatility { volatility });
    }

    let volatility = if volatility <= 0.0 {
        MIN_VOLATILITY
    } else {
        volatility
    };

    let min_tick = min_usable_tick(tick_spacing)?;
    let max_tick = max_usable_tick(tick_spacing)?;
    let offset = k_multiplier * volatility;

    let mut tick_lower = round_tick(edge_tick(price * (-offset).exp(), min_tick), tick_spacing)?;
    let mut tick_upper =
        round_tick(edge_tick(price * offset.exp(), max_tick), tick_spacing)? + tick_spacing;

    if tick_lower >= tick_upper {
        tick_upper = tick_lower + tick_spacing;
    }

    tick_lower = tick_lower.clamp(min_tick, max_tick - tick_spacing);
    tick_upper = tick_upper.clamp(tick_lower + tick_spacing, max_tick);

    Ok(TickRange {
        tick_lower,
        tick_upper,
    })
}

/// Tick at an edge price; prices that overflow or underflow saturate.
fn edge_tick(price: f64, saturated: i32) -> i32 {
    price_to_tick(price).unwrap_or(saturated)
}

/// Recommends ranges from recent price history.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeOptimizer {
    k_multiplier: f64,
    volatility_window: usize,
}

impl RangeOptimizer {
    pub fn new(k_multiplier: f64, volatility_window: usize) -> Self {
        Self {
            k_multiplier,
            volatility_window,
        }
    }

    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(config.k_multiplier, config.volatility_window)
    }

    pub fn k_multiplier(&self) -> f64 {
        self.k_multiplier
    }

    /// Size a range from hourly `prices`, oldest first.
    ///
    /// The latest price is the center; volatility uses the trailing window.
    pub fn recommend(&self, prices: &[f64], tick_spacing: i32) -> Result<TickRange> {
        let current = *prices.last().ok_or(RangeError::NoPrices)?;
        let start = prices.len().saturating_sub(self.volatility_window);
        let volatility = historical_volatility(&prices[start..]);

        let range = optimal_range(current, volatility, self.k_multiplier, tick_spacing)?;
        debug!(
            price = current,
            volatility,
            k = self.k_multiplier,
            tick_lower = range.tick_lower,
            tick_upper = range.tick_upper,
            "Computed optimal range"
        );
        Ok(range)
    }
}

impl Default for RangeOptimizer {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}
