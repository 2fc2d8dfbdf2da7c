//! Conversions between prices and Uniswap ticks.
//!
//! A tick `t` corresponds to the price `1.0001^t`.

use intent_core::types::{MAX_TICK, MIN_TICK};

use crate::error::{RangeError, Result};

/// Price ratio between adjacent ticks.
pub const TICK_BASE: f64 = 1.0001;

/// Largest tick `<= log_1.0001(price)`.
///
/// The result is not clamped to the valid tick bounds.
pub fn price_to_tick(price: f64) -> Result<i32> {
    if !(price.is_finite() && price > 0.0) {
        return Err(RangeError::InvalidPrice { price });
    }
    Ok((price.ln() / TICK_BASE.ln()).floor() as i32)
}

pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powi(tick)
}

/// Round `tick` down to a multiple of `spacing`.
///
/// Rounds toward negative infinity, so `round_tick(-100, 60) == -120`.
pub fn round_tick(tick: i32, spacing: i32) -> Result<i32> {
    check_spacing(spacing)?;
    Ok(tick.div_euclid(spacing) * spacing)
}

/// Lowest tick a position with `spacing` can use.
pub fn min_usable_tick(spacing: i32) -> Result<i32> {
    check_spacing(spacing)?;
    Ok((MIN_TICK / spacing) * spacing)
}

/// Highest tick a position with `spacing` can use.
pub fn max_usable_tick(spacing: i32) -> Result<i32> {
    check_spacing(spacing)?;
    Ok((MAX_TICK / spacing) * spacing)
}

fn check_spacing(spacing: i32) -> Result<()> {
    if spacing <= 0 || spacing > MAX_TICK {
        return Err(RangeError::InvalidTickSpacing { spacing });
    }
    Ok(())
}
