//! Range Optimizer
//!
//! Price/tick conversions, realized volatility and volatility-driven tick
//! ranges for PrivBatch liquidity intents.

pub mod error;
pub mod range;
pub mod tick_math;
pub mod volatility;

pub use error::{RangeError, Result};
pub use range::{optimal_range, RangeOptimizer, TickRange, MIN_VOLATILITY};
pub use tick_math::{
    max_usable_tick, min_usable_tick, price_to_tick, round_tick, tick_to_price, TICK_BASE,
};
pub use volatility::{historical_volatility, HOURS_PER_YEAR};
