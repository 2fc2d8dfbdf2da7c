//! Realized volatility from an hourly price series.

/// Hourly observations per year, used to annualize.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Annualized volatility of hourly `prices`.
///
/// Uses the sample standard deviation of log returns. Pairs where either
/// price is not positive are skipped. Fewer than two usable returns give 0.
pub fn historical_volatility(prices: &[f64]) -> f64 {
    let log_returns: Vec<f64> = prices
        .windows(2)
        .filter(|pair| pair[0] > 0.0 && pair[1] > 0.0)
        .map(|pair| (pair[1] / pair[0]).ln())
        .collect();

    let n = log_returns.len();
    if n < 2 {
        return 0.0;
    }

    let mean = log_returns.iter().sum::<f64>() / n as f64;
    let variance = log_returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;

    variance.sqrt() * HOURS_PER_YEAR.sqrt()
}
