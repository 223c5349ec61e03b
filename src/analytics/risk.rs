//! Drawdown and Value-at-Risk
//!
//! Both VaR estimators return 0 when fewer than `min_sample` returns are
//! available. All results are decimal fractions; losses are negative.

use super::statistics::{mean, population_std_dev};

/// Most negative decline from a running peak, `(p - peak) / peak`
///
/// Always `<= 0`; exactly 0 for a non-decreasing series. Single pass, no
/// look-ahead.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = match prices.first() {
        Some(first) => *first,
        None => return 0.0,
    };

    let mut worst = 0.0_f64;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            let drawdown = (price - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }
    worst
}

/// Empirical quantile of the return distribution at `percentile`
///
/// Sorted ascending; the value at index `floor(n * percentile)`.
pub fn historical_var(returns: &[f64], percentile: f64, min_sample: usize) -> f64 {
    if returns.len() < min_sample || returns.is_empty() {
        return 0.0;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = ((sorted.len() as f64 * percentile).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

/// Normal-distribution VaR: `mean - z * stddev`
pub fn parametric_var(returns: &[f64], z_score: f64, min_sample: usize) -> f64 {
    if returns.len() < min_sample || returns.is_empty() {
        return 0.0;
    }
    mean(returns) - z_score * population_std_dev(returns)
}
