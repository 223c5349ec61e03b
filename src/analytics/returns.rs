//! Daily returns and compounding
//!
//! Returns are decimals (0.0028 = 0.28%) everywhere in this module.

use crate::types::{PriceSeries, ReturnSeries};

/// Simple returns `(p[i] - p[i-1]) / p[i-1]`; 0 for a step from a zero price
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}

/// Log returns `ln(p[i] / p[i-1])`; 0 for a step touching a non-positive price
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            if w[0] <= 0.0 || w[1] <= 0.0 {
                0.0
            } else {
                (w[1] / w[0]).ln()
            }
        })
        .collect()
}

/// Geometrically compounded return `prod(1 + r) - 1`
pub fn cumulative_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// `(1 + cumulative)^(periods_per_year / n) - 1` over `n` daily returns
pub fn annualized_return(cumulative: f64, n: usize, periods_per_year: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let growth = 1.0 + cumulative;
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(periods_per_year as f64 / n as f64) - 1.0
}

/// Simple returns of a price series, each keyed by the date it ends on
pub fn simple_return_series(series: &PriceSeries) -> ReturnSeries {
    ReturnSeries {
        dates: series.dates.iter().skip(1).copied().collect(),
        values: simple_returns(&series.values()),
    }
}
