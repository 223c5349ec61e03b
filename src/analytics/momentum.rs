//! Momentum, moving averages and z-score

/// `(p[last] - p[last - period]) / p[last - period]`
///
/// `None` when the series holds fewer than `period + 1` prices or the
/// reference price is zero.
pub fn momentum(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }
    let last = prices[prices.len() - 1];
    let reference = prices[prices.len() - 1 - period];
    if reference == 0.0 {
        return None;
    }
    Some((last - reference) / reference)
}

/// Mean of the last `period` prices; `None` if fewer are available
pub fn sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let tail = &prices[prices.len() - period..];
    Some(tail.iter().sum::<f64>() / period as f64)
}

/// `(last - mean) / std_dev`; 0 for zero dispersion
pub fn z_score(last: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (last - mean) / std_dev
}
