//! Numeric primitives shared by every analytics engine
//!
//! Population statistics throughout: variance divides by `n`, not `n - 1`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use statrs::statistics::Statistics;

/// Arithmetic mean; 0 for an empty slice
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().mean()
}

/// Population variance; 0 for an empty slice
pub fn population_variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().population_variance()
}

/// Population standard deviation; 0 for an empty slice
pub fn population_std_dev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().population_std_dev()
}

/// Population variance of fixed-point prices around a known mean
pub fn price_variance(prices: &[Decimal], mean: f64) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = prices
        .iter()
        .map(|p| {
            let deviation = p.to_f64().unwrap_or(0.0) - mean;
            deviation * deviation
        })
        .sum();
    sum_sq / prices.len() as f64
}

/// Exact fixed-point mean; `None` for an empty slice
pub fn decimal_mean(prices: &[Decimal]) -> Option<Decimal> {
    if prices.is_empty() {
        return None;
    }
    let sum: Decimal = prices.iter().sum();
    Some(sum / Decimal::from(prices.len()))
}

/// Smallest and largest value; `None` for an empty slice
pub fn min_max<T: PartialOrd + Copy>(xs: &[T]) -> Option<(T, T)> {
    let first = *xs.first()?;
    Some(xs.iter().fold((first, first), |(lo, hi), &x| {
        (if x < lo { x } else { lo }, if x > hi { x } else { hi })
    }))
}

fn is_constant(xs: &[f64]) -> bool {
    xs.iter().all(|&x| x == xs[0])
}

/// Pearson correlation of two equally long series
///
/// `None` when the lengths differ, either series has fewer than two points,
/// or either series has zero variance.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if is_constant(xs) || is_constant(ys) {
        return None;
    }

    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let mut covariance = 0.0;
    let mut x_var = 0.0;
    let mut y_var = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        covariance += dx * dy;
        x_var += dx * dx;
        y_var += dy * dy;
    }

    if x_var == 0.0 || y_var == 0.0 {
        return None;
    }

    let correlation = covariance / (x_var.sqrt() * y_var.sqrt());
    if correlation.is_finite() {
        Some(correlation.clamp(-1.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mean_and_population_std_dev() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&xs), 5.0, epsilon = 1e-12);
        assert_relative_eq!(population_variance(&xs), 4.0, epsilon = 1e-12);
        assert_relative_eq!(population_std_dev(&xs), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(price_variance(&[], 1.0), 0.0);
        assert_eq!(decimal_mean(&[]), None);
        assert_eq!(min_max::<f64>(&[]), None);
    }

    #[test]
    fn test_single_point_has_zero_dispersion() {
        assert_eq!(population_std_dev(&[1.5]), 0.0);
    }

    #[test]
    fn test_price_variance() {
        let prices = [dec!(1.0), dec!(2.0), dec!(3.0)];
        let m = decimal_mean(&prices).unwrap();
        assert_eq!(m, dec!(2));
        assert_relative_eq!(price_variance(&prices, 2.0), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5, 2.0]), Some((-1.0, 7.5)));
        assert_eq!(min_max(&[dec!(1.2), dec!(0.9)]), Some((dec!(0.9), dec!(1.2))));
    }

    #[test]
    fn test_pearson_perfect() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 6.0, 8.0, 10.0];
        let inverse = [5.0, 4.0, 3.0, 2.0, 1.0];

        assert_relative_eq!(pearson_correlation(&xs, &xs).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson_correlation(&xs, &ys).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson_correlation(&xs, &inverse).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_undefined() {
        assert_eq!(pearson_correlation(&[1.0], &[1.0]), None);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_pearson_symmetric() {
        let xs = [0.01, -0.02, 0.015, 0.003, -0.007];
        let ys = [0.004, -0.01, 0.02, -0.001, 0.0];
        assert_relative_eq!(
            pearson_correlation(&xs, &ys).unwrap(),
            pearson_correlation(&ys, &xs).unwrap(),
            epsilon = 1e-15
        );
    }
}
