//! Rolling window statistics
//!
//! Two flavours:
//!
//! - trailing windows: the last `W` prices of a series (one result per window
//!   size), attached to each currency's metrics record
//! - sliding windows: every run of `W` consecutive trading dates in a range,
//!   with per-currency statistics over the rates observed in that run

use super::statistics::{mean, min_max, population_std_dev, population_variance};
use crate::config::Precision;
use crate::rounding::{round_f64, to_percent};
use crate::types::{CurrencyCode, TimeSeries};
use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics over the most recent `size` prices of a series
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingWindow {
    pub size: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// `(p[last] - p[window_start]) / p[window_start]`
    pub window_return: f64,
    /// Population stddev of the window's `size - 1` returns, annualized
    pub annualized_volatility: f64,
}

/// Evaluate one trailing window
///
/// `returns` must be the full return series of `prices` (length n - 1).
/// `None` if the series is shorter than `size` or the window spans fewer than
/// two returns.
pub fn trailing_window(
    prices: &[f64],
    returns: &[f64],
    size: usize,
    annualization_factor: f64,
) -> Option<TrailingWindow> {
    if size == 0 || prices.len() < size {
        return None;
    }
    let return_count = size - 1;
    if return_count < 2 || returns.len() < return_count {
        return None;
    }

    let window = &prices[prices.len() - size..];
    let window_returns = &returns[returns.len() - return_count..];

    let start = window[0];
    let end = window[window.len() - 1];
    let window_return = if start == 0.0 { 0.0 } else { (end - start) / start };

    Some(TrailingWindow {
        size,
        mean: mean(window),
        std_dev: population_std_dev(window),
        window_return,
        annualized_volatility: population_std_dev(window_returns) * annualization_factor,
    })
}

/// Evaluate every configured size in parallel; sizes the series cannot fill
/// are left out. Output is ordered by window size.
pub fn trailing_windows(
    prices: &[f64],
    returns: &[f64],
    sizes: &[usize],
    annualization_factor: f64,
) -> Vec<TrailingWindow> {
    let mut windows: Vec<TrailingWindow> = sizes
        .par_iter()
        .filter_map(|&size| trailing_window(prices, returns, size, annualization_factor))
        .collect();
    windows.sort_by_key(|w| w.size);
    windows
}

/// Per-currency statistics over one sliding window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub variance: f64,
    /// Change from first to last observed rate; percent once rounded
    pub change_pct: f64,
    /// Dates in the window on which this currency was quoted
    pub observations: usize,
}

/// One position of a sliding window over trading dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trading_days: usize,
    pub statistics: BTreeMap<CurrencyCode, WindowStatistics>,
}

impl DateWindow {
    /// Presentation copy: price-level fields to `precision.price`, dispersion
    /// to `std_dev`/`variance` digits and `change_pct` as a percentage
    pub fn rounded(&self, precision: &Precision) -> Self {
        let statistics = self
            .statistics
            .iter()
            .map(|(code, stats)| {
                (
                    code.clone(),
                    WindowStatistics {
                        mean: round_f64(stats.mean, precision.price),
                        min: round_f64(stats.min, precision.price),
                        max: round_f64(stats.max, precision.price),
                        std_dev: round_f64(stats.std_dev, precision.std_dev),
                        variance: round_f64(stats.variance, precision.variance),
                        change_pct: to_percent(stats.change_pct, precision.percent),
                        observations: stats.observations,
                    },
                )
            })
            .collect();

        Self {
            start_date: self.start_date,
            end_date: self.end_date,
            trading_days: self.trading_days,
            statistics,
        }
    }
}

fn window_statistics(values: &[f64]) -> Option<WindowStatistics> {
    let (min, max) = min_max(values)?;
    let first = values[0];
    let last = values[values.len() - 1];

    Some(WindowStatistics {
        mean: mean(values),
        min,
        max,
        std_dev: population_std_dev(values),
        variance: population_variance(values),
        change_pct: if first == 0.0 { 0.0 } else { (last - first) / first },
        observations: values.len(),
    })
}

/// Slide a window of `size` trading dates across `timeseries`
///
/// Positions `0..=(N - size)` are evaluated independently on the rayon pool.
/// Statistics use only the rates actually present on the window's dates.
/// Empty if `size` is 0 or exceeds the number of dates.
pub fn sliding_windows(timeseries: &TimeSeries, size: usize) -> Vec<DateWindow> {
    let days: Vec<_> = timeseries.iter().collect();
    if size == 0 || days.len() < size {
        return Vec::new();
    }

    (0..=days.len() - size)
        .into_par_iter()
        .map(|start| {
            let window = &days[start..start + size];

            let mut observed: BTreeMap<&CurrencyCode, Vec<f64>> = BTreeMap::new();
            for (_, rates) in window {
                for (code, rate) in rates.iter() {
                    observed
                        .entry(code)
                        .or_default()
                        .push(rate.to_f64().unwrap_or(0.0));
                }
            }

            let statistics = observed
                .into_iter()
                .filter_map(|(code, values)| {
                    window_statistics(&values).map(|stats| (code.clone(), stats))
                })
                .collect();

            DateWindow {
                start_date: *window[0].0,
                end_date: *window[size - 1].0,
                trading_days: size,
                statistics,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RateMap;
    use approx::assert_relative_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn rates(entries: &[(&str, Decimal)]) -> RateMap {
        entries.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[test]
    fn test_trailing_window() {
        let prices = [1.0, 1.1, 1.2, 1.1, 1.3];
        let returns = crate::analytics::returns::log_returns(&prices);

        let window = trailing_window(&prices, &returns, 4, 1.0).unwrap();
        assert_eq!(window.size, 4);
        assert_relative_eq!(window.mean, 1.175, epsilon = 1e-12);
        assert_relative_eq!(window.window_return, 0.2 / 1.1, epsilon = 1e-12);
        assert_relative_eq!(
            window.annualized_volatility,
            population_std_dev(&returns[1..]),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_trailing_window_absent() {
        let prices = [1.0, 1.1, 1.2];
        let returns = crate::analytics::returns::log_returns(&prices);

        // Longer than the series
        assert!(trailing_window(&prices, &returns, 4, 1.0).is_none());
        // Only one return in a window of two prices
        assert!(trailing_window(&prices, &returns, 2, 1.0).is_none());
        assert!(trailing_window(&prices, &returns, 3, 1.0).is_some());
    }

    #[test]
    fn test_trailing_windows_sorted_and_sparse() {
        let prices: Vec<f64> = (0..40).map(|i| 1.0 + i as f64 * 0.01).collect();
        let returns = crate::analytics::returns::log_returns(&prices);

        let windows = trailing_windows(&prices, &returns, &[60, 30, 5], 252f64.sqrt());
        let sizes: Vec<_> = windows.iter().map(|w| w.size).collect();
        assert_eq!(sizes, vec![5, 30]);
    }

    #[test]
    fn test_sliding_windows_count() {
        let series: TimeSeries = [
            (day(1), rates(&[("USD", dec!(1.0))])),
            (day(2), rates(&[("USD", dec!(1.1))])),
            (day(3), rates(&[("USD", dec!(1.2))])),
        ]
        .into_iter()
        .collect();

        let windows = sliding_windows(&series, 2);
        assert_eq!(windows.len(), 2);
        assert_eq!((windows[0].start_date, windows[0].end_date), (day(1), day(2)));
        assert_eq!((windows[1].start_date, windows[1].end_date), (day(2), day(3)));

        let first = &windows[0].statistics["USD"];
        assert_relative_eq!(first.mean, 1.05, epsilon = 1e-12);
        assert_relative_eq!(first.min, 1.0);
        assert_relative_eq!(first.max, 1.1);
        assert_relative_eq!(first.std_dev, 0.05, epsilon = 1e-12);
        assert_relative_eq!(first.variance, 0.0025, epsilon = 1e-12);
        assert_relative_eq!(first.change_pct, 0.1, epsilon = 1e-12);

        assert!(sliding_windows(&series, 4).is_empty());
        assert!(sliding_windows(&series, 0).is_empty());
    }

    #[test]
    fn test_sliding_windows_gap_tolerant() {
        let series: TimeSeries = [
            (day(1), rates(&[("USD", dec!(1.0)), ("GBP", dec!(0.85))])),
            (day(2), rates(&[("USD", dec!(1.2))])),
            (day(3), rates(&[("USD", dec!(1.1)), ("GBP", dec!(0.86))])),
        ]
        .into_iter()
        .collect();

        let windows = sliding_windows(&series, 2);
        assert_eq!(windows[0].statistics["GBP"].observations, 1);
        assert_eq!(windows[0].statistics["GBP"].std_dev, 0.0);
        assert_eq!(windows[0].statistics["USD"].observations, 2);
        assert_eq!(windows[1].statistics["GBP"].mean, 0.86);
    }

    #[test]
    fn test_rounded_window() {
        let series: TimeSeries = [
            (day(1), rates(&[("USD", dec!(1.0))])),
            (day(2), rates(&[("USD", dec!(1.0333333333))])),
        ]
        .into_iter()
        .collect();

        let window = sliding_windows(&series, 2).remove(0).rounded(&Precision::default());
        let usd = &window.statistics["USD"];
        assert_eq!(usd.max, 1.033333);
        assert_eq!(usd.change_pct, 3.3333);
    }
}
