//! Cross-currency correlation of return series
//!
//! Runs once per batch, after every currency's returns are known.

use super::statistics::pearson_correlation;
use crate::types::{CurrencyCode, ReturnSeries};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub type CorrelationMap = BTreeMap<CurrencyCode, f64>;

/// Restrict two return series to the dates they share
///
/// Series with identical date indices are borrowed as-is.
pub fn align<'a>(a: &'a ReturnSeries, b: &'a ReturnSeries) -> (Cow<'a, [f64]>, Cow<'a, [f64]>) {
    if a.dates == b.dates {
        return (Cow::Borrowed(&a.values), Cow::Borrowed(&b.values));
    }

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.dates.len() && j < b.dates.len() {
        match a.dates[i].cmp(&b.dates[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(a.values[i]);
                ys.push(b.values[j]);
                i += 1;
                j += 1;
            }
        }
    }
    (Cow::Owned(xs), Cow::Owned(ys))
}

/// Date-aligned Pearson correlation; `None` when undefined
pub fn correlate(a: &ReturnSeries, b: &ReturnSeries) -> Option<f64> {
    let (xs, ys) = align(a, b);
    pearson_correlation(&xs, &ys)
}

/// Correlation of every currency against every other in the batch
///
/// Undefined pairs are dropped; a currency appears as a key only if at least
/// one pairing is defined.
pub fn correlation_matrix(
    returns: &BTreeMap<CurrencyCode, ReturnSeries>,
) -> BTreeMap<CurrencyCode, CorrelationMap> {
    let entries: Vec<_> = returns.iter().collect();

    entries
        .par_iter()
        .filter_map(|(code, series)| {
            let row: CorrelationMap = entries
                .iter()
                .filter(|(other, _)| other != code)
                .filter_map(|(other, other_series)| {
                    correlate(series, other_series).map(|c| ((*other).clone(), c))
                })
                .collect();

            if row.is_empty() {
                None
            } else {
                Some(((*code).clone(), row))
            }
        })
        .collect()
}
