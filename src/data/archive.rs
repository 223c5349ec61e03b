//! Rate archive - the immutable date -> (currency -> rate) store
//!
//! Rates are EUR-quoted at rest. Every stored date carries `EUR = 1`.

use crate::error::{FxError, Result};
use crate::types::{CurrencyCode, Rate, RateMap, STORAGE_BASE};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Point and range queries against the rate archive
pub trait RateArchive: Send + Sync {
    /// All EUR-quoted rates published on `date`
    fn get_rates_for_date(&self, date: NaiveDate) -> Option<&RateMap>;

    /// First and last archived dates
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)>;

    /// Every currency code quoted on any archived date, sorted
    fn currencies(&self) -> Vec<CurrencyCode>;

    /// True when `code` is quoted on at least one archived date
    fn has_currency(&self, code: &str) -> bool {
        self.currencies().iter().any(|c| c == code)
    }

    /// EUR-quoted rate of one currency on `date`
    fn get_rate(&self, date: NaiveDate, currency: &str) -> Option<Rate> {
        self.get_rates_for_date(date)?
            .get(&currency.to_ascii_uppercase())
            .copied()
    }

    fn contains_date(&self, date: NaiveDate) -> bool {
        self.get_rates_for_date(date).is_some()
    }

    fn latest_date(&self) -> Option<NaiveDate> {
        self.date_range().map(|(_, end)| end)
    }
}

/// Check and normalise a currency code to three uppercase ASCII letters
pub fn normalize_code(code: &str) -> Result<CurrencyCode> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(FxError::InvalidData(format!("Invalid currency code: {:?}", code)))
    }
}

/// In-memory rate archive backed by a `BTreeMap` keyed by date
///
/// # Example
/// ```
/// use rusty_fxrates::data::{InMemoryRateArchive, RateArchive};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut archive = InMemoryRateArchive::new();
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// archive
///     .insert_day(date, [("USD", Decimal::new(110, 2))])
///     .unwrap();
///
/// assert_eq!(archive.get_rate(date, "usd"), Some(Decimal::new(110, 2)));
/// assert_eq!(archive.get_rate(date, "EUR"), Some(Decimal::ONE));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateArchive {
    days: BTreeMap<NaiveDate, RateMap>,
    /// Number of archived dates quoting each currency
    quoted: BTreeMap<CurrencyCode, usize>,
}

impl InMemoryRateArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store all rates for one date, replacing anything stored for it before
    ///
    /// Codes are uppercased, rates must be non-negative, and `EUR = 1` is
    /// always added.
    pub fn insert_day<I, S>(&mut self, date: NaiveDate, rates: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, Rate)>,
        S: AsRef<str>,
    {
        let mut day = RateMap::new();
        for (code, rate) in rates {
            let code = normalize_code(code.as_ref())?;
            if rate < Decimal::ZERO {
                return Err(FxError::InvalidData(format!(
                    "Rate must be non-negative, got {} for {} on {}",
                    rate, code, date
                )));
            }
            day.insert(code, rate);
        }
        day.insert(STORAGE_BASE.to_string(), Decimal::ONE);

        for code in day.keys() {
            *self.quoted.entry(code.clone()).or_insert(0) += 1;
        }
        if let Some(replaced) = self.days.insert(date, day) {
            for code in replaced.keys() {
                if let Some(count) = self.quoted.get_mut(code) {
                    *count -= 1;
                    if *count == 0 {
                        self.quoted.remove(code);
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of archived dates
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Total number of stored (date, currency) rates
    pub fn num_entries(&self) -> usize {
        self.days.values().map(|day| day.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Archived dates in `[start, end]`, ascending
    pub fn dates_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        if start > end {
            return Vec::new();
        }
        self.days.range(start..=end).map(|(date, _)| *date).collect()
    }
}

impl RateArchive for InMemoryRateArchive {
    fn get_rates_for_date(&self, date: NaiveDate) -> Option<&RateMap> {
        self.days.get(&date)
    }

    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (first, _) = self.days.first_key_value()?;
        let (last, _) = self.days.last_key_value()?;
        Some((*first, *last))
    }

    fn currencies(&self) -> Vec<CurrencyCode> {
        self.quoted.keys().cloned().collect()
    }

    fn has_currency(&self, code: &str) -> bool {
        self.quoted.contains_key(code)
    }
}
