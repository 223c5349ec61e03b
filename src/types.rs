//! Core types shared by the data and analytics layers

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Three-letter uppercase ISO 4217 code
pub type CurrencyCode = String;

/// Fixed-point exchange rate
pub type Rate = Decimal;

/// Currency -> rate for a single calendar date
pub type RateMap = BTreeMap<CurrencyCode, Rate>;

/// Date -> rates, ascending by date
pub type TimeSeries = BTreeMap<NaiveDate, RateMap>;

/// Storage base of the archive
pub const STORAGE_BASE: &str = "EUR";

/// Chronological rates for one currency over the trading dates it was quoted on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub currency: CurrencyCode,
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<Rate>,
}

impl PriceSeries {
    /// Create an empty series for a currency
    pub fn new(currency: impl Into<CurrencyCode>) -> Self {
        Self {
            currency: currency.into(),
            dates: Vec::new(),
            prices: Vec::new(),
        }
    }

    /// Append an observation. Callers push in ascending date order.
    pub fn push(&mut self, date: NaiveDate, price: Rate) {
        debug_assert!(self.dates.last().map_or(true, |last| *last < date));
        self.dates.push(date);
        self.prices.push(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Prices as floats for the analytics layer
    pub fn values(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.to_f64().unwrap_or(0.0)).collect()
    }

    pub fn first(&self) -> Option<(NaiveDate, Rate)> {
        Some((*self.dates.first()?, *self.prices.first()?))
    }

    pub fn last(&self) -> Option<(NaiveDate, Rate)> {
        Some((*self.dates.last()?, *self.prices.last()?))
    }
}

/// Returns keyed by the date each return ends on; `values.len() == prices.len() - 1`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
