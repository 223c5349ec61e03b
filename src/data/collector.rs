//! Series collection across a date range
//!
//! Every calendar date in `[start, end]` is visited; dates missing from the
//! archive (weekends, holidays) or lacking the requested base are skipped.
//! Per-date lookups run on the rayon pool and are reassembled in date order.

use super::archive::RateArchive;
use super::convert::BaseConverter;
use crate::error::{FxError, Result};
use crate::types::{CurrencyCode, PriceSeries, RateMap, TimeSeries};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Every calendar date from `start` to `end`, inclusive
pub fn calendar_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    validate_range(start, end)?;
    Ok(start.iter_days().take_while(|date| *date <= end).collect())
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(FxError::InvalidRange(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

/// Assembles per-date rate maps and per-currency price series
pub struct SeriesCollector<'a, A: RateArchive + ?Sized> {
    archive: &'a A,
    converter: &'a BaseConverter,
}

impl<'a, A: RateArchive + ?Sized> SeriesCollector<'a, A> {
    pub fn new(archive: &'a A, converter: &'a BaseConverter) -> Self {
        Self { archive, converter }
    }

    fn fetch(&self, date: NaiveDate) -> Option<RateMap> {
        let rates = self.archive.get_rates_for_date(date)?;
        match self.converter.convert(rates) {
            Ok(converted) => Some(converted),
            Err(e) => {
                log::debug!("Skipping {}: {}", date, e);
                None
            }
        }
    }

    /// Re-based rates for each archived date in the range, ascending by date
    ///
    /// A range with no archived dates yields an empty map.
    pub fn timeseries(&self, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries> {
        let dates = calendar_dates(start, end)?;

        let fetched: Vec<(NaiveDate, RateMap)> = dates
            .par_iter()
            .filter_map(|date| self.fetch(*date).map(|rates| (*date, rates)))
            .collect();

        log::debug!(
            "Collected {} of {} calendar dates in {}..={}",
            fetched.len(),
            dates.len(),
            start,
            end
        );
        Ok(fetched.into_iter().collect())
    }

    /// Price series of a single currency against the converter's base
    pub fn price_series(
        &self,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let currency = currency.trim().to_ascii_uppercase();
        let timeseries = self.timeseries(start, end)?;

        let mut series = PriceSeries::new(currency.clone());
        for (date, rates) in &timeseries {
            if let Some(rate) = rates.get(&currency) {
                series.push(*date, *rate);
            }
        }
        Ok(series)
    }

    /// Price series for every currency the converter lets through
    pub fn price_series_batch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<CurrencyCode, PriceSeries>> {
        let timeseries = self.timeseries(start, end)?;
        Ok(pivot(&timeseries))
    }
}

/// Turn date -> (currency -> rate) into currency -> chronological series
pub fn pivot(timeseries: &TimeSeries) -> BTreeMap<CurrencyCode, PriceSeries> {
    let mut batch: BTreeMap<CurrencyCode, PriceSeries> = BTreeMap::new();
    for (date, rates) in timeseries {
        for (code, rate) in rates {
            batch
                .entry(code.clone())
                .or_insert_with(|| PriceSeries::new(code.clone()))
                .push(*date, *rate);
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InMemoryRateArchive, SymbolFilter};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn archive() -> InMemoryRateArchive {
        let mut archive = InMemoryRateArchive::new();
        // 6th and 7th are a weekend
        archive.insert_day(day(4), [("USD", dec!(1.0944)), ("GBP", dec!(0.8630))]).unwrap();
        archive.insert_day(day(5), [("USD", dec!(1.0921)), ("GBP", dec!(0.8599))]).unwrap();
        archive.insert_day(day(8), [("USD", dec!(1.0946))]).unwrap();
        archive
    }

    #[test]
    fn test_calendar_dates() {
        assert_eq!(calendar_dates(day(1), day(3)).unwrap().len(), 3);
        assert_eq!(calendar_dates(day(3), day(3)).unwrap(), vec![day(3)]);
        assert!(matches!(
            calendar_dates(day(3), day(1)),
            Err(FxError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_timeseries_skips_gaps() {
        let archive = archive();
        let converter = BaseConverter::new("EUR", SymbolFilter::parse("USD"), 6);
        let collector = SeriesCollector::new(&archive, &converter);

        let series = collector.timeseries(day(1), day(10)).unwrap();
        let dates: Vec<_> = series.keys().copied().collect();
        assert_eq!(dates, vec![day(4), day(5), day(8)]);
        assert_eq!(series[&day(8)]["USD"], dec!(1.0946));
    }

    #[test]
    fn test_timeseries_empty_range() {
        let archive = archive();
        let converter = BaseConverter::new("EUR", SymbolFilter::all(), 6);
        let collector = SeriesCollector::new(&archive, &converter);

        let series = collector.timeseries(day(6), day(7)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_missing_base_dates_skipped() {
        let archive = archive();
        let converter = BaseConverter::new("GBP", SymbolFilter::all(), 6);
        let collector = SeriesCollector::new(&archive, &converter);

        // GBP not quoted on the 8th
        let series = collector.timeseries(day(1), day(10)).unwrap();
        assert_eq!(series.len(), 2);
        assert!(!series.contains_key(&day(8)));
    }

    #[test]
    fn test_price_series() {
        let archive = archive();
        let converter = BaseConverter::new("EUR", SymbolFilter::all(), 6);
        let collector = SeriesCollector::new(&archive, &converter);

        let usd = collector.price_series("usd", day(1), day(10)).unwrap();
        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.dates, vec![day(4), day(5), day(8)]);
        assert_eq!(usd.prices, vec![dec!(1.0944), dec!(1.0921), dec!(1.0946)]);

        let batch = collector.price_series_batch(day(1), day(10)).unwrap();
        assert_eq!(batch["GBP"].len(), 2);
        assert_eq!(batch["EUR"].len(), 3);
    }
}
