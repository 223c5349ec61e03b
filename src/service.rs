//! Rate and analytics service
//!
//! Entry point for callers such as an HTTP layer or the `fxrates` binary. Each
//! operation builds a [`BaseConverter`] for the requested base and symbols,
//! collects the range through a [`SeriesCollector`] and hands the result to
//! the analytics engines.

use crate::analytics::metrics::{CurrencyMetrics, MetricsAssembler};
use crate::analytics::rolling::{sliding_windows, DateWindow};
use crate::config::AnalyticsConfig;
use crate::data::{calendar_dates, BaseConverter, RateArchive, SeriesCollector, SymbolFilter};
use crate::error::{FxError, Result};
use crate::rounding::{round_decimal, to_percent};
use crate::types::{CurrencyCode, Rate, RateMap, TimeSeries};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Movement of one currency between the first and last observation in a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fluctuation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_rate: Rate,
    pub end_rate: Rate,
    pub change: Rate,
    pub change_pct: f64,
}

/// Read-only query service over a shared rate archive
pub struct RateService<A: RateArchive> {
    archive: Arc<A>,
    config: AnalyticsConfig,
}

impl<A: RateArchive> Clone for RateService<A> {
    fn clone(&self) -> Self {
        Self {
            archive: Arc::clone(&self.archive),
            config: self.config.clone(),
        }
    }
}

impl<A: RateArchive> RateService<A> {
    /// Service with the default analytics configuration
    pub fn new(archive: A) -> Self {
        Self::with_config(Arc::new(archive), AnalyticsConfig::default())
    }

    pub fn with_config(archive: Arc<A>, config: AnalyticsConfig) -> Self {
        Self { archive, config }
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Converter for operations that emit rate maps, rounded to the rate precision
    fn converter(&self, base: &str, symbols: &SymbolFilter) -> BaseConverter {
        BaseConverter::new(base, symbols.clone(), self.config.precision.rate)
    }

    /// Converter feeding the analytics engines; rounding happens at presentation
    fn analytics_converter(&self, base: &str, symbols: &SymbolFilter) -> Result<BaseConverter> {
        self.checked_base(BaseConverter::unrounded(base, symbols.clone()))
    }

    /// Range operations silently skip dates the base is not quoted on, so an
    /// unknown base is rejected up front instead of yielding an empty result.
    fn checked_base(&self, converter: BaseConverter) -> Result<BaseConverter> {
        if !converter.is_storage_base() && !self.archive.has_currency(converter.base()) {
            return Err(FxError::RateNotFound(format!(
                "Unknown base currency {}",
                converter.base()
            )));
        }
        Ok(converter)
    }

    /// Rates for a single date, re-based and filtered
    ///
    /// Fails with [`FxError::RateNotFound`] when the date is not in the
    /// archive, the base is not quoted that day, or none of the requested
    /// symbols are.
    pub fn historical_rates(
        &self,
        date: NaiveDate,
        base: &str,
        symbols: &SymbolFilter,
    ) -> Result<RateMap> {
        let rates = self
            .archive
            .get_rates_for_date(date)
            .ok_or_else(|| FxError::RateNotFound(format!("No rates available for {}", date)))?;

        let converted = self.converter(base, symbols).convert(rates)?;
        if converted.is_empty() && !symbols.is_empty() {
            return Err(FxError::RateNotFound(format!(
                "None of {} quoted on {}",
                symbols.symbols().join(","),
                date
            )));
        }
        Ok(converted)
    }

    /// Rates on the most recent archived date
    pub fn latest_rates(&self, base: &str, symbols: &SymbolFilter) -> Result<(NaiveDate, RateMap)> {
        let date = self
            .archive
            .latest_date()
            .ok_or_else(|| FxError::RateNotFound("Archive is empty".to_string()))?;
        Ok((date, self.historical_rates(date, base, symbols)?))
    }

    /// Every currency code seen in the archive, sorted
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.archive.currencies()
    }

    /// First and last archived dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.archive.date_range()
    }

    /// Re-based rates for every archived date in `[start, end]`
    pub fn timeseries(
        &self,
        base: &str,
        symbols: &SymbolFilter,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries> {
        let converter = self.checked_base(self.converter(base, symbols))?;
        let collector = SeriesCollector::new(self.archive.as_ref(), &converter);
        collector.timeseries(start, end)
    }

    /// First-to-last change per currency over `[start, end]`
    ///
    /// Currencies without any observation in the range are omitted.
    pub fn fluctuation(
        &self,
        base: &str,
        symbols: &SymbolFilter,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<CurrencyCode, Fluctuation>> {
        let converter = self.analytics_converter(base, symbols)?;
        let collector = SeriesCollector::new(self.archive.as_ref(), &converter);
        let batch = collector.price_series_batch(start, end)?;

        let precision = &self.config.precision;
        let fluctuations = batch
            .into_iter()
            .filter_map(|(code, series)| {
                let (start_date, start_rate) = series.first()?;
                let (end_date, end_rate) = series.last()?;
                let change = end_rate - start_rate;
                let change_pct = change
                    .checked_div(start_rate)
                    .and_then(|pct| pct.to_f64())
                    .unwrap_or(0.0);

                Some((
                    code,
                    Fluctuation {
                        start_date,
                        end_date,
                        start_rate: round_decimal(start_rate, precision.rate),
                        end_rate: round_decimal(end_rate, precision.rate),
                        change: round_decimal(change, precision.rate),
                        change_pct: to_percent(change_pct, precision.percent),
                    },
                ))
            })
            .collect();

        Ok(fluctuations)
    }

    /// Statistics over every window of `window_size` consecutive trading dates
    ///
    /// Fails with [`FxError::InvalidRange`] for a zero window or one longer
    /// than the calendar range, and with [`FxError::InsufficientData`] when the
    /// range holds fewer trading dates than the window.
    pub fn rolling_metrics(
        &self,
        base: &str,
        symbols: &SymbolFilter,
        start: NaiveDate,
        end: NaiveDate,
        window_size: usize,
    ) -> Result<Vec<DateWindow>> {
        let calendar_days = calendar_dates(start, end)?.len();
        if window_size == 0 {
            return Err(FxError::InvalidRange(
                "window size must be positive".to_string(),
            ));
        }
        if window_size > calendar_days {
            return Err(FxError::InvalidRange(format!(
                "window of {} days exceeds the {} day range",
                window_size, calendar_days
            )));
        }

        let converter = self.analytics_converter(base, symbols)?;
        let timeseries =
            SeriesCollector::new(self.archive.as_ref(), &converter).timeseries(start, end)?;
        if timeseries.len() < window_size {
            return Err(FxError::InsufficientData {
                required: window_size,
                available: timeseries.len(),
            });
        }

        let windows: Vec<DateWindow> = sliding_windows(&timeseries, window_size)
            .iter()
            .map(|w| w.rounded(&self.config.precision))
            .collect();

        log::info!(
            "Computed {} rolling windows of {} trading days over {}..={}",
            windows.len(),
            window_size,
            start,
            end
        );
        Ok(windows)
    }

    /// Full metrics record per currency over `[start, end]`
    ///
    /// The base currency itself is excluded, as are currencies with fewer than
    /// two observations. An empty map is a valid result.
    pub fn financial_metrics(
        &self,
        base: &str,
        symbols: &SymbolFilter,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<CurrencyCode, CurrencyMetrics>> {
        let converter = self.analytics_converter(base, symbols)?;
        let collector = SeriesCollector::new(self.archive.as_ref(), &converter);

        let mut batch = collector.price_series_batch(start, end)?;
        batch.remove(converter.base());

        log::debug!(
            "Computing metrics for {} currencies against {} over {}..={}",
            batch.len(),
            converter.base(),
            start,
            end
        );
        Ok(MetricsAssembler::new(&self.config).assemble_batch(&batch))
    }
}
