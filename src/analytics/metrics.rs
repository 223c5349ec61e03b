//! Per-currency financial metrics
//!
//! Returns and volatility stay decimal fractions through every computation
//! and become percentages only when the output record is populated. Rounding
//! happens in the same final step.
//!
//! A batch runs in two phases: per-currency metrics in parallel into a
//! concurrent collector, then (after all of them finish) the cross-currency
//! correlation pass over the collected return series.

use super::correlation::correlation_matrix;
use super::momentum::{momentum, sma, z_score};
use super::returns::{
    annualized_return, cumulative_return, log_returns, simple_return_series, simple_returns,
};
use super::risk::{historical_var, max_drawdown, parametric_var};
use super::rolling::{trailing_windows, TrailingWindow};
use super::statistics::{decimal_mean, mean, min_max, population_std_dev, price_variance};
use crate::config::{AnalyticsConfig, Precision};
use crate::rounding::{f64_to_decimal, round_decimal, round_f64, to_percent};
use crate::types::{CurrencyCode, PriceSeries, Rate, ReturnSeries};
use chrono::NaiveDate;
use dashmap::DashMap;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trailing window block of a metrics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindowMetrics {
    pub window: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub return_pct: f64,
    pub annualized_volatility_pct: f64,
}

impl RollingWindowMetrics {
    fn present(window: &TrailingWindow, precision: &Precision) -> Self {
        Self {
            window: window.size,
            mean: round_f64(window.mean, precision.price),
            std_dev: round_f64(window.std_dev, precision.std_dev),
            return_pct: to_percent(window.window_return, precision.percent),
            annualized_volatility_pct: to_percent(
                window.annualized_volatility,
                precision.percent,
            ),
        }
    }
}

/// Output record for one currency. Percent-suffixed and return/volatility/risk
/// fields are percentages; price fields are in units of the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMetrics {
    pub currency: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_points: usize,

    pub min: Rate,
    pub max: Rate,
    pub average: Rate,
    pub open: Rate,
    pub close: Rate,
    pub change: Rate,
    pub change_pct: f64,
    pub range_pct: f64,

    pub std_dev: f64,
    pub variance: f64,
    pub coefficient_of_variation: f64,

    pub avg_daily_return: f64,
    pub cumulative_return: f64,
    pub annualized_return: f64,

    pub daily_volatility: f64,
    pub annualized_volatility: f64,

    pub max_drawdown: f64,
    pub var_95_historical: f64,
    pub var_95_parametric: f64,
    pub sharpe_ratio: f64,

    pub momentum_3m: Option<f64>,
    pub momentum_12m: Option<f64>,
    pub sma_50: Option<Rate>,
    pub sma_200: Option<Rate>,
    pub z_score: f64,

    pub rolling: Vec<RollingWindowMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlations: Option<BTreeMap<CurrencyCode, f64>>,
}

/// `(annualized_return - risk_free) / annualized_volatility`, all annual decimals
pub fn sharpe_ratio(annualized_return: f64, risk_free_rate: f64, annualized_volatility: f64) -> f64 {
    if annualized_volatility == 0.0 {
        return 0.0;
    }
    (annualized_return - risk_free_rate) / annualized_volatility
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Builds [`CurrencyMetrics`] records from price series
#[derive(Debug, Clone)]
pub struct MetricsAssembler<'c> {
    config: &'c AnalyticsConfig,
}

impl<'c> MetricsAssembler<'c> {
    pub fn new(config: &'c AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Metrics for one currency plus the simple-return series used for
    /// correlation. `None` for fewer than two prices.
    pub fn assemble(&self, series: &PriceSeries) -> Option<(CurrencyMetrics, ReturnSeries)> {
        if series.len() < 2 {
            return None;
        }
        let config = self.config;
        let precision = &config.precision;

        let (start_date, open) = series.first()?;
        let (end_date, close) = series.last()?;
        let (min, max) = min_max(&series.prices)?;
        let average = decimal_mean(&series.prices)?;

        let prices = series.values();
        let n = prices.len();

        // Price levels and dispersion
        let mean_price = average.to_f64().unwrap_or(0.0);
        let variance = price_variance(&series.prices, mean_price);
        let std_dev = variance.sqrt();
        let open_f = open.to_f64().unwrap_or(0.0);
        let min_f = min.to_f64().unwrap_or(0.0);
        let max_f = max.to_f64().unwrap_or(0.0);
        let last_price = prices[n - 1];

        // Returns
        let simple = simple_returns(&prices);
        let logs = log_returns(&prices);
        let cumulative = cumulative_return(&simple);
        let annualized = annualized_return(cumulative, simple.len(), config.trading_days_per_year);

        // Volatility from log returns
        let daily_volatility = population_std_dev(&logs);
        let annualized_volatility = daily_volatility * config.annualization_factor();

        // Risk
        let drawdown = max_drawdown(&prices);
        let var_historical = historical_var(&simple, config.var_percentile, config.var_min_sample);
        let var_parametric = parametric_var(&simple, config.var_z_score, config.var_min_sample);
        let sharpe = sharpe_ratio(annualized, config.risk_free_rate, annualized_volatility);

        let rolling = trailing_windows(
            &prices,
            &logs,
            &config.rolling_windows,
            config.annualization_factor(),
        );

        let metrics = CurrencyMetrics {
            currency: series.currency.clone(),
            start_date,
            end_date,
            data_points: n,

            min: round_decimal(min, precision.price),
            max: round_decimal(max, precision.price),
            average: round_decimal(average, precision.price),
            open: round_decimal(open, precision.price),
            close: round_decimal(close, precision.price),
            change: round_decimal(close - open, precision.price),
            change_pct: to_percent(ratio(last_price - open_f, open_f), precision.percent),
            range_pct: to_percent(ratio(max_f - min_f, min_f), precision.percent),

            std_dev: round_f64(std_dev, precision.std_dev),
            variance: round_f64(variance, precision.variance),
            coefficient_of_variation: to_percent(ratio(std_dev, mean_price), precision.percent),

            avg_daily_return: to_percent(mean(&simple), precision.percent),
            cumulative_return: to_percent(cumulative, precision.percent),
            annualized_return: to_percent(annualized, precision.percent),

            daily_volatility: to_percent(daily_volatility, precision.percent),
            annualized_volatility: to_percent(annualized_volatility, precision.percent),

            max_drawdown: to_percent(drawdown, precision.percent),
            var_95_historical: to_percent(var_historical, precision.percent),
            var_95_parametric: to_percent(var_parametric, precision.percent),
            sharpe_ratio: round_f64(sharpe, precision.percent),

            momentum_3m: momentum(&prices, config.momentum_short_period)
                .map(|m| to_percent(m, precision.percent)),
            momentum_12m: momentum(&prices, config.momentum_long_period)
                .map(|m| to_percent(m, precision.percent)),
            sma_50: sma(&prices, config.sma_short_period)
                .and_then(|v| f64_to_decimal(v, precision.price)),
            sma_200: sma(&prices, config.sma_long_period)
                .and_then(|v| f64_to_decimal(v, precision.price)),
            z_score: round_f64(z_score(last_price, mean_price, std_dev), precision.percent),

            rolling: rolling
                .iter()
                .map(|w| RollingWindowMetrics::present(w, precision))
                .collect(),

            correlations: None,
        };

        Some((metrics, simple_return_series(series)))
    }

    /// Metrics for every series in the batch, keyed and ordered by currency
    ///
    /// Currencies with fewer than two prices are left out. Correlations are
    /// attached once every per-currency pass has completed.
    pub fn assemble_batch(
        &self,
        batch: &BTreeMap<CurrencyCode, PriceSeries>,
    ) -> BTreeMap<CurrencyCode, CurrencyMetrics> {
        let collector: DashMap<CurrencyCode, (CurrencyMetrics, ReturnSeries)> = DashMap::new();

        batch.par_iter().for_each(|(code, series)| match self.assemble(series) {
            Some(result) => {
                collector.insert(code.clone(), result);
            }
            None => log::debug!(
                "Excluding {}: {} price point(s) in range",
                code,
                series.len()
            ),
        });

        let mut metrics = BTreeMap::new();
        let mut returns = BTreeMap::new();
        for (code, (record, series)) in collector {
            metrics.insert(code.clone(), record);
            returns.insert(code, series);
        }

        let percent = self.config.precision.percent;
        for (code, row) in correlation_matrix(&returns) {
            if let Some(record) = metrics.get_mut(&code) {
                record.correlations = Some(
                    row.into_iter()
                        .map(|(other, c)| (other, round_f64(c, percent)))
                        .collect(),
                );
            }
        }

        log::info!(
            "Computed metrics for {} of {} currencies",
            metrics.len(),
            batch.len()
        );
        metrics
    }
}
