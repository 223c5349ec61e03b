//! Analytics configuration
//!
//! Every tunable used by the metrics assembler lives here and is passed in
//! explicitly. Loadable from TOML; missing keys fall back to the defaults in
//! [`crate::constants`].
//!
//! ```toml
//! risk_free_rate = 0.03
//! rolling_windows = [30, 90]
//!
//! [precision]
//! percent = 2
//! ```

use crate::constants::*;
use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fractional digits applied to each family of output fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    /// Exchange rates in rate maps and fluctuation records
    pub rate: u32,
    /// Price-level statistics (min/max/mean/open/close/SMA)
    pub price: u32,
    /// Fields presented as percentages, plus ratios
    pub percent: u32,
    /// Standard deviation of raw prices
    pub std_dev: u32,
    /// Variance of raw prices
    pub variance: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            rate: RATE_DECIMALS,
            price: PRICE_DECIMALS,
            percent: PERCENT_DECIMALS,
            std_dev: STD_DEV_DECIMALS,
            variance: VARIANCE_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Annual risk-free rate as a decimal (0.02 = 2%)
    pub risk_free_rate: f64,
    pub trading_days_per_year: u32,
    pub rolling_windows: Vec<usize>,
    pub momentum_short_period: usize,
    pub momentum_long_period: usize,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub var_min_sample: usize,
    pub var_percentile: f64,
    pub var_z_score: f64,
    pub precision: Precision,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            rolling_windows: DEFAULT_ROLLING_WINDOWS.to_vec(),
            momentum_short_period: MOMENTUM_SHORT_PERIOD,
            momentum_long_period: MOMENTUM_LONG_PERIOD,
            sma_short_period: SMA_SHORT_PERIOD,
            sma_long_period: SMA_LONG_PERIOD,
            var_min_sample: MIN_VAR_SAMPLE,
            var_percentile: VAR_PERCENTILE,
            var_z_score: PARAMETRIC_VAR_Z,
            precision: Precision::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set the annual risk-free rate
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Replace the trailing rolling window sizes
    pub fn with_rolling_windows(mut self, windows: Vec<usize>) -> Self {
        self.rolling_windows = windows;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.trading_days_per_year == 0 {
            return Err(FxError::ConfigError(
                "trading_days_per_year must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(FxError::ConfigError(
                "risk_free_rate must be finite".to_string(),
            ));
        }
        if self.rolling_windows.iter().any(|w| *w < 2) {
            return Err(FxError::ConfigError(format!(
                "rolling window sizes must be at least 2, got {:?}",
                self.rolling_windows
            )));
        }
        if self.momentum_short_period == 0 || self.momentum_long_period == 0 {
            return Err(FxError::ConfigError(
                "momentum periods must be positive".to_string(),
            ));
        }
        if self.sma_short_period == 0 || self.sma_long_period == 0 {
            return Err(FxError::ConfigError(
                "SMA periods must be positive".to_string(),
            ));
        }
        if !(self.var_percentile > 0.0 && self.var_percentile < 1.0) {
            return Err(FxError::ConfigError(format!(
                "var_percentile must be in (0, 1), got {}",
                self.var_percentile
            )));
        }
        if self.var_z_score.is_nan() || self.var_z_score < 0.0 {
            return Err(FxError::ConfigError(format!(
                "var_z_score must be non-negative, got {}",
                self.var_z_score
            )));
        }
        Ok(())
    }

    /// sqrt(trading days), the volatility scaling factor
    pub fn annualization_factor(&self) -> f64 {
        (self.trading_days_per_year as f64).sqrt()
    }
}
