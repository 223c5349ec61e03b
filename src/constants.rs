//! Analytics constants and defaults
//!
//! Default values for [`AnalyticsConfig`](crate::config::AnalyticsConfig)

/// Trading days used for every annualization
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Default annual risk-free rate (decimal)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Trailing window sizes reported in every metrics record
pub const DEFAULT_ROLLING_WINDOWS: [usize; 4] = [30, 60, 90, 180];

/// Momentum lookbacks in trading days (~3 and ~12 months)
pub const MOMENTUM_SHORT_PERIOD: usize = 63;
pub const MOMENTUM_LONG_PERIOD: usize = 252;

/// Simple moving average periods
pub const SMA_SHORT_PERIOD: usize = 50;
pub const SMA_LONG_PERIOD: usize = 200;

/// Minimum returns required before VaR is estimated
pub const MIN_VAR_SAMPLE: usize = 20;

/// Lower tail used by historical VaR at 95% confidence
pub const VAR_PERCENTILE: f64 = 0.05;

/// One-sided normal quantile used by parametric VaR at 95% confidence
pub const PARAMETRIC_VAR_Z: f64 = 1.65;

/// Output precision (fractional digits)
pub const RATE_DECIMALS: u32 = 6;
pub const PRICE_DECIMALS: u32 = 6;
pub const PERCENT_DECIMALS: u32 = 4;
pub const STD_DEV_DECIMALS: u32 = 8;
pub const VARIANCE_DECIMALS: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(TRADING_DAYS_PER_YEAR, 252);
        assert!(MOMENTUM_SHORT_PERIOD < MOMENTUM_LONG_PERIOD);
        assert!(SMA_SHORT_PERIOD < SMA_LONG_PERIOD);
        assert!(VAR_PERCENTILE > 0.0 && VAR_PERCENTILE < 1.0);
        assert!(DEFAULT_ROLLING_WINDOWS.windows(2).all(|w| w[0] < w[1]));
    }
}
