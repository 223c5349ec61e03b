//! # Rusty-FXRates
//!
//! Financial analytics over an archive of daily EUR-quoted exchange rates.
//!
//! Rates are stored once against EUR and re-based on demand. From any range
//! of the archive the engine derives returns, volatility, drawdown,
//! Value-at-Risk, momentum, rolling window statistics and cross-currency
//! correlation.
//!
//! ## Example
//!
//! ```rust
//! use rusty_fxrates::prelude::*;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let mut archive = InMemoryRateArchive::new();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! archive
//!     .insert_day(date, [("USD", Decimal::new(110, 2)), ("GBP", Decimal::new(85, 2))])
//!     .unwrap();
//!
//! let service = RateService::new(archive);
//! let rates = service
//!     .historical_rates(date, "GBP", &SymbolFilter::parse("USD"))
//!     .unwrap();
//! assert_eq!(rates["USD"], Decimal::new(1294118, 6));
//! ```

pub mod analytics;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod rounding;
pub mod service;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::analytics::{CurrencyMetrics, DateWindow, MetricsAssembler};
    pub use crate::config::{AnalyticsConfig, Precision};
    pub use crate::data::{BaseConverter, InMemoryRateArchive, RateArchive, SymbolFilter};
    pub use crate::error::{FxError, Result};
    pub use crate::service::{Fluctuation, RateService};
    pub use crate::types::*;
}
