//! Rate data access
//!
//! # Components
//!
//! - **archive**: `RateArchive` trait and the in-memory archive
//! - **loader**: JSON and ECB CSV bulk loading
//! - **convert**: base conversion and symbol filtering
//! - **collector**: date-range assembly of rate maps and price series

pub mod archive;
pub mod collector;
pub mod convert;
pub mod loader;

pub use archive::{normalize_code, InMemoryRateArchive, RateArchive};
pub use collector::{calendar_dates, pivot, validate_range, SeriesCollector};
pub use convert::{BaseConverter, SymbolFilter};
