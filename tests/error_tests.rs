//! Error taxonomy tests
//!
//! Checks which failures surface as not-found, which as caller errors, and
//! that loading and configuration problems carry a useful message.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use rusty_fxrates::config::AnalyticsConfig;
use rusty_fxrates::data::{InMemoryRateArchive, SymbolFilter};
use rusty_fxrates::error::FxError;
use rusty_fxrates::service::RateService;
use std::io::Write;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn service() -> RateService<InMemoryRateArchive> {
    let mut archive = InMemoryRateArchive::new();
    archive.insert_day(date(1), [("USD", dec!(1.08))]).unwrap();
    archive.insert_day(date(2), [("USD", dec!(1.09)), ("GBP", dec!(0.85))]).unwrap();
    RateService::new(archive)
}

#[cfg(test)]
mod not_found {
    use super::*;

    #[test]
    fn test_missing_date() {
        let err = service()
            .historical_rates(date(3), "EUR", &SymbolFilter::all())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("2024-02-03"));
    }

    #[test]
    fn test_base_not_quoted_that_day() {
        let err = service()
            .historical_rates(date(1), "GBP", &SymbolFilter::all())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("GBP"));
    }

    #[test]
    fn test_base_missing_on_some_range_dates_is_skipped() {
        let series = service()
            .timeseries("GBP", &SymbolFilter::all(), date(1), date(2))
            .unwrap();
        assert_eq!(series.len(), 1);
        assert!(series.contains_key(&date(2)));
    }

    #[test]
    fn test_empty_archive_has_no_latest() {
        let err = RateService::new(InMemoryRateArchive::new())
            .latest_rates("EUR", &SymbolFilter::all())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

#[cfg(test)]
mod client_errors {
    use super::*;

    #[test]
    fn test_reversed_range() {
        let err = service()
            .fluctuation("EUR", &SymbolFilter::all(), date(2), date(1))
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidRange(_)));
        assert!(err.is_client_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_zero_window() {
        let err = service()
            .rolling_metrics("EUR", &SymbolFilter::all(), date(1), date(2), 0)
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("window"));
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = service()
            .rolling_metrics("EUR", &SymbolFilter::all(), date(1), date(5), 3)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient data: required 3, available 2"
        );
    }
}

#[cfg(test)]
mod loading {
    use super::*;

    #[test]
    fn test_negative_rate_rejected() {
        let err = InMemoryRateArchive::from_json_str(r#"{"2024-02-01": {"USD": -1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidData(_)));
    }

    #[test]
    fn test_bad_currency_code_rejected() {
        let err = InMemoryRateArchive::from_json_str(r#"{"2024-02-01": {"US": 1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidData(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = InMemoryRateArchive::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, FxError::SerdeError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = InMemoryRateArchive::from_path("/nonexistent/rates.json").unwrap_err();
        assert!(matches!(err, FxError::IoError(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = InMemoryRateArchive::from_path("rates.parquet").unwrap_err();
        assert!(matches!(err, FxError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trading_days_per_year = 0").unwrap();

        let err = AnalyticsConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FxError::ConfigError(_)));
    }

    #[test]
    fn test_unparsable_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rolling_windows = \"thirty\"").unwrap();

        let err = AnalyticsConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FxError::TomlError(_)));
    }
}
