//! Bulk loading of the rate archive
//!
//! Two on-disk layouts are understood:
//!
//! - JSON: `{"2024-01-02": {"USD": 1.0956, "JPY": 155.52}, ...}`
//! - ECB CSV: a `Date` column followed by one column per currency, with `N/A`
//!   or empty cells for currencies not quoted that day.

use super::archive::InMemoryRateArchive;
use crate::error::{FxError, Result};
use crate::types::Rate;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

impl InMemoryRateArchive {
    /// Load from a JSON document mapping dates to EUR-quoted rate objects
    pub fn from_json_str(source: &str) -> Result<Self> {
        let raw: BTreeMap<NaiveDate, BTreeMap<String, Rate>> = serde_json::from_str(source)?;

        let mut archive = Self::new();
        for (date, rates) in raw {
            archive.insert_day(date, rates)?;
        }
        log::info!("Loaded {} archived dates from JSON", archive.num_days());
        Ok(archive)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Load from the ECB historical CSV layout (`Date,USD,JPY,...`)
    pub fn from_ecb_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        match headers.get(0) {
            Some(first) if first.eq_ignore_ascii_case("date") => {}
            other => {
                return Err(FxError::ParseError(format!(
                    "Expected a leading Date column, found {:?}",
                    other
                )))
            }
        }

        let mut archive = Self::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = row + 2;

            let raw_date = record.get(0).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
                FxError::ParseError(format!("Invalid date {:?} at line {}: {}", raw_date, line, e))
            })?;

            let mut rates = Vec::with_capacity(record.len());
            for (code, cell) in headers.iter().zip(record.iter()).skip(1) {
                if code.is_empty() || cell.is_empty() || cell.eq_ignore_ascii_case("N/A") {
                    continue;
                }
                let rate = Rate::from_str(cell).map_err(|e| {
                    FxError::ParseError(format!(
                        "Invalid {} rate {:?} at line {}: {}",
                        code, cell, line, e
                    ))
                })?;
                rates.push((code, rate));
            }

            if rates.is_empty() {
                log::warn!("No rates on {} (line {}), date not archived", date, line);
                continue;
            }
            archive.insert_day(date, rates)?;
        }

        log::info!("Loaded {} archived dates from CSV", archive.num_days());
        Ok(archive)
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_ecb_csv(std::io::BufReader::new(file))
    }

    /// Load from a `.json` or `.csv` file, picked by extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::from_json_file(path),
            Some("csv") => Self::from_csv_file(path),
            _ => Err(FxError::ConfigError(format!(
                "Unsupported archive format: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RateArchive;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_load_json() {
        let archive = InMemoryRateArchive::from_json_str(
            r#"{
                "2024-01-02": {"USD": 1.0956, "jpy": 155.52},
                "2024-01-03": {"USD": 1.0919}
            }"#,
        )
        .unwrap();

        assert_eq!(archive.num_days(), 2);
        assert_eq!(archive.get_rate(day(2), "USD"), Some(dec!(1.0956)));
        assert_eq!(archive.get_rate(day(2), "JPY"), Some(dec!(155.52)));
        assert_eq!(archive.get_rate(day(3), "EUR"), Some(dec!(1)));
    }

    #[test]
    fn test_load_json_invalid() {
        assert!(matches!(
            InMemoryRateArchive::from_json_str(r#"{"not-a-date": {"USD": 1.0}}"#),
            Err(FxError::SerdeError(_))
        ));
        assert!(matches!(
            InMemoryRateArchive::from_json_str(r#"{"2024-01-02": {"USD": -1.0}}"#),
            Err(FxError::InvalidData(_))
        ));
    }

    #[test]
    fn test_load_ecb_csv() {
        let csv_data = "Date,USD,JPY,CYP,\n\
                        2024-01-03,1.0919,155.52,N/A,\n\
                        2024-01-02,1.0956,155.90,N/A,\n";
        let archive = InMemoryRateArchive::from_ecb_csv(csv_data.as_bytes()).unwrap();

        assert_eq!(archive.num_days(), 2);
        assert_eq!(archive.get_rate(day(2), "USD"), Some(dec!(1.0956)));
        assert_eq!(archive.get_rate(day(3), "JPY"), Some(dec!(155.52)));
        assert_eq!(archive.get_rate(day(3), "CYP"), None);
        assert_eq!(archive.date_range(), Some((day(2), day(3))));
    }

    #[test]
    fn test_load_ecb_csv_errors() {
        let bad_date = "Date,USD\n02/01/2024,1.09\n";
        assert!(matches!(
            InMemoryRateArchive::from_ecb_csv(bad_date.as_bytes()),
            Err(FxError::ParseError(_))
        ));

        let bad_rate = "Date,USD\n2024-01-02,abc\n";
        assert!(matches!(
            InMemoryRateArchive::from_ecb_csv(bad_rate.as_bytes()),
            Err(FxError::ParseError(_))
        ));

        let no_date_column = "USD,JPY\n1.09,155.0\n";
        assert!(InMemoryRateArchive::from_ecb_csv(no_date_column.as_bytes()).is_err());
    }

    #[test]
    fn test_from_path_dispatch() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("rates.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write!(file, r#"{{"2024-01-02": {{"USD": 1.0956}}}}"#).unwrap();
        let archive = InMemoryRateArchive::from_path(&json_path).unwrap();
        assert_eq!(archive.num_days(), 1);

        let csv_path = dir.path().join("eurofxref-hist.csv");
        std::fs::write(&csv_path, "Date,USD\n2024-01-02,1.0956\n").unwrap();
        let archive = InMemoryRateArchive::from_path(&csv_path).unwrap();
        assert_eq!(archive.get_rate(day(2), "USD"), Some(dec!(1.0956)));

        assert!(InMemoryRateArchive::from_path(dir.path().join("rates.parquet")).is_err());
    }
}
