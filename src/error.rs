//! Error types for rusty_fxrates

use thiserror::Error;

/// Main error type for rate lookups and analytics
#[derive(Error, Debug)]
pub enum FxError {
    /// Requested date, currency or base is absent from the archive
    #[error("Rate not found: {0}")]
    RateNotFound(String),

    /// Caller supplied a range or window that cannot be evaluated
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Fewer data points than the caller explicitly required
    #[error("Insufficient data: required {required}, available {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FxError {
    /// True for lookups of dates or currencies the archive does not hold
    pub fn is_not_found(&self) -> bool {
        matches!(self, FxError::RateNotFound(_))
    }

    /// True for errors caused by caller input rather than the archive or I/O
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FxError::InvalidRange(_) | FxError::InsufficientData { .. }
        )
    }
}

/// Result type alias for rusty_fxrates operations
pub type Result<T> = std::result::Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(FxError::RateNotFound("XXX".to_string()).is_not_found());
        assert!(!FxError::RateNotFound("XXX".to_string()).is_client_error());
        assert!(FxError::InvalidRange("end before start".to_string()).is_client_error());
        assert!(FxError::InsufficientData {
            required: 30,
            available: 2
        }
        .is_client_error());
        assert!(!FxError::ConfigError("bad".to_string()).is_client_error());
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = FxError::InsufficientData {
            required: 30,
            available: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("required 30"));
        assert!(msg.contains("available 12"));
    }
}
