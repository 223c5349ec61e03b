//! Base conversion - re-quote an EUR-based rate map against another currency
//!
//! Cross rates are derived through the storage base:
//! `rate(base -> c) = rate(EUR -> c) / rate(EUR -> base)`.

use crate::error::{FxError, Result};
use crate::rounding::round_decimal;
use crate::types::{CurrencyCode, RateMap, STORAGE_BASE};
use hashbrown::HashSet;
use rust_decimal::Decimal;

/// Case-insensitive, deduplicated currency allow-list. Empty means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolFilter {
    symbols: HashSet<CurrencyCode>,
}

impl SymbolFilter {
    /// Filter that lets every currency through
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from caller-supplied codes; blanks are ignored
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { symbols }
    }

    /// Parse a comma separated list such as `"usd,GBP, jpy"`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True if the filter names `code` explicitly
    pub fn contains(&self, code: &str) -> bool {
        self.symbols.contains(code)
    }

    pub fn includes(&self, code: &str) -> bool {
        self.is_empty() || self.contains(code)
    }

    /// Requested codes, sorted
    pub fn symbols(&self) -> Vec<CurrencyCode> {
        let mut symbols: Vec<_> = self.symbols.iter().cloned().collect();
        symbols.sort();
        symbols
    }
}

/// Re-bases EUR-quoted rate maps and applies symbol filtering
#[derive(Debug, Clone)]
pub struct BaseConverter {
    base: CurrencyCode,
    filter: SymbolFilter,
    /// Fractional digits of emitted rates; `None` keeps full precision
    precision: Option<u32>,
}

impl BaseConverter {
    /// Converter whose output rates are rounded to `precision` digits
    pub fn new(base: &str, filter: SymbolFilter, precision: u32) -> Self {
        Self {
            base: base.trim().to_ascii_uppercase(),
            filter,
            precision: Some(precision),
        }
    }

    /// Converter that keeps cross rates at full precision, for analytics input
    pub fn unrounded(base: &str, filter: SymbolFilter) -> Self {
        Self {
            precision: None,
            ..Self::new(base, filter, 0)
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn filter(&self) -> &SymbolFilter {
        &self.filter
    }

    fn emit(&self, rate: Decimal) -> Decimal {
        match self.precision {
            Some(dp) => round_decimal(rate, dp),
            None => rate,
        }
    }

    /// True when no cross-rate division is needed
    pub fn is_storage_base(&self) -> bool {
        self.base == STORAGE_BASE
    }

    /// Convert one date's EUR-quoted rates to this converter's base
    ///
    /// Fails with [`FxError::RateNotFound`] if the base currency is not quoted
    /// in `rates` (or is quoted at zero).
    pub fn convert(&self, rates: &RateMap) -> Result<RateMap> {
        if self.is_storage_base() {
            return Ok(rates
                .iter()
                .filter(|(code, _)| self.filter.includes(code))
                .map(|(code, rate)| (code.clone(), self.emit(*rate)))
                .collect());
        }

        let base_rate = match rates.get(&self.base) {
            Some(rate) if !rate.is_zero() => *rate,
            _ => {
                return Err(FxError::RateNotFound(format!(
                    "No {} rate available for base conversion",
                    self.base
                )))
            }
        };

        let mut converted = RateMap::new();
        for (code, rate) in rates {
            if *code == self.base || !self.filter.includes(code) {
                continue;
            }
            let cross = rate
                .checked_div(base_rate)
                .ok_or_else(|| FxError::InvalidData(format!("Overflow converting {}", code)))?;
            converted.insert(code.clone(), self.emit(cross));
        }
        if self.filter.includes(&self.base) {
            converted.insert(self.base.clone(), Decimal::ONE);
        }
        Ok(converted)
    }
}
