//! Engine error types
//!
//! Missing dates and missing configuration keys never reach this type: they
//! resolve to fallbacks. Only bad input, bad configuration sources and (when
//! configured) out-of-order endpoints are errors.

use daterange_domain::{CalendarDate, DateError};
use thiserror::Error;

/// Errors surfaced by the range engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date input could not be coerced into a calendar date
    #[error(transparent)]
    Date(#[from] DateError),

    /// A configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// The configuration names a calculator nobody registered
    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),

    /// End precedes start and the order policy rejects such ranges
    #[error("Start date {start} must precede end date {end}")]
    DateOrder {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl EngineError {
    /// Create an unknown calculator error
    pub fn unknown_calculator(name: impl Into<String>) -> Self {
        Self::UnknownCalculator(name.into())
    }

    /// Create a date order error
    pub fn date_order(start: CalendarDate, end: CalendarDate) -> Self {
        Self::DateOrder { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_is_transparent() {
        let err: EngineError = DateError::unparseable("soon").into();
        assert!(matches!(err, EngineError::Date(_)));
        assert_eq!(err.to_string(), "Unparseable date: soon");
    }

    #[test]
    fn test_date_order_error() {
        let start = CalendarDate::from_ymd_hms(2014, 1, 5, 0, 0, 0).unwrap();
        let end = CalendarDate::from_ymd_hms(2014, 1, 2, 0, 0, 0).unwrap();
        let err = EngineError::date_order(start, end);
        assert_eq!(
            err.to_string(),
            "Start date 2014-01-05 00:00:00 must precede end date 2014-01-02 00:00:00"
        );
    }

    #[test]
    fn test_unknown_calculator_error() {
        let err = EngineError::unknown_calculator("hourly");
        assert!(matches!(err, EngineError::UnknownCalculator(_)));
        assert!(err.to_string().contains("hourly"));
    }
}
