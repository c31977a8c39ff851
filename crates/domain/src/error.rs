//! Error types for the date domain
//!
//! Missing dates are never errors here. The only failures are inputs that
//! cannot be turned into a calendar date at all.

use thiserror::Error;

/// Errors raised while coercing raw input into a [`CalendarDate`](crate::CalendarDate)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The text is not a date the parser understands
    #[error("Unparseable date: {0}")]
    Unparseable(String),

    /// The Unix timestamp is outside the representable range
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl DateError {
    /// Creates a parse error for date text that matched no known layout.
    ///
    /// # Example
    /// ```ignore
    /// return Err(DateError::unparseable(text));
    /// ```
    pub fn unparseable(text: impl Into<String>) -> Self {
        Self::Unparseable(text.into())
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(seconds: i64) -> Self {
        Self::InvalidTimestamp(seconds)
    }
}
