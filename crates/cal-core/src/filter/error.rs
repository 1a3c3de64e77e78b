//! Error types for the filter module.

use thiserror::Error;

/// A specialized Result type for date-range parsing.
pub type DateRangeResult<T> = Result<T, DateRangeError>;

/// Errors that can occur while parsing a date-range string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateRangeError {
    /// A date or datetime token could not be parsed.
    #[error("Invalid date format: {input}. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidDateFormat {
        /// The token that failed to parse.
        input: String,
    },
}

impl DateRangeError {
    /// Creates an invalid date format error.
    pub fn invalid_date_format(input: impl Into<String>) -> Self {
        DateRangeError::InvalidDateFormat {
            input: input.into(),
        }
    }

    /// Returns the offending input.
    pub fn input(&self) -> &str {
        match self {
            DateRangeError::InvalidDateFormat { input } => input,
        }
    }
}
