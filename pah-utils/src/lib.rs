//! Shared utility functions for PAH crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};

    /// Calendar date format accepted at the prompt and written to output files.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Days added to the end date when a trailing week of averaged data is
    /// requested.
    pub const TRAILING_WEEK_DAYS: i64 = 7;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        if s.trim() != s {
            return Err(DateError::Whitespace(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|source| DateError::Format {
                input: s.to_string(),
                source,
            })
    }

    /// UNIX seconds at midnight UTC of `date`.
    pub fn to_timestamp(date: &NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// Render UNIX seconds as the UTC calendar date "YYYY-MM-DD".
    pub fn format_timestamp(timestamp: i64) -> Result<String, DateError> {
        DateTime::from_timestamp(timestamp, 0)
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .ok_or(DateError::TimestampOutOfRange(timestamp))
    }

    /// `date` pushed forward by the fixed trailing week.
    pub fn extend_by_trailing_week(date: &NaiveDate) -> Result<NaiveDate, DateError> {
        TimeDelta::try_days(TRAILING_WEEK_DAYS)
            .and_then(|week| date.checked_add_signed(week))
            .ok_or_else(|| DateError::Overflow(format_date(date)))
    }

}

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DateError {
        /// Input was not a `YYYY-MM-DD` calendar date
        #[error("Invalid date '{input}': use YYYY-MM-DD ({source})")]
        Format {
            input: String,
            #[source]
            source: chrono::ParseError,
        },

        #[error("Invalid date '{0}': surrounding whitespace is not allowed")]
        Whitespace(String),

        #[error("Timestamp {0} is outside the representable date range")]
        TimestampOutOfRange(i64),

        #[error("Date arithmetic overflowed for {0}")]
        Overflow(String),
    }
}
