use crate::mode::OutputMode;
use chrono::NaiveDate;
use pah_sensor::history::HistoryRequest;
use pah_utils::{
    dates::{extend_by_trailing_week, parse_date, to_timestamp},
    error::DateError,
};

/// The date range typed at the prompt.
///
/// The raw strings are kept because the output folder is named after them
/// exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    pub start_input: String,
    pub end_input: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QueryWindow {
    pub fn parse(start_input: &str, end_input: &str) -> Result<QueryWindow, DateError> {
        Ok(QueryWindow {
            start: parse_date(start_input)?,
            end: parse_date(end_input)?,
            start_input: start_input.to_string(),
            end_input: end_input.to_string(),
        })
    }

    /// `{start}_{end}` folder for the per-sensor modes.
    pub fn folder_name(&self) -> String {
        format!("{}_{}", self.start_input, self.end_input)
    }

    /// Request parameters for `mode`, with the end pushed a week out when the
    /// mode asks for it.
    pub fn request(&self, mode: OutputMode) -> Result<HistoryRequest, DateError> {
        let end = if mode.extends_end_by_week() {
            extend_by_trailing_week(&self.end)?
        } else {
            self.end
        };
        Ok(HistoryRequest {
            start_timestamp: to_timestamp(&self.start),
            end_timestamp: to_timestamp(&end),
            average_minutes: mode.average_minutes(),
            fields: mode.fields(),
        })
    }
}
