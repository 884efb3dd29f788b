/// Error types for the sensor library
use thiserror::Error;

/// Failure to load `config.json`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} file not found")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config is missing a non-empty 'api_key'")]
    MissingApiKey,
}

/// Failure to load the sensor list
#[derive(Error, Debug)]
pub enum SensorListError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("'sensor_index' column not found in {0}")]
    MissingColumn(String),

    #[error("Failed to parse sensor list: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read sensor list: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to retrieve one sensor's history
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The API answered with something other than 200 OK
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not the expected `{ data: [[timestamp, ...]] }` shape
    #[error("Failed to decode history response: {0}")]
    Decode(String),
}

/// Type alias for Results using HistoryError
pub type Result<T> = std::result::Result<T, HistoryError>;
