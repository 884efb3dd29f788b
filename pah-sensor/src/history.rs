//! PurpleAir sensor history client.
//!
//! One GET per sensor against `{base}/v1/sensors/{sensor_index}/history`.
//! There is no retry or backoff: any failure is returned to the caller, which
//! skips the sensor. Every request carries the configured timeout so a stalled
//! connection surfaces as [`HistoryError::Timeout`] instead of hanging the run.

use crate::{
    config::Config,
    error::{HistoryError, Result},
    observation::{HistoryResponse, SensorRecord},
};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Header carrying the API read key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Parameters shared by every sensor's request in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    /// Averaging window in minutes
    pub average_minutes: u32,
    pub fields: Vec<String>,
}

impl HistoryRequest {
    fn query_params(&self) -> [(&'static str, String); 4] {
        [
            ("start_timestamp", self.start_timestamp.to_string()),
            ("end_timestamp", self.end_timestamp.to_string()),
            ("average", self.average_minutes.to_string()),
            ("fields", self.fields.join(",")),
        ]
    }
}

/// Anything that can produce a sensor's history for a request.
#[allow(async_fn_in_trait)]
pub trait HistorySource {
    async fn sensor_history(
        &self,
        sensor_index: &str,
        request: &HistoryRequest,
    ) -> Result<SensorRecord>;
}

#[derive(Debug, Clone)]
pub struct HistoryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

fn classify(e: reqwest::Error) -> HistoryError {
    if e.is_timeout() {
        HistoryError::Timeout
    } else {
        HistoryError::Request(e)
    }
}

impl HistoryClient {
    pub fn new(config: &Config) -> Result<HistoryClient> {
        HistoryClient::with_timeout(config, config.timeout())
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<HistoryClient> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HistoryClient::from_client(client, config))
    }

    /// Wrap an already configured `reqwest` client.
    pub(crate) fn from_client(client: Client, config: &Config) -> HistoryClient {
        HistoryClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn history_url(&self, sensor_index: &str) -> String {
        format!("{}/v1/sensors/{}/history", self.base_url, sensor_index)
    }
}

impl HistorySource for HistoryClient {
    async fn sensor_history(
        &self,
        sensor_index: &str,
        request: &HistoryRequest,
    ) -> Result<SensorRecord> {
        let url = self.history_url(sensor_index);
        debug!("GET {} {:?}", url, request);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&request.query_params())
            .send()
            .await
            .map_err(classify)?;

        if response.status() != StatusCode::OK {
            warn!("Error: {} for sensor {}", response.status().as_u16(), sensor_index);
            return Err(HistoryError::Status(response.status().as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        let parsed = HistoryResponse::from_json(&body)?;
        SensorRecord::from_response(sensor_index, parsed, &request.fields)
    }
}
