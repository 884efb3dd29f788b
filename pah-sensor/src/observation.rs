use crate::error::HistoryError;
use serde::Deserialize;
use serde_json::Value;

/// Column name the API uses for the timestamp in its `fields` header.
pub const TIMESTAMP_FIELD: &str = "time_stamp";

/// Raw body of a `/v1/sensors/{sensor_index}/history` response.
///
/// Each entry of `data` is `[timestamp, value, value, ...]`. The real API
/// also reports the column names in `fields`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    pub data: Vec<Vec<Value>>,
}

impl HistoryResponse {
    pub fn from_json(body: &str) -> Result<HistoryResponse, HistoryError> {
        serde_json::from_str(body).map_err(|e| HistoryError::Decode(e.to_string()))
    }

    /// Field names for the value columns, in column order.
    ///
    /// Taken from the response header when present, otherwise from the
    /// fields that were requested.
    fn value_columns(&self, requested_fields: &[String]) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields
                .iter()
                .filter(|f| f.as_str() != TIMESTAMP_FIELD)
                .cloned()
                .collect(),
            None => requested_fields.to_vec(),
        }
    }
}

/// One averaged reading of a sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// UNIX seconds
    pub timestamp: i64,
    /// Field values keyed by name, in column order. `None` is a null reading.
    pub fields: Vec<(String, Option<f64>)>,
}

impl Observation {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, v)| *v)
    }

    /// Value of the first (or only) requested field.
    pub fn first_value(&self) -> Option<f64> {
        self.fields.first().and_then(|(_, v)| *v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Everything one history request returned for a single sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub sensor_index: String,
    pub observations: Vec<Observation>,
}

fn value_to_timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

impl SensorRecord {
    /// Build a record from a decoded response body.
    ///
    /// Rows are kept in response order; call [`SensorRecord::sort_by_timestamp`]
    /// before writing.
    pub fn from_response(
        sensor_index: &str,
        response: HistoryResponse,
        requested_fields: &[String],
    ) -> Result<SensorRecord, HistoryError> {
        let columns = response.value_columns(requested_fields);
        let mut observations = Vec::with_capacity(response.data.len());
        for row in &response.data {
            let timestamp = row
                .first()
                .and_then(value_to_timestamp)
                .ok_or_else(|| {
                    HistoryError::Decode(format!("row without a numeric timestamp: {row:?}"))
                })?;
            let fields = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.get(i + 1).and_then(Value::as_f64)))
                .collect();
            observations.push(Observation { timestamp, fields });
        }
        Ok(SensorRecord {
            sensor_index: sensor_index.to_string(),
            observations,
        })
    }

    /// Stable ascending sort on the timestamp alone; rows sharing a
    /// timestamp keep their response order.
    pub fn sort_by_timestamp(&mut self) {
        self.observations.sort_by_key(|o| o.timestamp);
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Column names of the first observation, used as spreadsheet headers.
    pub fn field_names(&self) -> Vec<String> {
        self.observations
            .first()
            .map(|o| o.field_names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Split a comma-joined field list into names.
pub fn split_fields(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
