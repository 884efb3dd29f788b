//! Per-sensor summary of a flat detail file.
//!
//! Every sensor in the sensor list gets exactly one row, in list order, even
//! when the detail file holds nothing for it. Sensors present in the detail
//! file but absent from the list are left out.

use crate::writer::format_value;
use anyhow::Context;
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use pah_sensor::sensor_list::SensorList;
use serde::Deserialize;
use std::{
    collections::HashMap,
    io::{Read, Write},
    path::Path,
};

pub const SUMMARY_HEADER: [&str; 3] = ["sensor_index", "weeks_count", "average_PM2.5_1week"];

#[derive(Debug, Deserialize)]
struct DetailRow {
    #[serde(rename = "Sensor")]
    sensor: String,
    #[serde(rename = "PM2.5_1week")]
    value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub sensor_index: String,
    pub weeks_count: usize,
    /// `None` when there were no values
    pub average: Option<f64>,
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Collect every numeric value of the detail file, grouped by sensor.
pub fn group_detail<R: Read>(reader: R) -> anyhow::Result<HashMap<String, Vec<f64>>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut grouped: HashMap<String, Vec<f64>> = HashMap::new();
    for (line, result) in rdr.deserialize::<DetailRow>().enumerate() {
        let row = result?;
        match row.value.trim().parse::<f64>() {
            Ok(value) => grouped.entry(row.sensor).or_default().push(value),
            Err(_) => warn!(
                "Skipping detail row {}: '{}' is not a number",
                line + 2,
                row.value
            ),
        }
    }
    Ok(grouped)
}

/// One row per sensor-list entry, in list order.
pub fn summarize(grouped: &HashMap<String, Vec<f64>>, sensors: &SensorList) -> Vec<SummaryRow> {
    sensors
        .iter()
        .map(|sensor_index| {
            let values = grouped.get(sensor_index).map(Vec::as_slice).unwrap_or(&[]);
            SummaryRow {
                sensor_index: sensor_index.clone(),
                weeks_count: values.len(),
                average: average(values),
            }
        })
        .collect()
}

pub fn write_summary<W: Write>(writer: W, rows: &[SummaryRow]) -> anyhow::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(SUMMARY_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.sensor_index.clone(),
            row.weeks_count.to_string(),
            row.average.map(format_value).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read `detail_path` and `sensors_path`, write the summary to `output_path`.
pub fn generate_summary(
    detail_path: &Path,
    sensors_path: &Path,
    output_path: &Path,
) -> anyhow::Result<Vec<SummaryRow>> {
    let detail = std::fs::File::open(detail_path)
        .with_context(|| format!("opening {}", detail_path.display()))?;
    let grouped = group_detail(detail)?;
    let sensors = SensorList::load(sensors_path)?;

    for sensor_index in grouped.keys() {
        if !sensors.0.contains(sensor_index) {
            warn!(
                "Sensor {} is in {} but not in {}; left out of the summary",
                sensor_index,
                detail_path.display(),
                sensors_path.display()
            );
        }
    }

    let rows = summarize(&grouped, &sensors);
    let output = std::fs::File::create(output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    write_summary(output, &rows)?;
    info!("Summary has been written to {}.", output_path.display());
    Ok(rows)
}
