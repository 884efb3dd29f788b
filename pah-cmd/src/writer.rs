//! Writing sorted sensor history to CSV and spreadsheet files.
//!
//! # File formats
//!
//! - **Flat detail** (append-only, header written once): `Sensor,Date,PM2.5_1week`
//! - **Per-sensor CSV**: `Date,PM2.5_1week`, one file per sensor
//! - **Per-sensor XLSX**: `Date` plus one column per field
//!
//! Per-sensor files live in a `{start}_{end}` folder and are named
//! `{sensor_index}.{ext}`, or `empty_{sensor_index}.{ext}` when the sensor
//! returned no observations.

use anyhow::Context;
use csv::WriterBuilder;
use log::warn;
use pah_sensor::observation::{Observation, SensorRecord};
use pah_utils::dates::format_timestamp;
use rust_xlsxwriter::Workbook;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

pub const FLAT_HEADER: [&str; 3] = ["Sensor", "Date", "PM2.5_1week"];
pub const FOLDER_CSV_HEADER: [&str; 2] = ["Date", "PM2.5_1week"];
pub const DATE_COLUMN: &str = "Date";

/// Render a reading the way it is stored on disk; integral values keep a
/// trailing `.0`.
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_default()
}

/// Pair each observation with its UTC date, dropping any whose timestamp
/// cannot be rendered.
pub fn dated_observations(record: &SensorRecord) -> Vec<(String, &Observation)> {
    record
        .observations
        .iter()
        .filter_map(|obs| match format_timestamp(obs.timestamp) {
            Ok(date) => Some((date, obs)),
            Err(e) => {
                warn!("Sensor {}: skipping observation: {}", record.sensor_index, e);
                None
            }
        })
        .collect()
}

/// Append the record's non-null first-field values to the shared detail file.
///
/// The header is written only when the file is empty at the time of the
/// append. Nothing is ever truncated. Returns the number of rows written.
pub fn append_flat_detail(path: &Path, record: &SensorRecord) -> anyhow::Result<usize> {
    let rows: Vec<(String, f64)> = dated_observations(record)
        .into_iter()
        .filter_map(|(date, obs)| obs.first_value().map(|v| (date, v)))
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let is_empty = file.metadata()?.len() == 0;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    if is_empty {
        wtr.write_record(FLAT_HEADER)?;
    }
    for (date, value) in &rows {
        wtr.write_record([
            record.sensor_index.as_str(),
            date.as_str(),
            format_value(*value).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Create `{root}/{folder_name}` if it does not exist yet.
pub fn ensure_folder(root: &Path, folder_name: &str) -> anyhow::Result<PathBuf> {
    let folder = root.join(folder_name);
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("creating {}", folder.display()))?;
    Ok(folder)
}

/// `{sensor_index}.{ext}` or `empty_{sensor_index}.{ext}`.
pub fn sensor_file_name(record: &SensorRecord, extension: &str) -> String {
    if record.is_empty() {
        format!("empty_{}.{}", record.sensor_index, extension)
    } else {
        format!("{}.{}", record.sensor_index, extension)
    }
}

/// Write (or overwrite) the sensor's CSV in `folder`.
pub fn write_sensor_csv(folder: &Path, record: &SensorRecord) -> anyhow::Result<PathBuf> {
    let path = folder.join(sensor_file_name(record, "csv"));
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(FOLDER_CSV_HEADER)?;
    for (date, obs) in dated_observations(record) {
        wtr.write_record([date, format_optional(obs.first_value())])?;
    }
    wtr.flush()?;
    Ok(path)
}

/// Write (or overwrite) the sensor's spreadsheet in `folder`.
///
/// Field columns follow the first observation; `fallback_fields` is used for
/// the header when there are no observations.
pub fn write_sensor_xlsx(
    folder: &Path,
    record: &SensorRecord,
    fallback_fields: &[String],
) -> anyhow::Result<PathBuf> {
    let path = folder.join(sensor_file_name(record, "xlsx"));
    let fields = if record.is_empty() {
        fallback_fields.to_vec()
    } else {
        record.field_names()
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, DATE_COLUMN)?;
    for (i, field) in fields.iter().enumerate() {
        worksheet.write_string(0, u16::try_from(i + 1)?, field.as_str())?;
    }
    for (i, (date, obs)) in dated_observations(record).into_iter().enumerate() {
        let row = u32::try_from(i + 1)?;
        worksheet.write_string(row, 0, date)?;
        for (j, field) in fields.iter().enumerate() {
            if let Some(value) = obs.value(field) {
                worksheet.write_number(row, u16::try_from(j + 1)?, value)?;
            }
        }
    }
    workbook
        .save(&path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pah_sensor::observation::{HistoryResponse, SensorRecord};

    fn record(sensor_index: &str, body: &str, fields: &str) -> SensorRecord {
        let response = HistoryResponse::from_json(body).unwrap();
        let fields = pah_sensor::observation::split_fields(fields);
        let mut record = SensorRecord::from_response(sensor_index, response, &fields).unwrap();
        record.sort_by_timestamp();
        record
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10.0), "10.0");
        assert_eq!(format_value(12.5), "12.5");
    }

    #[test]
    fn test_flat_append_twice_keeps_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detail.csv");
        let rec = record(
            "131075",
            r#"{"data": [[1700000300, 12.5], [1700604800, null], [1699395200, 10.0]]}"#,
            "pm2.5_alt",
        );

        assert_eq!(append_flat_detail(&path, &rec).unwrap(), 2);
        assert_eq!(append_flat_detail(&path, &rec).unwrap(), 2);

        let lines = read_lines(&path);
        assert_eq!(
            lines,
            vec![
                "Sensor,Date,PM2.5_1week",
                "131075,2023-11-07,10.0",
                "131075,2023-11-14,12.5",
                "131075,2023-11-07,10.0",
                "131075,2023-11-14,12.5",
            ]
        );
    }

    #[test]
    fn test_flat_append_to_existing_file_adds_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detail.csv");
        std::fs::write(&path, "Sensor,Date,PM2.5_1week\n1,2023-01-01,3.0\n").unwrap();
        let rec = record("2", r#"{"data": [[1700000000, 4.5]]}"#, "pm2.5_alt");
        append_flat_detail(&path, &rec).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Sensor,Date,PM2.5_1week");
        assert_eq!(lines[2], "2,2023-11-14,4.5");
    }

    #[test]
    fn test_flat_append_nothing_to_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detail.csv");
        let rec = record("2", r#"{"data": [[1700000000, null]]}"#, "pm2.5_alt");
        assert_eq!(append_flat_detail(&path, &rec).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_folder_csv_rows_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let folder = ensure_folder(dir.path(), "2023-11-01_2023-11-30").unwrap();
        let rec = record(
            "77",
            r#"{"data": [[1700000300, 12.5], [1700000000, 10.0], [1700604800, null]]}"#,
            "pm2.5_alt",
        );
        let path = write_sensor_csv(&folder, &rec).unwrap();
        assert!(path.ends_with("2023-11-01_2023-11-30/77.csv"));
        assert_eq!(
            read_lines(&path),
            vec![
                "Date,PM2.5_1week",
                "2023-11-14,10.0",
                "2023-11-14,12.5",
                "2023-11-21,",
            ]
        );
    }

    #[test]
    fn test_folder_csv_empty_sensor() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_folder(dir.path(), "a_b").unwrap();
        // reusing an existing folder is fine
        let folder = ensure_folder(dir.path(), "a_b").unwrap();
        assert_eq!(first, folder);
        let rec = record("5", r#"{"data": []}"#, "pm2.5_alt");
        let path = write_sensor_csv(&folder, &rec).unwrap();
        assert_eq!(path.file_name().unwrap(), "empty_5.csv");
        assert_eq!(read_lines(&path), vec!["Date,PM2.5_1week"]);
    }

    #[test]
    fn test_folder_csv_overwrites_only_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let folder = ensure_folder(dir.path(), "a_b").unwrap();
        std::fs::write(folder.join("other.csv"), "Date,PM2.5_1week\n").unwrap();
        let rec = record("9", r#"{"data": [[1700000000, 1.0]]}"#, "pm2.5_alt");
        write_sensor_csv(&folder, &rec).unwrap();
        write_sensor_csv(&folder, &rec).unwrap();
        assert!(folder.join("other.csv").exists());
        assert_eq!(read_lines(&folder.join("9.csv")).len(), 2);
    }

    #[test]
    fn test_folder_xlsx_written() {
        let dir = tempfile::tempdir().unwrap();
        let folder = ensure_folder(dir.path(), "a_b").unwrap();
        let rec = record(
            "12",
            r#"{"fields": ["time_stamp", "pm2.5_alt", "humidity", "temperature"],
                "data": [[1700000000, 3.5, 40, 61], [1699913600, null, 38, 58]]}"#,
            "pm2.5_alt,humidity,temperature",
        );
        let path = write_sensor_xlsx(&folder, &rec, &[]).unwrap();
        assert_eq!(path.file_name().unwrap(), "12.xlsx");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_folder_xlsx_empty_sensor() {
        let dir = tempfile::tempdir().unwrap();
        let folder = ensure_folder(dir.path(), "a_b").unwrap();
        let rec = record("12", r#"{"data": []}"#, "pm2.5_alt");
        let path = write_sensor_xlsx(&folder, &rec, &["pm2.5_alt".to_string()]).unwrap();
        assert_eq!(path.file_name().unwrap(), "empty_12.xlsx");
        assert!(path.exists());
    }
}
