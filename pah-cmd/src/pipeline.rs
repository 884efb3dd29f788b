//! The fetch → sort → write loop shared by every output mode.

use crate::{
    mode::OutputMode,
    window::QueryWindow,
    writer::{
        append_flat_detail, dated_observations, ensure_folder, format_value, write_sensor_csv,
        write_sensor_xlsx,
    },
};
use log::{info, warn};
use pah_sensor::{
    history::HistorySource,
    observation::{Observation, SensorRecord},
    sensor_list::SensorList,
};
use std::path::PathBuf;

/// Where a run writes its output.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub mode: OutputMode,
    /// Shared detail file for [`OutputMode::FlatAppend`]
    pub detail_path: PathBuf,
    /// Parent of the `{start}_{end}` folder for the per-sensor modes
    pub output_dir: PathBuf,
}

/// Outcome of a run, sensor by sensor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

fn describe(mode: OutputMode, obs: &Observation) -> String {
    let show = |v: Option<f64>| v.map(format_value).unwrap_or_else(|| "None".to_string());
    match mode {
        OutputMode::FlatAppend | OutputMode::FolderCsv => {
            format!("PM2.5_1week: {}", show(obs.first_value()))
        }
        OutputMode::FolderXlsx => obs
            .fields
            .iter()
            .map(|(name, v)| format!("{}: {}", name, show(*v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn write_record(
    options: &PipelineOptions,
    window: &QueryWindow,
    record: &SensorRecord,
) -> anyhow::Result<()> {
    match options.mode {
        OutputMode::FlatAppend => {
            let rows = append_flat_detail(&options.detail_path, record)?;
            info!(
                "{} rows for sensor {} appended to {}",
                rows,
                record.sensor_index,
                options.detail_path.display()
            );
        }
        OutputMode::FolderCsv => {
            let folder = ensure_folder(&options.output_dir, &window.folder_name())?;
            let path = write_sensor_csv(&folder, record)?;
            info!("Data saved to {}", path.display());
        }
        OutputMode::FolderXlsx => {
            let folder = ensure_folder(&options.output_dir, &window.folder_name())?;
            let path = write_sensor_xlsx(&folder, record, &options.mode.fields())?;
            info!("Data saved to {}", path.display());
        }
    }
    Ok(())
}

/// Fetch, sort and write every sensor in list order, one at a time.
///
/// A sensor whose fetch fails is logged and skipped. Write failures abort the
/// run; files already written for earlier sensors are left in place.
pub async fn run_pipeline<S: HistorySource>(
    source: &S,
    sensors: &SensorList,
    window: &QueryWindow,
    options: &PipelineOptions,
) -> anyhow::Result<RunReport> {
    let request = window.request(options.mode)?;
    let mut report = RunReport::default();

    for sensor_index in sensors {
        let mut record = match source.sensor_history(sensor_index, &request).await {
            Ok(record) => record,
            Err(e) => {
                warn!("No data available for Sensor {}: {}", sensor_index, e);
                report.skipped.push(sensor_index.clone());
                continue;
            }
        };
        record.sort_by_timestamp();

        info!("Sensor {} History:", sensor_index);
        for (date, obs) in dated_observations(&record) {
            info!(
                "Sensor: {}, Date: {}, {}",
                sensor_index,
                date,
                describe(options.mode, obs)
            );
        }

        write_record(options, window, &record)?;
        report.written.push(sensor_index.clone());
    }

    info!(
        "Processed {} sensors: {} written, {} skipped",
        sensors.len(),
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}
