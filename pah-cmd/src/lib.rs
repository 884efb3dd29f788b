//! Command implementations for the PAH CLI.
//!
//! `fetch` pulls PurpleAir sensor history for a prompted date range and
//! writes it in one of the [`OutputMode`]s; `summary` condenses a flat detail
//! file into one row per listed sensor.

use anyhow::Context;
use clap::Subcommand;
use log::{error, info};
use pah_sensor::{config::Config, history::HistoryClient, sensor_list::SensorList};
use std::path::{Path, PathBuf};

pub mod mode;
pub mod pipeline;
pub mod prompt;
pub mod summary;
pub mod window;
pub mod writer;

pub use mode::OutputMode;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch sensor history for a date range entered at the prompt
    Fetch {
        /// How results are written
        #[arg(short, long, value_enum, default_value_t = OutputMode::FlatAppend)]
        mode: OutputMode,

        /// JSON file holding the API key
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// CSV with a `sensor_index` column
        #[arg(short, long, default_value = "sensors.csv")]
        sensors: PathBuf,

        /// Shared detail CSV appended to in flat mode
        #[arg(short, long, default_value = "detail.csv")]
        detail: PathBuf,

        /// Directory receiving the `{start}_{end}` folder in folder modes
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Summarise a flat detail CSV per sensor
    Summary {
        #[arg(short, long, default_value = "detail.csv")]
        detail: PathBuf,

        #[arg(short, long, default_value = "sensors.csv")]
        sensors: PathBuf,

        #[arg(short, long, default_value = "summary.csv")]
        output: PathBuf,
    },
}

/// The fetch pipeline degrades to an empty list when the sensor file is
/// missing or malformed.
fn load_sensors_or_empty(path: &Path) -> SensorList {
    match SensorList::load(path) {
        Ok(sensors) => sensors,
        Err(e) => {
            error!("Error: {}", e);
            SensorList::default()
        }
    }
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            mode,
            config,
            sensors,
            detail,
            output_dir,
        } => {
            let config = Config::load(&config)?;
            let sensors = load_sensors_or_empty(&sensors);

            let (start, end) = {
                let stdin = std::io::stdin();
                prompt::prompt_dates(&mut stdin.lock(), &mut std::io::stdout())?
            };
            let window = window::QueryWindow::parse(&start, &end)?;

            let client = HistoryClient::new(&config).context("building HTTP client")?;
            let options = pipeline::PipelineOptions {
                mode,
                detail_path: detail,
                output_dir,
            };
            info!(
                "Querying {} sensors from {} to {} ({:?})",
                sensors.len(),
                window.start_input,
                window.end_input,
                mode
            );
            pipeline::run_pipeline(&client, &sensors, &window, &options).await?;
            Ok(())
        }
        Command::Summary {
            detail,
            sensors,
            output,
        } => {
            summary::generate_summary(&detail, &sensors, &output)?;
            Ok(())
        }
    }
}
