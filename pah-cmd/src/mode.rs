//! Output modes and the fixed request parameters that go with each.

use clap::ValueEnum;
use pah_sensor::observation::split_fields;

/// One week, in minutes.
pub const WEEKLY_AVERAGE_MINUTES: u32 = 10080;

/// One day, in minutes.
pub const DAILY_AVERAGE_MINUTES: u32 = 1440;

/// The single field requested by the weekly CSV modes.
pub const PM25_FIELD: &str = "pm2.5_alt";

/// Fields requested by the spreadsheet mode.
pub const SPREADSHEET_FIELDS: &str = "pm2.5_alt,humidity,temperature";

/// Where and how fetched history is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Append `Sensor,Date,PM2.5_1week` rows to one shared detail CSV
    #[value(name = "flat")]
    FlatAppend,
    /// One `{sensor_index}.csv` per sensor in a `{start}_{end}` folder
    FolderCsv,
    /// One `{sensor_index}.xlsx` per sensor, a column per field
    FolderXlsx,
}

impl OutputMode {
    pub fn average_minutes(&self) -> u32 {
        match self {
            OutputMode::FlatAppend | OutputMode::FolderCsv => WEEKLY_AVERAGE_MINUTES,
            OutputMode::FolderXlsx => DAILY_AVERAGE_MINUTES,
        }
    }

    pub fn fields(&self) -> Vec<String> {
        match self {
            OutputMode::FlatAppend | OutputMode::FolderCsv => split_fields(PM25_FIELD),
            OutputMode::FolderXlsx => split_fields(SPREADSHEET_FIELDS),
        }
    }

    /// Weekly modes ask for a trailing week past the end date so the last
    /// week starting on or before it is averaged in full.
    pub fn extends_end_by_week(&self) -> bool {
        matches!(self, OutputMode::FlatAppend | OutputMode::FolderCsv)
    }

    /// File extension of the per-sensor outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputMode::FolderXlsx => "xlsx",
            OutputMode::FlatAppend | OutputMode::FolderCsv => "csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_modes() {
        for mode in [OutputMode::FlatAppend, OutputMode::FolderCsv] {
            assert_eq!(mode.average_minutes(), 10080);
            assert_eq!(mode.fields(), vec!["pm2.5_alt"]);
            assert!(mode.extends_end_by_week());
        }
    }

    #[test]
    fn test_spreadsheet_mode() {
        let mode = OutputMode::FolderXlsx;
        assert_eq!(mode.fields().len(), 3);
        assert!(!mode.extends_end_by_week());
        assert_eq!(mode.extension(), "xlsx");
    }

    #[test]
    fn test_cli_names() {
        assert_eq!(
            OutputMode::from_str("flat", false).unwrap(),
            OutputMode::FlatAppend
        );
        assert_eq!(
            OutputMode::from_str("folder-xlsx", false).unwrap(),
            OutputMode::FolderXlsx
        );
    }
}
