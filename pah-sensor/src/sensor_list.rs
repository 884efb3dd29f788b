use crate::error::SensorListError;
use csv::ReaderBuilder;
use std::{io::Read, path::Path};

/// Header name of the required sensor column.
pub const SENSOR_INDEX_COLUMN: &str = "sensor_index";

const UTF8_BOM: char = '\u{feff}';

/// Ordered sensor identifiers, exactly as they appear in the source file.
///
/// Duplicates are kept; the order is reused by the summary to lay out rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorList(pub Vec<String>);

impl SensorList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Parse sensor indices from CSV with a header row containing
    /// `sensor_index`. Other columns are ignored.
    pub fn parse_sensor_csv<R: Read>(
        reader: R,
        source: &str,
    ) -> Result<SensorList, SensorListError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let column = rdr
            .headers()?
            .iter()
            .position(|h| h.trim_start_matches(UTF8_BOM) == SENSOR_INDEX_COLUMN)
            .ok_or_else(|| SensorListError::MissingColumn(source.to_string()))?;
        let mut sensors = Vec::new();
        for row in rdr.records() {
            let record = row?;
            sensors.push(record.get(column).unwrap_or("").to_string());
        }
        Ok(SensorList(sensors))
    }

    /// Load the sensor list at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<SensorList, SensorListError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SensorListError::NotFound(source));
            }
            Err(e) => return Err(e.into()),
        };
        SensorList::parse_sensor_csv(file, &source)
    }
}

impl<'a> IntoIterator for &'a SensorList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_duplicates_preserved() {
        let csv = "name,sensor_index\nb,200\na,100\nc,200\n";
        let sensors = SensorList::parse_sensor_csv(csv.as_bytes(), "sensors.csv").unwrap();
        assert_eq!(sensors.0, vec!["200", "100", "200"]);
    }

    #[test]
    fn test_bom_tolerated() {
        let csv = "\u{feff}sensor_index,label\n131075,Home\n";
        let sensors = SensorList::parse_sensor_csv(csv.as_bytes(), "sensors.csv").unwrap();
        assert_eq!(sensors.0, vec!["131075"]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "id,label\n1,a\n";
        let err = SensorList::parse_sensor_csv(csv.as_bytes(), "sensors.csv").unwrap_err();
        assert!(matches!(err, SensorListError::MissingColumn(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SensorList::load(dir.path().join("sensors.csv")).unwrap_err();
        assert!(matches!(err, SensorListError::NotFound(_)));
    }

    #[test]
    fn test_values_kept_verbatim() {
        let csv = "sensor_index,label\n 42 ,a\n";
        let sensors = SensorList::parse_sensor_csv(csv.as_bytes(), "sensors.csv").unwrap();
        assert_eq!(sensors.0, vec![" 42 "]);
    }

    #[test]
    fn test_header_only() {
        let sensors = SensorList::parse_sensor_csv("sensor_index\n".as_bytes(), "s").unwrap();
        assert!(sensors.is_empty());
    }
}
