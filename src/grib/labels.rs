//! Label derivation for decoded records.
//!
//! Producers such as JMA write local parameters the parameter table does not
//! know. Those records carry the [`UNKNOWN_NAME`] placeholder and are labeled
//! from their descriptor instead.

use super::record::{FieldRecord, UNKNOWN_NAME};

/// Descriptor substring identifying discrete weather-code fields.
pub const WEATHER_CODE_MARKER: &str = "192:192";

/// Label given to weather-code fields.
pub const WEATHER_CODE_LABEL: &str = "weather code";

/// Returns true if the record is a discrete weather-code field.
pub fn is_weather_code<R: FieldRecord + ?Sized>(record: &R) -> bool {
    record.name() == UNKNOWN_NAME && record.descriptor().contains(WEATHER_CODE_MARKER)
}

/// Derives the human-readable label for a record.
pub fn extract_label<R: FieldRecord + ?Sized>(record: &R) -> String {
    if record.name() != UNKNOWN_NAME {
        return record.name().to_string();
    }

    let descriptor = record.descriptor();
    if descriptor.contains(WEATHER_CODE_MARKER) {
        return WEATHER_CODE_LABEL.to_string();
    }

    match descriptor.split(':').nth(1) {
        Some(field) => field.trim().to_string(),
        None => UNKNOWN_NAME.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grib::record::{GridField, WeatherRecord};
    use chrono::{NaiveDate, NaiveDateTime};

    pub(crate) fn time(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    pub(crate) fn record(name: &str, descriptor: &str, hour: u32) -> WeatherRecord {
        WeatherRecord {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            valid_time: time(hour),
            units: "K".to_string(),
            grid: GridField::new(1, 1, vec![1.0], vec![35.0], vec![135.0]).unwrap(),
        }
    }

    #[test]
    fn test_proper_name_is_returned_unchanged() {
        let r = record("Temperature", "1:192:192 weather code field", 0);
        assert_eq!(extract_label(&r), "Temperature");
        assert!(!is_weather_code(&r));
    }

    #[test]
    fn test_weather_code_marker() {
        let r = record(UNKNOWN_NAME, "1:192:192 weather code field", 0);
        assert_eq!(extract_label(&r), WEATHER_CODE_LABEL);
        assert!(is_weather_code(&r));
    }

    #[test]
    fn test_second_field_is_trimmed() {
        let r = record(UNKNOWN_NAME, "3: Total precipitation :kg m-2", 0);
        assert_eq!(extract_label(&r), "Total precipitation");
        assert!(!is_weather_code(&r));
    }

    #[test]
    fn test_descriptor_without_colon_falls_back_to_placeholder() {
        let r = record(UNKNOWN_NAME, "no separators here", 0);
        assert_eq!(extract_label(&r), UNKNOWN_NAME);
    }

    #[test]
    fn test_extract_label_is_idempotent() {
        let r = record(UNKNOWN_NAME, "2:Temperature:K", 0);
        assert_eq!(extract_label(&r), extract_label(&r));
        assert_eq!(extract_label(&r), "Temperature");
    }
}
