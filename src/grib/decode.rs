//! GRIB2 decoding into [`WeatherRecord`]s using the `grib` crate.

use super::error::DecodeError;
use super::params::ParameterTable;
use super::record::{GridField, WeatherRecord, UNKNOWN_NAME};
use chrono::{Months, NaiveDateTime};
use grib::codetables::grib2::Table4_4;
use grib::{Code, ForecastTime, TemporalInfo, TemporalRawInfo};

/// Reference time, validity time and lead text of one submessage.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTimes {
    pub reference: NaiveDateTime,
    pub valid: NaiveDateTime,
    /// Forecast lead as shown in descriptors, e.g. `"6 hrs"`
    pub lead: Option<String>,
}

/// Resolves the times of a submessage.
///
/// Fixed-length lead units (seconds through days) are added by the `grib`
/// crate. Calendar units (months through centuries) are added as whole
/// months. A missing or unrecognised lead leaves the validity time at the
/// reference time.
pub fn resolve_times(index: usize, raw: &TemporalRawInfo) -> Result<FieldTimes, DecodeError> {
    let info = TemporalInfo::from(raw);
    let reference = info
        .ref_time
        .ok_or_else(|| DecodeError::InvalidReferenceTime {
            index,
            value: raw.ref_time_unchecked.to_string(),
        })?
        .naive_utc();

    let forecast = raw.forecast_time_diff.as_ref();
    let calendar = forecast
        .and_then(calendar_months)
        .and_then(|months| reference.checked_add_months(Months::new(months)));

    let valid = match (info.forecast_time_target, calendar) {
        (Some(target), _) => target.naive_utc(),
        (None, Some(time)) => time,
        (None, None) => {
            log::warn!(
                "Record {}: unsupported or missing forecast time, using reference time",
                index
            );
            reference
        }
    };

    Ok(FieldTimes {
        reference,
        valid,
        lead: forecast.and_then(lead_text),
    })
}

/// Lead length in months for calendar units of Code Table 4.4.
fn calendar_months(forecast: &ForecastTime) -> Option<u32> {
    let per_unit = match forecast.unit {
        Code::Name(Table4_4::Month) => 1,
        Code::Name(Table4_4::Year) => 12,
        Code::Name(Table4_4::Decade) => 120,
        Code::Name(Table4_4::Normal) => 360,
        Code::Name(Table4_4::Century) => 1200,
        _ => return None,
    };
    forecast.value.checked_mul(per_unit)
}

fn lead_text(forecast: &ForecastTime) -> Option<String> {
    let value = u64::from(forecast.value);
    let text = match forecast.unit {
        Code::Name(Table4_4::Second) => format!("{} secs", value),
        Code::Name(Table4_4::Minute) => format!("{} mins", value),
        Code::Name(Table4_4::Hour) => format!("{} hrs", value),
        Code::Name(Table4_4::ThreeHours) => format!("{} hrs", value * 3),
        Code::Name(Table4_4::SixHours) => format!("{} hrs", value * 6),
        Code::Name(Table4_4::TwelveHours) => format!("{} hrs", value * 12),
        Code::Name(Table4_4::Day) => format!("{} days", value),
        Code::Name(Table4_4::Month) => format!("{} months", value),
        Code::Name(Table4_4::Year) => format!("{} years", value),
        Code::Name(Table4_4::Decade) => format!("{} years", value * 10),
        Code::Name(Table4_4::Normal) => format!("{} years", value * 30),
        Code::Name(Table4_4::Century) => format!("{} years", value * 100),
        _ => return None,
    };
    Some(text)
}

/// Metadata gathered for one submessage before its values are decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    /// 1-based position in the file
    pub number: usize,
    pub discipline: u8,
    pub category: Option<u8>,
    pub parameter: Option<u8>,
    pub grid_template: u16,
    pub level: Option<f64>,
    pub times: FieldTimes,
}

impl FieldMeta {
    /// Name and units from the parameter table, or the unknown placeholder.
    pub fn name_and_units(&self, table: &ParameterTable) -> (String, String) {
        let known = match (self.category, self.parameter) {
            (Some(c), Some(p)) => table.get(self.discipline, c, p),
            _ => None,
        };
        match known {
            Some(info) => (
                info.name,
                info.units.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            ),
            None => (UNKNOWN_NAME.to_string(), UNKNOWN_NAME.to_string()),
        }
    }

    /// Colon-separated description of the field.
    ///
    /// Unknown parameters are named `local <discipline>-<category>-<number>`
    /// and end with a `codes <category>:<number>` field, so the only
    /// `digits:digits` pair in their descriptor is the parameter code pair.
    pub fn descriptor(&self, name: &str, units: &str) -> String {
        let unknown = name == UNKNOWN_NAME;
        let parameter = if unknown {
            format!(
                "local {}-{}-{}",
                self.discipline,
                code_text(self.category),
                code_text(self.parameter)
            )
        } else {
            name.to_string()
        };

        let grid = match self.grid_template {
            0 => "regular_ll".to_string(),
            40 => "regular_gg".to_string(),
            n => format!("grid template {}", n),
        };

        let level = match self.level {
            Some(v) => format!("level {}", v),
            None => "level unknown".to_string(),
        };

        let lead = match &self.times.lead {
            Some(text) => format!("fcst time {}", text),
            None => "fcst time unknown".to_string(),
        };

        let mut descriptor = format!(
            "{}:{}:{} (instant):{}:{}:{}:from {}",
            self.number,
            parameter,
            units,
            grid,
            level,
            lead,
            self.times.reference.format("%Y%m%d%H%M")
        );
        if unknown {
            descriptor.push_str(&format!(
                ":codes {}:{}",
                code_text(self.category),
                code_text(self.parameter)
            ));
        }
        descriptor
    }
}

fn code_text(code: Option<u8>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "missing".to_string())
}

/// Builds a row-major [`GridField`] from values in scanning order.
///
/// `ij` gives the `(column, row)` of each decoded value, so column-major
/// and boustrophedon scans land in the right cell. Row and column
/// orientation stays as the message defines it; renderers orient by the
/// coordinates.
pub fn build_grid(
    index: usize,
    (ni, nj): (usize, usize),
    ij: impl IntoIterator<Item = (usize, usize)>,
    values: Vec<f32>,
    latlons: Vec<(f32, f32)>,
) -> Result<GridField, DecodeError> {
    let points = values.len();
    let mismatch = DecodeError::GridMismatch {
        index,
        ni,
        nj,
        points,
    };
    let len = match ni.checked_mul(nj) {
        Some(len) if len == points && len == latlons.len() => len,
        _ => return Err(mismatch),
    };

    let mut grid_values = vec![f32::NAN; len];
    let mut lats = vec![f32::NAN; len];
    let mut lons = vec![f32::NAN; len];
    let mut placed = 0;
    for (((i, j), value), (lat, lon)) in ij.into_iter().zip(values).zip(latlons) {
        if i >= ni || j >= nj {
            return Err(mismatch);
        }
        let k = j * ni + i;
        grid_values[k] = value;
        lats[k] = lat;
        lons[k] = lon;
        placed += 1;
    }
    if placed != len {
        return Err(mismatch);
    }

    GridField::new(ni, nj, grid_values, lats, lons).ok_or(mismatch)
}

/// Decodes every submessage in a GRIB2 buffer.
///
/// Any malformed message fails the whole decode; no partial list is returned.
pub fn decode_grib2(data: &[u8], table: &ParameterTable) -> Result<Vec<WeatherRecord>, DecodeError> {
    let start = web_time::Instant::now();
    let grib2 = grib::from_bytes(data)?;
    if grib2.is_empty() {
        return Err(DecodeError::NotGrib);
    }

    let mut records = Vec::with_capacity(grib2.len());
    for (_index, submessage) in grib2.iter() {
        let number = records.len() + 1;
        let prod_def = submessage.prod_def();
        let meta = FieldMeta {
            number,
            discipline: submessage.indicator().discipline,
            category: prod_def.parameter_category(),
            parameter: prod_def.parameter_number(),
            grid_template: submessage.grid_def().grid_tmpl_num(),
            level: prod_def
                .fixed_surfaces()
                .map(|(first, _second)| first.value()),
            times: resolve_times(number, &submessage.temporal_raw_info())?,
        };

        let shape = submessage.grid_shape()?;
        let ij: Vec<(usize, usize)> = submessage.ij()?.collect();
        let latlons: Vec<(f32, f32)> = submessage.latlons()?.collect();

        let decoder = grib::Grib2SubmessageDecoder::from(submessage)?;
        let values: Vec<f32> = decoder.dispatch()?.collect();

        let grid = build_grid(number, shape, ij, values, latlons)?;
        let (name, units) = meta.name_and_units(table);
        let descriptor = meta.descriptor(&name, &units);

        log::debug!("Decoded {} ({}x{})", descriptor, grid.ni, grid.nj);

        records.push(WeatherRecord {
            name,
            descriptor,
            valid_time: meta.times.valid,
            units,
            grid,
        });
    }

    log::info!(
        "Decoded {} record(s) in {:.1} ms",
        records.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grib::labels::{extract_label, is_weather_code};
    use chrono::NaiveDate;
    use grib::UtcDateTime;

    /// A single-field GRIB2 message on a 3x2 regular lat/lon grid over
    /// 130E-132E, 35N-36N, simple-packed with 8 bits per value.
    #[derive(Debug, Clone)]
    pub(crate) struct SyntheticField {
        pub edition: u8,
        pub category: u8,
        pub parameter: u8,
        pub time_unit: u8,
        pub lead: u32,
        pub scan_mode: u8,
        pub values: Vec<u8>,
    }

    impl Default for SyntheticField {
        fn default() -> Self {
            Self {
                edition: 2,
                category: 0,
                parameter: 0,
                time_unit: 1,
                lead: 6,
                scan_mode: 0,
                values: vec![1, 2, 3, 4, 5, 6],
            }
        }
    }

    fn section(number: u8, body: &[u8]) -> Vec<u8> {
        let mut out = ((body.len() + 5) as u32).to_be_bytes().to_vec();
        out.push(number);
        out.extend_from_slice(body);
        out
    }

    impl SyntheticField {
        pub(crate) fn encode(&self) -> Vec<u8> {
            let (ni, nj) = (3u32, 2u32);
            let points = ni * nj;
            // +j scanning starts at the southern row
            let (first_lat, last_lat) = if self.scan_mode & 0x40 != 0 {
                (35_000_000u32, 36_000_000u32)
            } else {
                (36_000_000u32, 35_000_000u32)
            };

            let mut sect1 = Vec::new();
            sect1.extend(34u16.to_be_bytes());
            sect1.extend(0u16.to_be_bytes());
            sect1.extend([2, 1, 1]);
            sect1.extend(2024u16.to_be_bytes());
            sect1.extend([7, 1, 0, 0, 0, 0, 1]);

            let mut sect3 = vec![0];
            sect3.extend(points.to_be_bytes());
            sect3.extend([0, 0]);
            sect3.extend(0u16.to_be_bytes());
            sect3.extend([6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
            sect3.extend(ni.to_be_bytes());
            sect3.extend(nj.to_be_bytes());
            sect3.extend(0u32.to_be_bytes());
            sect3.extend(0u32.to_be_bytes());
            sect3.extend(first_lat.to_be_bytes());
            sect3.extend(130_000_000u32.to_be_bytes());
            sect3.push(0x30);
            sect3.extend(last_lat.to_be_bytes());
            sect3.extend(132_000_000u32.to_be_bytes());
            sect3.extend(1_000_000u32.to_be_bytes());
            sect3.extend(1_000_000u32.to_be_bytes());
            sect3.push(self.scan_mode);

            let mut sect4 = Vec::new();
            sect4.extend(0u16.to_be_bytes());
            sect4.extend(0u16.to_be_bytes());
            sect4.extend([self.category, self.parameter, 2, 0, 0]);
            sect4.extend(0u16.to_be_bytes());
            sect4.extend([0, self.time_unit]);
            sect4.extend(self.lead.to_be_bytes());
            sect4.extend([1, 0]);
            sect4.extend(0u32.to_be_bytes());
            sect4.extend([255, 0]);
            sect4.extend(0u32.to_be_bytes());

            let mut sect5 = points.to_be_bytes().to_vec();
            sect5.extend(0u16.to_be_bytes());
            sect5.extend(0f32.to_be_bytes());
            sect5.extend(0u16.to_be_bytes());
            sect5.extend(0u16.to_be_bytes());
            sect5.extend([8, 0]);

            let mut body = Vec::new();
            body.extend(section(1, &sect1));
            body.extend(section(3, &sect3));
            body.extend(section(4, &sect4));
            body.extend(section(5, &sect5));
            body.extend(section(6, &[255]));
            body.extend(section(7, &self.values));
            body.extend(b"7777");

            let mut message = b"GRIB".to_vec();
            message.extend([0, 0, 0, self.edition]);
            message.extend(((body.len() + 16) as u64).to_be_bytes());
            message.extend(body);
            message
        }
    }

    fn time(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn raw(unit: u8, value: u32) -> TemporalRawInfo {
        let unit = Table4_4::try_from(unit).map_or(Code::Num(unit), Code::Name);
        TemporalRawInfo {
            ref_time_significance: Code::Num(1),
            ref_time_unchecked: UtcDateTime::new(2024, 7, 1, 0, 0, 0),
            forecast_time_diff: Some(ForecastTime::new(unit, value)),
        }
    }

    fn meta(number: usize, category: u8, parameter: u8) -> FieldMeta {
        FieldMeta {
            number,
            discipline: 0,
            category: Some(category),
            parameter: Some(parameter),
            grid_template: 0,
            level: Some(0.0),
            times: FieldTimes {
                reference: time(1, 0),
                valid: time(1, 6),
                lead: Some("6 hrs".to_string()),
            },
        }
    }

    fn record_for(m: &FieldMeta) -> WeatherRecord {
        let (name, units) = m.name_and_units(&ParameterTable::wmo());
        WeatherRecord {
            descriptor: m.descriptor(&name, &units),
            name,
            valid_time: m.times.valid,
            units,
            grid: GridField::new(1, 1, vec![1.0], vec![35.0], vec![135.0]).unwrap(),
        }
    }

    #[test]
    fn test_lead_units() {
        let cases: [(u8, u32, NaiveDateTime, &str); 12] = [
            (13, 3600, time(1, 1), "3600 secs"),
            (0, 90, time(1, 1) + chrono::Duration::minutes(30), "90 mins"),
            (1, 6, time(1, 6), "6 hrs"),
            (10, 2, time(1, 6), "6 hrs"),
            (11, 2, time(1, 12), "12 hrs"),
            (12, 1, time(1, 12), "12 hrs"),
            (2, 2, time(3, 0), "2 days"),
            (3, 1, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(), "1 months"),
            (4, 1, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(), "1 years"),
            (5, 1, NaiveDate::from_ymd_opt(2034, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(), "10 years"),
            (6, 1, NaiveDate::from_ymd_opt(2054, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(), "30 years"),
            (7, 1, NaiveDate::from_ymd_opt(2124, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(), "100 years"),
        ];
        for (unit, value, valid, lead) in cases {
            let times = resolve_times(1, &raw(unit, value)).unwrap();
            assert_eq!(times.reference, time(1, 0), "unit {}", unit);
            assert_eq!(times.valid, valid, "unit {}", unit);
            assert_eq!(times.lead.as_deref(), Some(lead), "unit {}", unit);
        }
    }

    #[test]
    fn test_missing_lead_keeps_reference_time() {
        let times = resolve_times(1, &raw(255, 6)).unwrap();
        assert_eq!(times.valid, time(1, 0));
        assert_eq!(times.lead, None);

        let mut no_forecast = raw(1, 0);
        no_forecast.forecast_time_diff = None;
        assert_eq!(resolve_times(1, &no_forecast).unwrap().valid, time(1, 0));
    }

    #[test]
    fn test_invalid_reference_time() {
        let mut bad = raw(1, 6);
        bad.ref_time_unchecked = UtcDateTime::new(2024, 2, 30, 0, 0, 0);
        assert!(matches!(
            resolve_times(3, &bad),
            Err(DecodeError::InvalidReferenceTime { index: 3, .. })
        ));
    }

    #[test]
    fn test_known_parameter_descriptor() {
        let m = meta(4, 0, 0);
        let (name, units) = m.name_and_units(&ParameterTable::wmo());
        assert_eq!((name.as_str(), units.as_str()), ("Temperature", "K"));
        assert_eq!(
            m.descriptor(&name, &units),
            "4:Temperature:K (instant):regular_ll:level 0:fcst time 6 hrs:from 202407010000"
        );
    }

    #[test]
    fn test_local_weather_code_descriptor_is_detected() {
        let record = record_for(&meta(4, 192, 192));
        assert_eq!(
            record.descriptor,
            "4:local 0-192-192:unknown (instant):regular_ll:level 0:fcst time 6 hrs:from 202407010000:codes 192:192"
        );
        assert!(is_weather_code(&record));
        assert_eq!(extract_label(&record), "weather code");
    }

    #[test]
    fn test_record_number_does_not_form_weather_code_marker() {
        let record = record_for(&meta(192, 192, 5));
        assert!(!is_weather_code(&record));
        assert_eq!(extract_label(&record), "local 0-192-5");

        let record = record_for(&meta(192, 5, 192));
        assert!(!is_weather_code(&record));
    }

    #[test]
    fn test_local_parameter_label_names_all_codes() {
        let a = record_for(&meta(1, 193, 1));
        let b = record_for(&meta(2, 193, 2));
        assert!(!is_weather_code(&a));
        assert_eq!(extract_label(&a), "local 0-193-1");
        assert_ne!(extract_label(&a), extract_label(&b));
    }

    #[test]
    fn test_build_grid_places_column_major_values() {
        // (i, j) order of a column-major scan
        let ij = [(0, 0), (0, 1), (1, 0), (1, 1)];
        let latlons = vec![(36.0, 130.0), (35.0, 130.0), (36.0, 131.0), (35.0, 131.0)];
        let grid = build_grid(1, (2, 2), ij, vec![1.0, 2.0, 3.0, 4.0], latlons).unwrap();
        assert_eq!((grid.ni, grid.nj), (2, 2));
        assert_eq!(grid.values, vec![1.0, 3.0, 2.0, 4.0]);
        assert_eq!(grid.lats, vec![36.0, 36.0, 35.0, 35.0]);
        assert_eq!(grid.lons, vec![130.0, 131.0, 130.0, 131.0]);
    }

    #[test]
    fn test_build_grid_rejects_mismatch() {
        let ij = [(0, 0), (1, 0), (0, 1), (1, 1)];
        let latlons = vec![(36.0, 130.0), (36.0, 131.0), (35.0, 130.0), (35.0, 131.0)];
        assert!(matches!(
            build_grid(1, (2, 2), ij, vec![1.0, 2.0, 3.0], latlons.clone()),
            Err(DecodeError::GridMismatch { points: 3, .. })
        ));
        assert!(matches!(
            build_grid(1, (2, 2), [(0, 0), (1, 0), (0, 1), (2, 1)], vec![0.0; 4], latlons),
            Err(DecodeError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_row_major_message() {
        let data = SyntheticField::default().encode();
        let records = decode_grib2(&data, &ParameterTable::wmo()).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.name, "Temperature");
        assert_eq!(record.units, "K");
        assert_eq!(record.valid_time, time(1, 6));
        assert_eq!(
            record.descriptor,
            "1:Temperature:K (instant):regular_ll:level 0:fcst time 6 hrs:from 202407010000"
        );
        assert_eq!((record.grid.ni, record.grid.nj), (3, 2));
        assert_eq!(record.grid.values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(record.grid.lats, vec![36.0, 36.0, 36.0, 35.0, 35.0, 35.0]);
        assert_eq!(record.grid.lons, vec![130.0, 131.0, 132.0, 130.0, 131.0, 132.0]);
        assert!(record.grid.rows_north_to_south());
    }

    #[test]
    fn test_decode_column_major_message() {
        let field = SyntheticField {
            scan_mode: 0x20,
            ..Default::default()
        };
        let records = decode_grib2(&field.encode(), &ParameterTable::wmo()).unwrap();
        let grid = &records[0].grid;
        assert_eq!((grid.ni, grid.nj), (3, 2));
        assert_eq!(grid.values, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(grid.lats, vec![36.0, 36.0, 36.0, 35.0, 35.0, 35.0]);
        assert_eq!(grid.nearest_value(132.0, 35.0), Some(6.0));
    }

    #[test]
    fn test_decode_south_to_north_message() {
        let field = SyntheticField {
            scan_mode: 0x40,
            ..Default::default()
        };
        let records = decode_grib2(&field.encode(), &ParameterTable::wmo()).unwrap();
        let grid = &records[0].grid;
        assert!(!grid.rows_north_to_south());
        assert_eq!(grid.lats[0], 35.0);
        assert_eq!(grid.nearest_value(130.0, 36.0), Some(4.0));
    }

    #[test]
    fn test_decode_multiple_messages() {
        let mut data = SyntheticField {
            category: 1,
            parameter: 3,
            ..Default::default()
        }
        .encode();
        data.extend(
            SyntheticField {
                category: 1,
                parameter: 12,
                time_unit: 10,
                lead: 4,
                ..Default::default()
            }
            .encode(),
        );
        data.extend(
            SyntheticField {
                category: 192,
                parameter: 192,
                values: vec![1, 2, 3, 4, 5, 1],
                ..Default::default()
            }
            .encode(),
        );

        let records = decode_grib2(&data, &ParameterTable::wmo()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(extract_label(&records[0]), "Precipitable water");
        assert_eq!(extract_label(&records[1]), "Snowfall rate water equivalent");
        assert_eq!(records[1].valid_time, time(1, 12));
        assert!(records[1].descriptor.contains("fcst time 12 hrs"));
        assert!(is_weather_code(&records[2]));
        assert!(records[2].descriptor.starts_with("3:local 0-192-192:unknown"));
    }

    #[test]
    fn test_decode_rejects_non_grib() {
        let result = decode_grib2(b"PK\x03\x04 zip archive, not a weather file", &ParameterTable::wmo());
        assert!(matches!(result, Err(DecodeError::NotGrib)));
    }

    #[test]
    fn test_decode_rejects_edition_1() {
        let field = SyntheticField {
            edition: 1,
            ..Default::default()
        };
        let result = decode_grib2(&field.encode(), &ParameterTable::wmo());
        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedEdition { edition: 1 })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_message() {
        let data = SyntheticField::default().encode();
        let result = decode_grib2(&data[..20], &ParameterTable::wmo());
        assert!(result.is_err());
    }
}
