//! GRIB2 record model, decoding and labeling.
//!
//! - `decode`: buffer to [`WeatherRecord`] list via the `grib` crate
//! - `params`: parameter names (WMO Code Table 4.2) and units
//! - `labels`: label derivation and weather-code detection
//! - `catalog`: sorted vocabularies and selection filtering

mod catalog;
mod decode;
mod error;
pub(crate) mod labels;
mod params;
mod record;

pub use catalog::{panel_rows, row_count, RecordCatalog, PANELS_PER_ROW};
pub use decode::decode_grib2;
pub use labels::is_weather_code;
pub use params::ParameterTable;
pub use record::{format_valid_time, FieldRecord, GeoBounds, GridField};
