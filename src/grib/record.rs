//! Decoded weather-field records.

use chrono::NaiveDateTime;

/// Placeholder variable name used when a parameter is not in the parameter table.
pub const UNKNOWN_NAME: &str = "unknown";

/// A regular 2D grid of values with parallel latitude/longitude grids.
///
/// All three vectors are row-major with `nj` rows of `ni` points. Row 0 and
/// column 0 hold the message's first grid point, so the rows may run south to
/// north and the columns east to west; check [`GridField::rows_north_to_south`]
/// and the longitudes before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    /// Number of points along a parallel (columns)
    pub ni: usize,
    /// Number of points along a meridian (rows)
    pub nj: usize,
    pub values: Vec<f32>,
    pub lats: Vec<f32>,
    pub lons: Vec<f32>,
}

impl GridField {
    /// Creates a grid, returning `None` if the vectors don't match `ni * nj`.
    pub fn new(
        ni: usize,
        nj: usize,
        values: Vec<f32>,
        lats: Vec<f32>,
        lons: Vec<f32>,
    ) -> Option<Self> {
        let len = ni.checked_mul(nj)?;
        if values.len() != len || lats.len() != len || lons.len() != len {
            return None;
        }
        Some(Self {
            ni,
            nj,
            values,
            lats,
            lons,
        })
    }

    /// Value at column `i`, row `j`.
    pub fn value(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.ni || j >= self.nj {
            return None;
        }
        self.values.get(j * self.ni + i).copied()
    }

    /// Minimum and maximum of the finite values, if any.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        finite_range(&self.values)
    }

    /// Geographic extent of the grid coordinates.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let (min_lat, max_lat) = finite_range(&self.lats)?;
        let (min_lon, max_lon) = finite_range(&self.lons)?;
        Some(GeoBounds {
            min_lon: min_lon as f64,
            min_lat: min_lat as f64,
            max_lon: max_lon as f64,
            max_lat: max_lat as f64,
        })
    }

    /// Whether the first row lies north of the last row.
    pub fn rows_north_to_south(&self) -> bool {
        if self.nj < 2 || self.ni == 0 {
            return true;
        }
        let first = self.lats[0];
        let last = self.lats[(self.nj - 1) * self.ni];
        first >= last
    }

    /// Nearest grid value to a geographic coordinate.
    ///
    /// Linear scan; grids are only sampled on hover.
    pub fn nearest_value(&self, lon: f64, lat: f64) -> Option<f32> {
        let mut best: Option<(f64, f32)> = None;
        for ((&la, &lo), &v) in self.lats.iter().zip(&self.lons).zip(&self.values) {
            let d = (la as f64 - lat).powi(2) + (lo as f64 - lon).powi(2);
            match best {
                Some((bd, _)) if bd <= d => {}
                _ => best = Some((d, v)),
            }
        }
        best.map(|(_, v)| v)
    }
}

fn finite_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// The narrow view of a decoded field used by labeling, filtering and rendering.
pub trait FieldRecord {
    /// Raw variable name, [`UNKNOWN_NAME`] when not descriptive.
    fn name(&self) -> &str;
    /// Colon-separated description of the field.
    fn descriptor(&self) -> &str;
    /// Forecast target time (UTC).
    fn valid_time(&self) -> NaiveDateTime;
    fn units(&self) -> &str;
    fn grid(&self) -> &GridField;
}

/// One decoded GRIB2 field.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub name: String,
    pub descriptor: String,
    pub valid_time: NaiveDateTime,
    pub units: String,
    pub grid: GridField,
}

impl FieldRecord for WeatherRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }

    fn valid_time(&self) -> NaiveDateTime {
        self.valid_time
    }

    fn units(&self) -> &str {
        &self.units
    }

    fn grid(&self) -> &GridField {
        &self.grid
    }
}

/// Formats a validity time the way panel titles and the dropdown show it.
pub fn format_valid_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
