//! GRIB2 parameter names and units.
//!
//! Names come from WMO Code Table 4.2 as bundled with the `grib` crate. The
//! crate carries no units, so common parameters get theirs from the table
//! below. Reserved and centre-local codes (192-254) have no name.

use grib::codetables::{CodeTable4_2, Lookup};
use std::collections::HashMap;

/// Lookup key for parameter: (discipline, category, number)
pub type ParamKey = (u8, u8, u8);

/// Name and units of a known parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    /// `None` when the units table has no entry
    pub units: Option<String>,
}

/// Units for Code Table 4.2 entries common in regional and global model output.
const PARAMETER_UNITS: &[(ParamKey, &str)] = &[
    ((0, 0, 0), "K"),
    ((0, 0, 2), "K"),
    ((0, 0, 4), "K"),
    ((0, 0, 5), "K"),
    ((0, 0, 6), "K"),
    ((0, 0, 17), "K"),
    ((0, 1, 0), "kg kg-1"),
    ((0, 1, 1), "%"),
    ((0, 1, 3), "kg m-2"),
    ((0, 1, 7), "kg m-2 s-1"),
    ((0, 1, 8), "kg m-2"),
    ((0, 1, 11), "m"),
    ((0, 1, 12), "kg m-2 s-1"),
    ((0, 1, 13), "kg m-2"),
    ((0, 1, 29), "kg m-2"),
    ((0, 1, 52), "kg m-2 s-1"),
    ((0, 2, 0), "degree true"),
    ((0, 2, 1), "m s-1"),
    ((0, 2, 2), "m s-1"),
    ((0, 2, 3), "m s-1"),
    ((0, 2, 8), "Pa s-1"),
    ((0, 2, 9), "m s-1"),
    ((0, 2, 10), "s-1"),
    ((0, 2, 22), "m s-1"),
    ((0, 3, 0), "Pa"),
    ((0, 3, 1), "Pa"),
    ((0, 3, 4), "m2 s-2"),
    ((0, 3, 5), "gpm"),
    ((0, 3, 18), "m"),
    ((0, 4, 7), "W m-2"),
    ((0, 5, 5), "W m-2"),
    ((0, 6, 1), "%"),
    ((0, 6, 3), "%"),
    ((0, 6, 4), "%"),
    ((0, 6, 5), "%"),
    ((0, 7, 6), "J kg-1"),
    ((0, 7, 7), "J kg-1"),
    ((0, 19, 0), "m"),
    ((2, 0, 0), "Proportion"),
    ((10, 0, 3), "m"),
    ((10, 3, 0), "K"),
];

/// Parameter lookup used by the decoder.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    units: HashMap<ParamKey, &'static str>,
}

impl ParameterTable {
    /// WMO names with the units table above.
    pub fn wmo() -> Self {
        Self {
            units: PARAMETER_UNITS.iter().copied().collect(),
        }
    }

    /// Name and units for a parameter, `None` for reserved or local codes.
    pub fn get(&self, discipline: u8, category: u8, number: u8) -> Option<ParameterInfo> {
        let name = wmo_name(discipline, category, number)?;
        let units = self
            .units
            .get(&(discipline, category, number))
            .map(|u| u.to_string());
        Some(ParameterInfo { name, units })
    }

    /// Number of parameters with known units.
    pub fn len(&self) -> usize {
        self.units.len()
    }
}

/// Code Table 4.2 name, skipping reserved, missing and unlisted entries.
fn wmo_name(discipline: u8, category: u8, number: u8) -> Option<String> {
    let name = CodeTable4_2::new(discipline, category)
        .lookup(usize::from(number))
        .to_string();
    let trimmed = name.trim();
    let placeholder = trimmed.is_empty()
        || trimmed == "Missing"
        || trimmed.starts_with("Reserved")
        || trimmed.starts_with("code '");
    (!placeholder).then(|| trimmed.to_string())
}
