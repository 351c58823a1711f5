//! Viewer settings: overlay sources, fonts and rendering options.
//!
//! Native builds read and write `gpv-workbench.json` in the working
//! directory. Web builds persist to localStorage.

use serde::{Deserialize, Serialize};

/// Default contour bin count.
///
/// matplotlib's `contourf` asks `MaxNLocator(7 + 1)` for its levels, so an
/// unconfigured plot gets at most 8 bins.
pub const DEFAULT_CONTOUR_BINS: usize = 8;

/// User-adjustable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Coastline overlay (`.shp` or `.geojson`) replacing the built-in one
    pub coastline_path: Option<String>,
    /// Country border overlay replacing the built-in one
    pub borders_path: Option<String>,
    /// Font with Japanese glyphs, tried before the well-known system fonts
    pub cjk_font_path: Option<String>,
    /// Target number of filled-contour bins for continuous fields
    pub contour_bins: usize,
    /// Height of each map panel in points
    pub panel_height: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            coastline_path: None,
            borders_path: None,
            cjk_font_path: None,
            contour_bins: DEFAULT_CONTOUR_BINS,
            panel_height: 420.0,
        }
    }
}

impl ViewerSettings {
    /// Native settings file name.
    #[cfg(not(target_arch = "wasm32"))]
    const CONFIG_FILE: &'static str = "gpv-workbench.json";

    /// localStorage key for persisting settings.
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "gpv_workbench_settings";

    /// Parses settings JSON, falling back to defaults on error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Failed to parse viewer settings: {}", e);
                Self::default()
            }
        }
    }

    /// Clamps numeric options into usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.contour_bins = self.contour_bins.clamp(Self::min_bins(), Self::max_bins());
        self.panel_height = self.panel_height.clamp(200.0, 1200.0);
        self
    }

    pub fn min_bins() -> usize {
        2
    }

    pub fn max_bins() -> usize {
        30
    }

    /// Load settings from the config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::CONFIG_FILE) {
            Ok(json) => {
                log::info!("Loaded viewer settings from {}", Self::CONFIG_FILE);
                Self::from_json(&json)
            }
            Err(e) => {
                log::debug!("No settings file ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize viewer settings: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::write(Self::CONFIG_FILE, json) {
            log::warn!("Failed to save viewer settings: {}", e);
        } else {
            log::info!("Saved viewer settings to {}", Self::CONFIG_FILE);
        }
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return Self::default();
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded viewer settings from localStorage");
                Self::from_json(&json)
            }
            _ => Self::default(),
        }
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return;
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize viewer settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save viewer settings: {:?}", e);
        } else {
            log::info!("Saved viewer settings to localStorage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.contour_bins, 8);
        assert!(settings.coastline_path.is_none());
        assert!(settings.cjk_font_path.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = ViewerSettings::from_json(r#"{ "contour_bins": 12 }"#);
        assert_eq!(settings.contour_bins, 12);
        assert_eq!(settings.panel_height, ViewerSettings::default().panel_height);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(ViewerSettings::from_json("{ nope"), ViewerSettings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = ViewerSettings::from_json(r#"{ "contour_bins": 500, "panel_height": 10 }"#);
        assert_eq!(settings.contour_bins, ViewerSettings::max_bins());
        assert_eq!(settings.panel_height, 200.0);
    }
}
