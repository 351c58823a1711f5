//! Application state management.
//!
//! State is organized into logical groupings that correspond to different
//! areas of the viewer.

mod data_source;
mod layer;
mod selection;
mod settings;

pub use data_source::UploadState;
pub use layer::LayerState;
pub use selection::SelectionState;
pub use settings::ViewerSettings;

use crate::grib::RecordCatalog;

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// State for file upload
    pub upload_state: UploadState,

    /// Records of the currently loaded file, if decoding succeeded
    pub catalog: Option<RecordCatalog>,

    /// Timestamp and variable selection
    pub selection: SelectionState,

    /// Overlay visibility toggles
    pub layer_state: LayerState,

    /// Persisted viewer settings
    pub settings: ViewerSettings,

    /// Application status message displayed in top bar
    pub status_message: String,

    /// Set when overlay or font paths changed and should be reloaded
    pub reload_resources_requested: bool,

    /// Whether a font with Japanese glyphs is installed
    pub cjk_font_loaded: bool,
}

impl AppState {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            settings,
            status_message: "Upload a GRIB2 file to begin".to_string(),
            ..Default::default()
        }
    }

    /// Replaces the loaded records with a freshly decoded file.
    ///
    /// The selection is kept; call [`AppState::sync_selection`] afterwards.
    pub fn load_catalog(&mut self, catalog: RecordCatalog) {
        self.status_message = format!(
            "Loaded {} record(s), {} variable(s), {} time(s)",
            catalog.len(),
            catalog.unique_labels().len(),
            catalog.valid_times().len()
        );
        self.upload_state.error = None;
        self.catalog = Some(catalog);
        self.sync_selection();
    }

    /// Drops any loaded records and records the decode failure.
    pub fn fail_decode(&mut self, message: String) {
        self.status_message = format!("Decode failed: {}", message);
        self.upload_state.error = Some(message);
        self.catalog = None;
    }

    /// Applies first-load defaults and repairs the time index against the catalog.
    pub fn sync_selection(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.selection.ensure_initialized(catalog.unique_labels());
            self.selection.repair(catalog.valid_times().len());
        }
    }

    /// Number of distinct validity times in the loaded file.
    pub fn time_count(&self) -> usize {
        self.catalog
            .as_ref()
            .map(|c| c.valid_times().len())
            .unwrap_or(0)
    }

    /// Indices of records to draw for the current selection, in file order.
    pub fn visible_records(&self) -> Vec<usize> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        match self.selection.current_time(catalog.valid_times()) {
            Some(time) => catalog.filter_indices(self.selection.selected_labels(), time),
            None => Vec::new(),
        }
    }
}
