#![warn(clippy::all)]

//! GPV Workbench - an interactive GRIB2 weather-model viewer.
//!
//! Loads a GRIB2 file, lets the user pick a forecast time and a set of
//! variables, and draws each selected field as a map panel with coastlines
//! and a legend, two panels per row.

mod file_ops;
mod geo;
mod grib;
mod render;
mod state;
mod ui;

use eframe::egui;
use file_ops::{FilePickResult, FilePickerChannel};
use crate::grib::{decode_grib2, ParameterTable, RecordCatalog};
use render::FieldTextureCache;
use state::{AppState, ViewerSettings};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GPV Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(GpvWorkbenchApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find app_canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GpvWorkbenchApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct GpvWorkbenchApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel for async file picker operations
    file_picker: FilePickerChannel,

    /// Parameter names and units used when decoding
    parameters: ParameterTable,

    /// Geographic layer data for map overlays
    geo_layers: geo::GeoLayerSet,

    /// Texture cache for rendered field imagery
    field_textures: FieldTextureCache,
}

impl GpvWorkbenchApp {
    /// Creates a new GpvWorkbenchApp instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = ViewerSettings::load();
        let cjk_font_loaded = install_fonts(&cc.egui_ctx, settings.cjk_font_path.as_deref());

        let geo_layers = load_geo_layers(&settings);
        let parameters = ParameterTable::wmo();
        log::info!("Parameter units known for {} codes", parameters.len());

        let mut state = AppState::new(settings);
        state.cjk_font_loaded = cjk_font_loaded;

        Self {
            state,
            file_picker: FilePickerChannel::new(),
            parameters,
            geo_layers,
            field_textures: FieldTextureCache::new(),
        }
    }

    /// Decodes a picked file and swaps it in as the loaded catalog.
    fn load_file(&mut self, picked: FilePickResult) {
        log::info!(
            "Decoding {} ({} bytes)",
            picked.file_name,
            picked.file_size
        );
        if !picked.has_grib_extension() {
            log::warn!("{} has no GRIB2 extension, decoding anyway", picked.file_name);
        }
        self.state
            .upload_state
            .set_file(picked.file_name, picked.file_size);
        self.field_textures.invalidate();

        match decode_grib2(&picked.file_data, &self.parameters) {
            Ok(records) => {
                self.state.load_catalog(RecordCatalog::from_records(records));
            }
            Err(e) => {
                log::error!("Failed to decode GRIB2 file: {}", e);
                self.state.fail_decode(e.to_string());
            }
        }
    }

    fn poll_file_picker(&mut self) {
        let Some(result) = self.file_picker.try_recv() else {
            return;
        };
        self.state.upload_state.loading = false;

        match result {
            Some(picked) => self.load_file(picked),
            None => {
                log::debug!("File dialog cancelled");
                self.state.status_message = if self.state.catalog.is_some() {
                    "File selection cancelled".to_string()
                } else {
                    "Upload a GRIB2 file to begin".to_string()
                };
            }
        }
    }

    /// Left/Right arrows step through times when no text field has focus.
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let count = self.state.time_count();
        let (left, right) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if left {
            self.state.selection.step_previous();
        }
        if right {
            self.state.selection.step_next(count);
        }
    }

    fn reload_resources(&mut self, ctx: &egui::Context) {
        if !self.state.reload_resources_requested {
            return;
        }
        self.state.reload_resources_requested = false;
        self.state.cjk_font_loaded =
            install_fonts(ctx, self.state.settings.cjk_font_path.as_deref());
        self.geo_layers = load_geo_layers(&self.state.settings);
        self.state.status_message = "Reloaded overlays and fonts".to_string();
    }
}

impl eframe::App for GpvWorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_file_picker();
        self.reload_resources(ctx);

        // Selection is repaired before any control reads it
        self.state.sync_selection();
        self.handle_keyboard(ctx);

        ui::render_top_bar(ctx, &self.state);
        ui::render_left_panel(ctx, &mut self.state, &self.file_picker);
        ui::render_canvas(
            ctx,
            &self.state,
            &mut self.field_textures,
            &self.geo_layers,
        );
    }
}

fn load_geo_layers(settings: &ViewerSettings) -> geo::GeoLayerSet {
    geo::GeoLayerSet::load(
        settings.coastline_path.as_deref(),
        settings.borders_path.as_deref(),
    )
}

/// Fonts with Japanese glyphs commonly installed on Linux, macOS and Windows.
const SYSTEM_CJK_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/ipaexfont-gothic/ipaexg.ttf",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\YuGothR.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

/// The configured font path first, then the well-known system fonts.
fn cjk_font_candidates(configured: Option<&str>) -> Vec<&str> {
    configured
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .into_iter()
        .chain(SYSTEM_CJK_FONTS.iter().copied())
        .collect()
}

/// Reads the first candidate font that exists.
fn first_readable_font<'a>(candidates: &[&'a str]) -> Option<(&'a str, Vec<u8>)> {
    candidates.iter().find_map(|&path| match read_font(path) {
        Ok(bytes) => Some((path, bytes)),
        Err(e) => {
            log::debug!("No CJK font at {}: {}", path, e);
            None
        }
    })
}

/// Installs phosphor icons and a font with Japanese glyphs when one is found.
///
/// Returns whether the Japanese font was installed. Without it, weather-code
/// legends fall back to English labels.
fn install_fonts(ctx: &egui::Context, cjk_font_path: Option<&str>) -> bool {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    let loaded = match first_readable_font(&cjk_font_candidates(cjk_font_path)) {
        Some((path, bytes)) => {
            log::info!("Loaded CJK font from {}", path);
            fonts.font_data.insert(
                "cjk".to_owned(),
                std::sync::Arc::new(egui::FontData::from_owned(bytes)),
            );
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push("cjk".to_owned());
            }
            true
        }
        None => {
            log::warn!("No CJK font found, weather-code labels will be shown in English");
            false
        }
    };

    ctx.set_fonts(fonts);
    loaded
}

#[cfg(not(target_arch = "wasm32"))]
fn read_font(path: &str) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

#[cfg(target_arch = "wasm32")]
fn read_font(path: &str) -> std::io::Result<Vec<u8>> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("cannot read {} from the browser", path),
    ))
}
