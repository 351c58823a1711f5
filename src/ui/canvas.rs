//! Central canvas UI: the scrollable grid of map panels.

use super::colors;
use super::panel::{render_panel, PanelContext};
use crate::geo::GeoLayerSet;
use crate::grib::{panel_rows, row_count, PANELS_PER_ROW};
use crate::render::FieldTextureCache;
use crate::state::AppState;
use eframe::egui::{self, RichText, ScrollArea};

pub fn render_canvas(
    ctx: &egui::Context,
    state: &AppState,
    textures: &mut FieldTextureCache,
    geo_layers: &GeoLayerSet,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &state.upload_state.error {
            render_error_banner(ui, error);
            return;
        }

        let Some(catalog) = &state.catalog else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Choose a GRIB2 file to begin")
                        .size(16.0)
                        .color(colors::ui::LABEL),
                );
            });
            return;
        };

        let visible = state.visible_records();
        if visible.is_empty() {
            ui.label(RichText::new("No variables selected for this time").color(colors::ui::LABEL));
            return;
        }

        log::trace!(
            "Drawing {} panel(s) in {} row(s)",
            visible.len(),
            row_count(visible.len())
        );

        let mut cx = PanelContext {
            textures,
            geo_layers,
            layers: &state.layer_state,
            settings: &state.settings,
            cjk_font: state.cjk_font_loaded,
        };

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            for row in panel_rows(&visible) {
                ui.columns(PANELS_PER_ROW, |columns| {
                    for (column, &index) in columns.iter_mut().zip(row) {
                        let label = catalog.label(index).unwrap_or_default();
                        if let Some(record) = catalog.records().get(index) {
                            render_panel(column, &mut cx, index, label, record);
                        }
                    }
                });
                ui.add_space(12.0);
            }
        });
    });
}

fn render_error_banner(ui: &mut egui::Ui, error: &str) {
    egui::Frame::new()
        .fill(colors::banner::ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, colors::banner::ERROR_STROKE))
        .inner_margin(10.0)
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(format!(
                    "{} Failed to decode GRIB2 file",
                    egui_phosphor::regular::WARNING
                ))
                .strong()
                .color(colors::banner::ERROR_TEXT),
            );
            ui.label(RichText::new(error).monospace().color(colors::banner::ERROR_TEXT));
        });
}
