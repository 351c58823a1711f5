//! Left panel UI: file upload, time and variable selection, overlays and settings.

use super::colors;
use crate::file_ops::FilePickerChannel;
use crate::grib::format_valid_time;
use crate::state::{AppState, ViewerSettings};
use eframe::egui::{self, RichText, ScrollArea};
use egui_phosphor::regular as icons;
use std::collections::BTreeSet;

pub fn render_left_panel(
    ctx: &egui::Context,
    state: &mut AppState,
    file_picker: &FilePickerChannel,
) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(280.0)
        .min_width(220.0)
        .max_width(420.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Load Data");
                ui.separator();

                render_upload_section(ui, state, file_picker);
                ui.add_space(10.0);

                if state.catalog.is_some() {
                    render_time_section(ui, state);
                    ui.add_space(5.0);

                    render_variable_section(ui, state);
                    ui.add_space(5.0);
                }

                render_layers_section(ui, state);
                ui.add_space(5.0);

                render_settings_section(ui, state);
            });
        });
}

fn render_upload_section(ui: &mut egui::Ui, state: &mut AppState, file_picker: &FilePickerChannel) {
    let is_loading = state.upload_state.loading;

    ui.add_enabled_ui(!is_loading, |ui| {
        if ui
            .button(format!("{} Choose GRIB2 file...", icons::FOLDER_OPEN))
            .clicked()
        {
            state.upload_state.loading = true;
            state.status_message = "Opening file dialog...".to_string();
            file_picker.pick_file(ui.ctx().clone());
        }
    });

    if is_loading {
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Selecting file...");
        });
    }

    let Some(name) = &state.upload_state.file_name else {
        return;
    };

    ui.add_space(10.0);
    ui.group(|ui| {
        match (&state.catalog, &state.upload_state.error) {
            (Some(catalog), _) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icons::CHECK).color(colors::ui::SUCCESS));
                    ui.label(RichText::new("File loaded").small());
                });
                ui.label(RichText::new(name).strong().monospace());
                if let Some(size) = state.upload_state.file_size {
                    ui.label(format_file_size(size));
                }
                ui.label(
                    RichText::new(format!(
                        "{} records, {} variables, {} times",
                        catalog.len(),
                        catalog.unique_labels().len(),
                        catalog.valid_times().len()
                    ))
                    .small()
                    .color(colors::ui::VALUE),
                );
            }
            (None, Some(error)) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icons::WARNING).color(colors::banner::ERROR_STROKE));
                    ui.label(RichText::new("Decode failed").small());
                });
                ui.label(RichText::new(name).strong().monospace());
                ui.label(
                    RichText::new(error)
                        .small()
                        .color(colors::banner::ERROR_TEXT),
                );
            }
            (None, None) => {
                ui.label(RichText::new(name).strong().monospace());
            }
        }
    });
}

fn render_time_section(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    let times = catalog.valid_times();
    let count = times.len();
    if count == 0 {
        return;
    }

    egui::CollapsingHeader::new(RichText::new("Forecast time").strong())
        .default_open(true)
        .show(ui, |ui| {
            let mut index = state.selection.time_index();

            let selected_text = times
                .get(index)
                .map(format_valid_time)
                .unwrap_or_default();
            egui::ComboBox::from_id_salt("time_selector")
                .selected_text(selected_text)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for (i, time) in times.iter().enumerate() {
                        ui.selectable_value(&mut index, i, format_valid_time(time));
                    }
                });

            ui.add(egui::Slider::new(&mut index, 0..=count - 1).text("index"));
            state.selection.select_time(index, count);

            ui.horizontal(|ui| {
                let at_start = state.selection.time_index() == 0;
                let at_end = state.selection.time_index() + 1 >= count;
                if ui
                    .add_enabled(!at_start, egui::Button::new(format!("{} Previous", icons::CARET_LEFT)))
                    .clicked()
                {
                    state.selection.step_previous();
                }
                if ui
                    .add_enabled(!at_end, egui::Button::new(format!("Next {}", icons::CARET_RIGHT)))
                    .clicked()
                {
                    state.selection.step_next(count);
                }
            });

            ui.label(
                RichText::new(format!("{} / {}", state.selection.time_index() + 1, count))
                    .small()
                    .color(colors::ui::LABEL),
            );
        });
}

fn render_variable_section(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };

    egui::CollapsingHeader::new(RichText::new("Variables").strong())
        .default_open(true)
        .show(ui, |ui| {
            // Labels selected earlier but absent from this file stay selected
            let mut chosen: BTreeSet<String> = state.selection.selected_labels().clone();
            for label in catalog.unique_labels() {
                let mut checked = chosen.contains(label);
                if ui.checkbox(&mut checked, label.as_str()).changed() {
                    if checked {
                        chosen.insert(label.clone());
                    } else {
                        chosen.remove(label);
                    }
                }
            }

            let missing = catalog.missing_labels(&chosen);
            if !missing.is_empty() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Not in this file: {}", missing.join(", ")))
                        .small()
                        .color(colors::ui::WARNING),
                );
            }

            state.selection.set_selected_labels(chosen);
        });
}

fn render_layers_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Layers").strong())
        .default_open(true)
        .show(ui, |ui| {
            ui.checkbox(&mut state.layer_state.coastline, "Coastlines");
            ui.checkbox(&mut state.layer_state.borders, "Borders");
            ui.checkbox(&mut state.layer_state.hover_readout, "Hover readout");
        });
}

fn render_settings_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Settings").strong())
        .default_open(false)
        .show(ui, |ui| {
            let settings = &mut state.settings;

            ui.add(
                egui::Slider::new(
                    &mut settings.contour_bins,
                    ViewerSettings::min_bins()..=ViewerSettings::max_bins(),
                )
                .text("contour bins"),
            );
            ui.add(egui::Slider::new(&mut settings.panel_height, 200.0..=1200.0).text("panel height"));

            ui.add_space(5.0);
            path_field(ui, "Coastline", &mut settings.coastline_path);
            path_field(ui, "Borders", &mut settings.borders_path);
            path_field(ui, "CJK font", &mut settings.cjk_font_path);

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.button(format!("{} Save", icons::FLOPPY_DISK)).clicked() {
                    settings.save();
                }
                if ui
                    .button(format!("{} Reload overlays", icons::ARROW_CLOCKWISE))
                    .clicked()
                {
                    state.reload_resources_requested = true;
                }
            });
        });
}

fn path_field(ui: &mut egui::Ui, label: &str, value: &mut Option<String>) {
    let mut text = value.clone().unwrap_or_default();
    ui.label(RichText::new(label).small().color(colors::ui::LABEL));
    if ui
        .add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY))
        .changed()
    {
        *value = Some(text).filter(|t| !t.trim().is_empty());
    }
}

fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
