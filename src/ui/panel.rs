//! A single map panel: title, field raster, overlays, hover readout and legend.

use super::colors;
use crate::geo::{image_extent, render_geo_layers, GeoLayerSet, GeoLayerType, MapProjection};
use crate::grib::{format_valid_time, is_weather_code, FieldRecord};
use crate::render::{show_legend, FieldCacheKey, FieldTextureCache, WeatherCode};
use crate::state::{LayerState, ViewerSettings};
use eframe::egui::{self, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};

const MIN_MAP_HEIGHT: f32 = 120.0;

/// Everything a panel needs besides its record.
pub struct PanelContext<'a> {
    pub textures: &'a mut FieldTextureCache,
    pub geo_layers: &'a GeoLayerSet,
    pub layers: &'a LayerState,
    pub settings: &'a ViewerSettings,
    /// Whether a font with Japanese glyphs is installed
    pub cjk_font: bool,
}

/// Title shown above a panel: `"{label} ({valid time})"`.
pub fn panel_title<R: FieldRecord + ?Sized>(label: &str, record: &R) -> String {
    format!("{} ({})", label, format_valid_time(&record.valid_time()))
}

pub fn render_panel<R: FieldRecord + ?Sized>(
    ui: &mut egui::Ui,
    cx: &mut PanelContext<'_>,
    record_index: usize,
    label: &str,
    record: &R,
) {
    ui.label(
        RichText::new(panel_title(label, record))
            .strong()
            .color(colors::panel::TITLE),
    );

    let Some(extent) = image_extent(record.grid()) else {
        ui.label(RichText::new("Field has no coordinates").color(colors::ui::WARNING));
        return;
    };

    let width = ui.available_width();
    let aspect = (extent.lon_span() / extent.lat_span().max(1e-6)) as f32;
    let height = (width / aspect.max(1e-3)).clamp(MIN_MAP_HEIGHT, cx.settings.panel_height);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::hover());
    let rect = response.rect;

    let projection = MapProjection::fit(extent, rect);
    let map_rect = projection.screen_rect;
    painter.rect_filled(map_rect, 0.0, colors::panel::BACKGROUND);

    let key = FieldCacheKey {
        record_index,
        bins: cx.settings.contour_bins,
    };
    let cached = cx.textures.get_or_render(ui.ctx(), key, record);
    painter.image(
        cached.texture.id(),
        map_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );

    let mut enabled = Vec::with_capacity(2);
    if cx.layers.coastline {
        enabled.push(GeoLayerType::Coastline);
    }
    if cx.layers.borders {
        enabled.push(GeoLayerType::Borders);
    }
    let map_painter = painter.with_clip_rect(map_rect);
    render_geo_layers(&map_painter, cx.geo_layers, &projection, &enabled);

    painter.rect_stroke(
        map_rect,
        0.0,
        Stroke::new(1.0, colors::panel::BORDER),
        egui::StrokeKind::Outside,
    );

    if cx.layers.hover_readout {
        if let Some(pos) = response.hover_pos().filter(|p| map_rect.contains(*p)) {
            let coord = projection.screen_to_geo(pos);
            let value = record.grid().nearest_value(coord.x, coord.y);
            let text = format!(
                "{:.2}°N {:.2}°E  {}",
                coord.y,
                coord.x,
                format_readout_value(record, value, cx.cjk_font)
            );
            draw_readout(&painter, map_rect, &text);
        }
    }

    show_legend(ui, &cached.style, cx.cjk_font);
}

fn draw_readout(painter: &egui::Painter, map_rect: Rect, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::monospace(11.0),
        colors::panel::READOUT_TEXT,
    );
    let pos = map_rect.left_top() + Vec2::splat(6.0);
    let bg = Rect::from_min_size(pos, galley.size()).expand(3.0);
    painter.rect_filled(bg, 3.0, colors::panel::readout_fill());
    painter.galley(pos, galley, colors::panel::READOUT_TEXT);
}

/// Readout for a hovered grid value.
pub fn format_readout_value<R: FieldRecord + ?Sized>(
    record: &R,
    value: Option<f32>,
    cjk: bool,
) -> String {
    match value {
        Some(v) if v.is_nan() => "missing".to_string(),
        Some(v) if is_weather_code(record) => match WeatherCode::from_value(v) {
            Some(code) => format!("{} ({})", code.label(cjk), v),
            None => "missing".to_string(),
        },
        Some(v) => format!("{:.2} {}", v, record.units()),
        None => "-".to_string(),
    }
}
