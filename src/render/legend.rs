//! Panel legends: a discrete key for weather codes, a colorbar otherwise.

use super::field::FieldStyle;
use super::palette::{weather_code_caption, WeatherCode};
use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Vec2};

const SWATCH: f32 = 12.0;
const BAR_HEIGHT: f32 = 12.0;
const TEXT_COLOR: Color32 = Color32::from_rgb(200, 200, 210);

/// Draws the legend for a style, filling the available width.
///
/// `cjk` selects Japanese weather-code labels; it must only be set when a
/// font with Japanese glyphs is installed.
pub fn show_legend(ui: &mut egui::Ui, style: &FieldStyle, cjk: bool) {
    match style {
        FieldStyle::WeatherCode => discrete_legend(ui, cjk),
        FieldStyle::Contour { scale, units } => {
            colorbar(ui, scale.levels(), scale.band_colors(), units)
        }
    }
}

fn discrete_legend(ui: &mut egui::Ui, cjk: bool) {
    ui.horizontal_wrapped(|ui| {
        ui.label(
            egui::RichText::new(weather_code_caption(cjk))
                .color(TEXT_COLOR)
                .strong(),
        );
        for code in WeatherCode::ALL {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, code.color());
            ui.label(
                egui::RichText::new(format!("{} {}", code.code(), code.label(cjk)))
                    .color(TEXT_COLOR)
                    .small(),
            );
        }
    });
}

fn colorbar(ui: &mut egui::Ui, levels: &[f64], colors: &[Color32], units: &str) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, BAR_HEIGHT + 28.0), Sense::hover());
    let painter = ui.painter_at(rect);
    if colors.is_empty() {
        return;
    }

    let margin = 16.0;
    let bar = Rect::from_min_size(
        rect.min + Vec2::new(margin, 0.0),
        Vec2::new((rect.width() - 2.0 * margin).max(1.0), BAR_HEIGHT),
    );
    let band_width = bar.width() / colors.len() as f32;

    for (k, color) in colors.iter().enumerate() {
        let band = Rect::from_min_size(
            bar.min + Vec2::new(k as f32 * band_width, 0.0),
            Vec2::new(band_width, BAR_HEIGHT),
        );
        painter.rect_filled(band, 0.0, *color);
    }
    painter.rect_stroke(
        bar,
        0.0,
        Stroke::new(1.0, Color32::from_gray(90)),
        egui::StrokeKind::Outside,
    );

    let step = levels.get(1).zip(levels.first()).map(|(b, a)| b - a).unwrap_or(1.0);
    let stride = tick_stride(levels.len(), bar.width());
    for (k, level) in levels.iter().enumerate().step_by(stride) {
        let x = bar.left() + k as f32 * band_width;
        painter.line_segment(
            [egui::pos2(x, bar.bottom()), egui::pos2(x, bar.bottom() + 3.0)],
            Stroke::new(1.0, TEXT_COLOR),
        );
        painter.text(
            egui::pos2(x, bar.bottom() + 4.0),
            Align2::CENTER_TOP,
            format_level(*level, step),
            FontId::proportional(10.0),
            TEXT_COLOR,
        );
    }

    painter.text(
        egui::pos2(bar.right(), bar.bottom() + 16.0),
        Align2::RIGHT_TOP,
        units,
        FontId::proportional(10.0),
        TEXT_COLOR,
    );
}

/// Labels every n-th tick so roughly 40 points separate labels.
fn tick_stride(count: usize, width: f32) -> usize {
    let fit = (width / 40.0).floor().max(1.0) as usize;
    count.div_ceil(fit).max(1)
}

/// Formats a contour level with as many decimals as the step needs.
pub fn format_level(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10()).ceil().clamp(0.0, 6.0) as usize
    } else {
        0
    };
    let decimals = if step > 0.0 && (step * 10f64.powi(decimals as i32)).fract().abs() > 1e-6 {
        decimals + 1
    } else {
        decimals
    };
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(275.0, 5.0), "275");
        assert_eq!(format_level(0.4, 0.2), "0.4");
        assert_eq!(format_level(0.25, 0.25), "0.25");
        assert_eq!(format_level(-2.5, 2.5), "-2.5");
        assert_eq!(format_level(0.0015, 0.0005), "0.0015");
    }

    #[test]
    fn test_tick_stride() {
        assert_eq!(tick_stride(8, 400.0), 1);
        assert_eq!(tick_stride(8, 120.0), 3);
        assert_eq!(tick_stride(3, 0.0), 3);
    }
}
