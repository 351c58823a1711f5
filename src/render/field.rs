//! Rasterizes a decoded field into a north-up RGBA image.

use super::contour::ContourScale;
use super::palette::{weather_code_color, Colormap};
use crate::grib::{is_weather_code, FieldRecord, GridField};
use eframe::egui::{Color32, ColorImage, TextureFilter, TextureOptions};

/// How a record's values are colored.
#[derive(Debug, Clone)]
pub enum FieldStyle {
    /// Five-category discrete palette
    WeatherCode,
    /// Filled contours with a diverging colormap
    Contour { scale: ContourScale, units: String },
}

impl FieldStyle {
    /// Picks the style for a record: weather codes get the discrete palette.
    pub fn for_record<R: FieldRecord + ?Sized>(record: &R, bins: usize) -> Self {
        if is_weather_code(record) {
            return FieldStyle::WeatherCode;
        }

        let (min, max) = record.grid().value_range().unwrap_or((0.0, 1.0));
        FieldStyle::Contour {
            scale: ContourScale::new(min as f64, max as f64, bins, &Colormap::coolwarm()),
            units: record.units().to_string(),
        }
    }

    /// Texture sampling for the rendered image. Weather codes always sample
    /// the nearest texel.
    pub fn texture_options(&self) -> TextureOptions {
        let minification = match self {
            FieldStyle::WeatherCode => TextureFilter::Nearest,
            FieldStyle::Contour { .. } => TextureFilter::Linear,
        };
        TextureOptions {
            magnification: TextureFilter::Nearest,
            minification,
            ..Default::default()
        }
    }

    pub fn color(&self, value: f32) -> Color32 {
        match self {
            FieldStyle::WeatherCode => weather_code_color(value),
            FieldStyle::Contour { scale, .. } => scale.color(value),
        }
    }
}

/// Renders the grid with row 0 at the north edge and column 0 at the west edge.
pub fn render_field_image(grid: &GridField, style: &FieldStyle) -> ColorImage {
    let (width, height) = (grid.ni, grid.nj);
    let flip_rows = !grid.rows_north_to_south();
    let flip_cols = !columns_west_to_east(grid);

    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let j = if flip_rows { height - 1 - y } else { y };
        for x in 0..width {
            let i = if flip_cols { width - 1 - x } else { x };
            let value = grid.value(i, j).unwrap_or(f32::NAN);
            pixels.extend_from_slice(&style.color(value).to_srgba_unmultiplied());
        }
    }

    ColorImage::from_rgba_unmultiplied([width, height], &pixels)
}

fn columns_west_to_east(grid: &GridField) -> bool {
    if grid.ni < 2 {
        return true;
    }
    grid.lons[0] <= grid.lons[grid.ni - 1]
}
