//! Overlay rendering onto a map panel.

use super::{GeoLayer, GeoLayerSet, GeoLayerType, MapProjection};
use eframe::egui::{Painter, Pos2, Stroke};
use geo_types::Coord;

/// Renders the enabled overlay layers, clipped to the painter's rect.
pub fn render_geo_layers(
    painter: &Painter,
    layers: &GeoLayerSet,
    projection: &MapProjection,
    enabled: &[GeoLayerType],
) {
    let offsets = projection.wrap_offsets();
    for layer_type in enabled {
        if let Some(layer) = layers.get(*layer_type) {
            render_layer(painter, layer, projection, &offsets);
        }
    }
}

fn render_layer(painter: &Painter, layer: &GeoLayer, projection: &MapProjection, offsets: &[f64]) {
    let stroke = Stroke::new(
        layer.layer_type.default_line_width(),
        layer.layer_type.default_color(),
    );

    for path in &layer.paths {
        let (min_lon, min_lat, max_lon, max_lat) = path.bbox;
        for offset in offsets {
            if !projection.bbox_visible(min_lon + offset, min_lat, max_lon + offset, max_lat) {
                continue;
            }
            let points = screen_points(&path.coords, projection, *offset);
            if points.len() >= 2 {
                painter.line(points, stroke);
            }
        }
    }
}

/// Projects a path, dropping points closer than half a pixel to the previous one.
fn screen_points(coords: &[Coord<f64>], projection: &MapProjection, offset: f64) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = Vec::with_capacity(coords.len());
    for c in coords {
        let pos = projection.geo_to_screen(Coord {
            x: c.x + offset,
            y: c.y,
        });
        match points.last() {
            Some(last) if (pos - *last).length_sq() < 0.25 => {}
            _ => points.push(pos),
        }
    }
    points
}
