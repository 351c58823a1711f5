//! Plate Carree map projection fitted to a panel rectangle.
//!
//! Longitude and latitude map linearly to screen x and y with one scale
//! for both axes, so a degree is square on screen.

use crate::grib::{GeoBounds, GridField};
use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Geographic extent shown in `screen_rect`
    pub bounds: GeoBounds,
    /// Screen rectangle the extent is drawn into
    pub screen_rect: Rect,
    /// Screen points per degree
    scale: f64,
}

impl MapProjection {
    /// Fits `bounds` into `rect`, centered, preserving the aspect ratio.
    pub fn fit(bounds: GeoBounds, rect: Rect) -> Self {
        let lon_span = bounds.lon_span().max(1e-6);
        let lat_span = bounds.lat_span().max(1e-6);
        let scale = (rect.width() as f64 / lon_span).min(rect.height() as f64 / lat_span);

        let size = Vec2::new((lon_span * scale) as f32, (lat_span * scale) as f32);
        let screen_rect = Rect::from_center_size(rect.center(), size);

        Self {
            bounds,
            screen_rect,
            scale,
        }
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let x = (coord.x - self.bounds.min_lon) * self.scale;
        let y = (self.bounds.max_lat - coord.y) * self.scale;
        Pos2::new(
            self.screen_rect.left() + x as f32,
            self.screen_rect.top() + y as f32,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let dx = (pos.x - self.screen_rect.left()) as f64;
        let dy = (pos.y - self.screen_rect.top()) as f64;
        Coord {
            x: self.bounds.min_lon + dx / self.scale,
            y: self.bounds.max_lat - dy / self.scale,
        }
    }

    /// Checks if a bounding box intersects the projected extent.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        !(max_lon < self.bounds.min_lon
            || min_lon > self.bounds.max_lon
            || max_lat < self.bounds.min_lat
            || min_lat > self.bounds.max_lat)
    }

    /// Longitude shifts needed to draw -180..180 data over this extent.
    ///
    /// Grids on 0..360 longitudes need the western hemisphere shifted east.
    pub fn wrap_offsets(&self) -> Vec<f64> {
        let mut offsets = vec![0.0];
        if self.bounds.max_lon > 180.0 {
            offsets.push(360.0);
        }
        if self.bounds.min_lon < -180.0 {
            offsets.push(-360.0);
        }
        offsets
    }
}

/// Extent covered by a grid's pixels: point bounds widened by half a cell.
pub fn image_extent(grid: &GridField) -> Option<GeoBounds> {
    let b = grid.bounds()?;
    let half_dx = if grid.ni > 1 {
        b.lon_span() / (grid.ni - 1) as f64 / 2.0
    } else {
        0.5
    };
    let half_dy = if grid.nj > 1 {
        b.lat_span() / (grid.nj - 1) as f64 / 2.0
    } else {
        0.5
    };
    Some(GeoBounds {
        min_lon: b.min_lon - half_dx,
        min_lat: b.min_lat - half_dy,
        max_lon: b.max_lon + half_dx,
        max_lat: b.max_lat + half_dy,
    })
}
