//! Geographic overlay layers loaded from shapefiles or GeoJSON.
//!
//! Coastline and border outlines derived from Natural Earth 1:110m are built
//! in. A configured `.shp` or `.geojson` path replaces the built-in layer.

use eframe::egui::Color32;
use geo_types::Coord;
use geojson::{GeoJson, Geometry, Value};
use std::io::Cursor;
use thiserror::Error;

// Embed overlay data at compile time
static COASTLINE_GEOJSON: &str = include_str!("../../assets/coastline_110m.geojson");
static BORDERS_GEOJSON: &str = include_str!("../../assets/borders_110m.geojson");

/// Errors raised while loading an overlay layer.
#[derive(Debug, Error)]
pub enum GeoLayerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read shapefile: {0}")]
    Shapefile(String),

    #[error("failed to parse GeoJSON: {0}")]
    GeoJson(String),

    #[error("unsupported overlay format: {0} (expected .shp, .json or .geojson)")]
    UnsupportedFormat(String),

    #[error("overlay files cannot be read from the browser: {0}")]
    Unavailable(String),
}

/// Type of geographic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayerType {
    Coastline,
    Borders,
}

impl GeoLayerType {
    pub fn name(&self) -> &'static str {
        match self {
            GeoLayerType::Coastline => "coastline",
            GeoLayerType::Borders => "borders",
        }
    }

    /// Returns the default color for this layer type.
    pub fn default_color(&self) -> Color32 {
        match self {
            GeoLayerType::Coastline => Color32::from_rgb(30, 30, 30),
            GeoLayerType::Borders => Color32::from_rgb(90, 90, 110),
        }
    }

    /// Returns the default line width for this layer type.
    pub fn default_line_width(&self) -> f32 {
        match self {
            GeoLayerType::Coastline => 1.0,
            GeoLayerType::Borders => 0.6,
        }
    }
}

/// A polyline with its bounding box in degrees.
#[derive(Debug, Clone)]
pub struct GeoPath {
    pub coords: Vec<Coord<f64>>,
    /// (min_lon, min_lat, max_lon, max_lat)
    pub bbox: (f64, f64, f64, f64),
}

impl GeoPath {
    /// Builds a path, dropping degenerate ones with fewer than two points.
    pub fn new(coords: Vec<Coord<f64>>) -> Option<Self> {
        if coords.len() < 2 {
            return None;
        }
        let bbox = coords.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), c| {
                (min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
            },
        );
        Some(Self { coords, bbox })
    }
}

/// A geographic layer: lines and polygon outlines as paths.
#[derive(Debug, Clone)]
pub struct GeoLayer {
    /// Type of this layer
    pub layer_type: GeoLayerType,
    pub paths: Vec<GeoPath>,
}

impl GeoLayer {
    /// Creates a new empty layer of the specified type.
    pub fn new(layer_type: GeoLayerType) -> Self {
        Self {
            layer_type,
            paths: Vec::new(),
        }
    }

    fn push_ring<'a>(&mut self, points: impl Iterator<Item = &'a shapefile::Point>) {
        let coords = points.map(|p| Coord { x: p.x, y: p.y }).collect();
        self.paths.extend(GeoPath::new(coords));
    }

    fn push_positions(&mut self, positions: &[Vec<f64>]) {
        let coords = positions
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| Coord { x: c[0], y: c[1] })
            .collect();
        self.paths.extend(GeoPath::new(coords));
    }

    /// Loads line and polygon outlines from `.shp` bytes.
    pub fn load_from_shapefile(&mut self, shp_bytes: &[u8]) -> Result<(), GeoLayerError> {
        let mut shape_reader = shapefile::ShapeReader::new(Cursor::new(shp_bytes))
            .map_err(|e| GeoLayerError::Shapefile(e.to_string()))?;

        for result in shape_reader.iter_shapes() {
            let shape = result.map_err(|e| GeoLayerError::Shapefile(e.to_string()))?;
            match shape {
                shapefile::Shape::Polyline(line) => {
                    for part in line.parts() {
                        self.push_ring(part.iter());
                    }
                }
                shapefile::Shape::Polygon(poly) => {
                    // Holes are outlines too
                    for ring in poly.rings() {
                        self.push_ring(ring.points().iter());
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Loads line and polygon outlines from GeoJSON text.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), GeoLayerError> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e: geojson::Error| GeoLayerError::GeoJson(e.to_string()))?;

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in fc.features {
                    if let Some(geometry) = &feature.geometry {
                        self.push_geometry(geometry);
                    }
                }
            }
            GeoJson::Feature(f) => {
                if let Some(geometry) = &f.geometry {
                    self.push_geometry(geometry);
                }
            }
            GeoJson::Geometry(g) => self.push_geometry(&g),
        }

        Ok(())
    }

    fn push_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::LineString(line) => self.push_positions(line),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                for line in lines {
                    self.push_positions(line);
                }
            }
            Value::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.push_positions(ring);
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.push_geometry(g);
                }
            }
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    /// The built-in outline for this layer type.
    pub fn embedded(layer_type: GeoLayerType) -> Result<Self, GeoLayerError> {
        let mut layer = Self::new(layer_type);
        layer.load_from_geojson(match layer_type {
            GeoLayerType::Coastline => COASTLINE_GEOJSON,
            GeoLayerType::Borders => BORDERS_GEOJSON,
        })?;
        Ok(layer)
    }

    /// Loads a layer from a file path, choosing the format by extension.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(layer_type: GeoLayerType, path: &str) -> Result<Self, GeoLayerError> {
        let mut layer = Self::new(layer_type);
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let read_err = |source| GeoLayerError::Io {
            path: path.to_string(),
            source,
        };

        match extension.as_str() {
            "shp" => layer.load_from_shapefile(&std::fs::read(path).map_err(read_err)?)?,
            "json" | "geojson" => {
                layer.load_from_geojson(&std::fs::read_to_string(path).map_err(read_err)?)?
            }
            _ => return Err(GeoLayerError::UnsupportedFormat(path.to_string())),
        }

        Ok(layer)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load_from_path(_layer_type: GeoLayerType, path: &str) -> Result<Self, GeoLayerError> {
        Err(GeoLayerError::Unavailable(path.to_string()))
    }
}

/// The overlay layers available to map panels.
#[derive(Debug, Clone, Default)]
pub struct GeoLayerSet {
    pub coastline: Option<GeoLayer>,
    pub borders: Option<GeoLayer>,
}

impl GeoLayerSet {
    /// Creates a new empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads both layers, from the configured path when one is set and from
    /// the built-in outline otherwise. A path that fails to load is logged
    /// and replaced by the built-in outline.
    pub fn load(coastline_path: Option<&str>, borders_path: Option<&str>) -> Self {
        let mut set = Self::new();
        for (layer_type, path) in [
            (GeoLayerType::Coastline, coastline_path),
            (GeoLayerType::Borders, borders_path),
        ] {
            let path = path.filter(|p| !p.trim().is_empty());
            let loaded = match path {
                Some(path) => GeoLayer::load_from_path(layer_type, path).or_else(|e| {
                    log::warn!(
                        "Failed to load {} layer from {}, using built-in: {}",
                        layer_type.name(),
                        path,
                        e
                    );
                    GeoLayer::embedded(layer_type)
                }),
                None => GeoLayer::embedded(layer_type),
            };
            match loaded {
                Ok(layer) => {
                    log::info!(
                        "Loaded {} layer from {}: {} path(s)",
                        layer_type.name(),
                        path.unwrap_or("built-in data"),
                        layer.paths.len()
                    );
                    set.set_layer(layer);
                }
                Err(e) => log::error!("Failed to load {} layer: {}", layer_type.name(), e),
            }
        }
        set
    }

    pub fn get(&self, layer_type: GeoLayerType) -> Option<&GeoLayer> {
        match layer_type {
            GeoLayerType::Coastline => self.coastline.as_ref(),
            GeoLayerType::Borders => self.borders.as_ref(),
        }
    }

    pub fn set_layer(&mut self, layer: GeoLayer) {
        match layer.layer_type {
            GeoLayerType::Coastline => self.coastline = Some(layer),
            GeoLayerType::Borders => self.borders = Some(layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COAST: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "LineString", "coordinates": [[130.0, 31.0], [131.5, 33.0], [132.0, 34.0]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon", "coordinates": [[[139.0, 35.0], [140.0, 35.0], [140.0, 36.0], [139.0, 35.0]]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Point", "coordinates": [135.0, 35.0] } }
        ]
    }"#;

    #[test]
    fn test_geojson_lines_and_polygons() {
        let mut layer = GeoLayer::new(GeoLayerType::Coastline);
        layer.load_from_geojson(COAST).unwrap();
        assert_eq!(layer.paths.len(), 2);
        assert_eq!(layer.paths[0].bbox, (130.0, 31.0, 132.0, 34.0));
    }

    #[test]
    fn test_invalid_geojson() {
        let mut layer = GeoLayer::new(GeoLayerType::Coastline);
        let err = layer.load_from_geojson("{ not json").unwrap_err();
        assert!(matches!(err, GeoLayerError::GeoJson(_)));
    }

    #[test]
    fn test_degenerate_paths_are_dropped() {
        assert!(GeoPath::new(vec![Coord { x: 1.0, y: 2.0 }]).is_none());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = GeoLayer::load_from_path(GeoLayerType::Borders, "borders.kml").unwrap_err();
        assert!(matches!(err, GeoLayerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_builtin_layers_load_by_default() {
        let set = GeoLayerSet::load(None, None);
        let coastline = set.get(GeoLayerType::Coastline).unwrap();
        let borders = set.get(GeoLayerType::Borders).unwrap();
        assert!(coastline.paths.len() > 100);
        assert!(!borders.paths.is_empty());

        // Some outline passes over the Japanese main islands
        assert!(coastline.paths.iter().any(|p| {
            let (min_lon, min_lat, max_lon, max_lat) = p.bbox;
            min_lon <= 140.0 && max_lon >= 135.0 && min_lat <= 36.0 && max_lat >= 34.0
        }));
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let set = GeoLayerSet::load(Some("/nonexistent/coast.shp"), Some("  "));
        let builtin = GeoLayer::embedded(GeoLayerType::Coastline).unwrap();
        let coastline = set.get(GeoLayerType::Coastline).unwrap();
        assert_eq!(coastline.paths.len(), builtin.paths.len());
        assert!(set.get(GeoLayerType::Borders).is_some());
    }
}
