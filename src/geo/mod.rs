//! Geographic overlays for map panels.
//!
//! Coastlines and borders are loaded from shapefiles or GeoJSON and drawn
//! with a Plate Carree projection fitted to each panel.

mod layer;
mod projection;
mod renderer;

pub use layer::{GeoLayer, GeoLayerSet, GeoLayerType};
pub use projection::{image_extent, MapProjection};
pub use renderer::render_geo_layers;
