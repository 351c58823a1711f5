//! Field rendering: palettes, contour levels, rasterization and legends.

mod contour;
mod field;
mod legend;
mod palette;
mod texture_cache;

pub use legend::show_legend;
pub use palette::WeatherCode;
pub use texture_cache::{FieldCacheKey, FieldTextureCache};
