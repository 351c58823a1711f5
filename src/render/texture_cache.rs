//! Texture cache for rasterized field imagery.
//!
//! Each record is rasterized once per contour setting and kept as an egui
//! texture until a new file is loaded.

use super::field::{render_field_image, FieldStyle};
use crate::grib::FieldRecord;
use eframe::egui::{self, TextureHandle};
use std::collections::HashMap;

/// Cache key for identifying a rendered field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FieldCacheKey {
    /// Index of the record in the loaded catalog
    pub record_index: usize,
    /// Contour bin count the texture was rendered with
    pub bins: usize,
}

/// A rendered field texture with the style used to color it.
pub struct CachedField {
    pub texture: TextureHandle,
    pub style: FieldStyle,
}

/// Texture cache for field imagery.
#[derive(Default)]
pub struct FieldTextureCache {
    entries: HashMap<FieldCacheKey, CachedField>,
}

impl FieldTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached texture for a record, rendering it on first use.
    pub fn get_or_render<R: FieldRecord + ?Sized>(
        &mut self,
        ctx: &egui::Context,
        key: FieldCacheKey,
        record: &R,
    ) -> &CachedField {
        self.entries.entry(key).or_insert_with(|| {
            let start = web_time::Instant::now();
            let style = FieldStyle::for_record(record, key.bins);
            let image = render_field_image(record.grid(), &style);

            log::debug!(
                "Rendered field texture {}x{} for record {} in {:.1}ms",
                image.width(),
                image.height(),
                key.record_index,
                start.elapsed().as_secs_f64() * 1000.0
            );

            let texture = ctx.load_texture(
                format!("field_{}_{}", key.record_index, key.bins),
                image,
                style.texture_options(),
            );

            CachedField { texture, style }
        })
    }

    /// Drops all textures, forcing a re-render on next use.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Invalidating {} field texture(s)", self.entries.len());
        }
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grib::labels::tests::record;

    #[test]
    fn test_cache_renders_once_per_key() {
        let ctx = egui::Context::default();
        let rec = record("Temperature", "1:Temperature:K", 0);
        let mut cache = FieldTextureCache::new();

        let key = FieldCacheKey { record_index: 0, bins: 8 };
        let first = cache.get_or_render(&ctx, key, &rec).texture.id();
        let second = cache.get_or_render(&ctx, key, &rec).texture.id();
        assert_eq!(first, second);

        let other = FieldCacheKey { record_index: 0, bins: 10 };
        assert_ne!(cache.get_or_render(&ctx, other, &rec).texture.id(), first);

        cache.invalidate();
        assert_ne!(cache.get_or_render(&ctx, key, &rec).texture.id(), first);
    }
}
