//! Filled-contour levels for continuous fields.
//!
//! Levels are chosen like matplotlib's `MaxNLocator`: at most `bins`
//! intervals whose step is 1, 2, 2.5 or 5 times a power of ten, with the
//! outer levels enclosing the data range.

use super::palette::Colormap;
use eframe::egui::Color32;

/// Acceptable step multipliers within one decade.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Computes nice contour levels enclosing `[min, max]`.
///
/// Always returns at least two levels.
pub fn nice_levels(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    if !lo.is_finite() || !hi.is_finite() {
        return vec![0.0, 1.0];
    }
    if hi - lo < f64::EPSILON * hi.abs().max(1.0) {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        lo -= pad;
        hi += pad;
    }

    let raw_step = (hi - lo) / bins as f64;
    let mut scale = 10f64.powf(raw_step.log10().floor());

    // Walk up the step ladder until the enclosing range fits in `bins` intervals
    loop {
        for multiplier in NICE_STEPS {
            let step = multiplier * scale;
            if step < raw_step * (1.0 - 1e-9) {
                continue;
            }
            let start = (lo / step + 1e-9).floor() * step;
            let end = (hi / step - 1e-9).ceil() * step;
            let intervals = ((end - start) / step).round() as usize;
            if intervals <= bins {
                return (0..=intervals.max(1))
                    .map(|k| clean(start + k as f64 * step, step))
                    .collect();
            }
        }
        scale *= 10.0;
    }
}

/// Rounds away float noise relative to the step size.
fn clean(value: f64, step: f64) -> f64 {
    let digits = (-step.log10().floor() + 3.0).clamp(0.0, 15.0) as i32;
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Contour levels paired with band colors from a colormap.
#[derive(Debug, Clone)]
pub struct ContourScale {
    levels: Vec<f64>,
    colors: Vec<Color32>,
}

impl ContourScale {
    /// Builds a scale covering the finite value range of a field.
    pub fn new(min: f64, max: f64, bins: usize, colormap: &Colormap) -> Self {
        let levels = nice_levels(min, max, bins);
        let bands = levels.len() - 1;
        let colors = (0..bands)
            .map(|k| colormap.sample((k as f64 + 0.5) / bands as f64))
            .collect();
        Self { levels, colors }
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// One color per band between consecutive levels.
    pub fn band_colors(&self) -> &[Color32] {
        &self.colors
    }

    /// Index of the band containing `value`, clamped to the outer bands.
    pub fn band_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() || self.colors.is_empty() {
            return None;
        }
        let above = self.levels.partition_point(|&level| level <= value);
        Some(above.saturating_sub(1).min(self.colors.len() - 1))
    }

    /// Fill color for a grid value; NaN is transparent.
    pub fn color(&self, value: f32) -> Color32 {
        self.band_index(value as f64)
            .map(|i| self.colors[i])
            .unwrap_or(Color32::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_range() {
        let levels = nice_levels(271.3, 303.8, 7);
        assert_eq!(levels, vec![270.0, 275.0, 280.0, 285.0, 290.0, 295.0, 300.0, 305.0]);
    }

    #[test]
    fn test_default_bins_allow_eight_intervals() {
        let bins = crate::state::ViewerSettings::default().contour_bins;
        let levels = nice_levels(0.0, 7.5, bins);
        assert_eq!(levels, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_unit_range() {
        let levels = nice_levels(0.0, 1.0, 7);
        assert_eq!(levels.first(), Some(&0.0));
        assert_eq!(levels.last(), Some(&1.0));
        assert!(levels.len() - 1 <= 7);
    }

    #[test]
    fn test_levels_enclose_range_within_bin_limit() {
        for (min, max) in [(-3.2, 17.9), (0.001, 0.0042), (1000.0, 1032.0), (-50.0, -49.0)] {
            for bins in [3, 7, 10] {
                let levels = nice_levels(min, max, bins);
                assert!(levels[0] <= min, "{:?}", levels);
                assert!(*levels.last().unwrap() >= max, "{:?}", levels);
                assert!(levels.len() - 1 <= bins, "{:?} bins {}", levels, bins);
                assert!(levels.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_constant_field_gets_a_band() {
        let levels = nice_levels(5.0, 5.0, 7);
        assert!(levels.len() >= 2);
        assert!(levels[0] <= 5.0 && *levels.last().unwrap() >= 5.0);
    }

    #[test]
    fn test_band_lookup() {
        let scale = ContourScale::new(0.0, 10.0, 5, &Colormap::coolwarm());
        assert_eq!(scale.levels(), [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(scale.band_index(0.0), Some(0));
        assert_eq!(scale.band_index(3.9), Some(1));
        assert_eq!(scale.band_index(10.0), Some(4));
        assert_eq!(scale.band_index(-5.0), Some(0));
        assert_eq!(scale.band_index(f64::NAN), None);
        assert_eq!(scale.color(f32::NAN), Color32::TRANSPARENT);
    }

    #[test]
    fn test_band_colors_run_cold_to_warm() {
        let scale = ContourScale::new(0.0, 10.0, 5, &Colormap::coolwarm());
        let colors = scale.band_colors();
        assert_eq!(colors.len(), 5);
        assert!(colors[0].b() > colors[0].r());
        assert!(colors[4].r() > colors[4].b());
    }
}
