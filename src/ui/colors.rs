//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for field labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Warnings such as selected variables missing from the file.
    pub const WARNING: Color32 = Color32::from_rgb(255, 180, 50);
}

/// Colors for the decode-failure banner.
pub mod banner {
    use super::Color32;

    pub const ERROR_FILL: Color32 = Color32::from_rgb(80, 24, 24);
    pub const ERROR_STROKE: Color32 = Color32::from_rgb(200, 70, 70);
    pub const ERROR_TEXT: Color32 = Color32::from_rgb(255, 200, 200);
}

/// Colors for map panels.
pub mod panel {
    use super::Color32;

    /// Map background behind transparent (missing) cells.
    pub const BACKGROUND: Color32 = Color32::from_rgb(245, 245, 240);
    /// Panel frame.
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 80);
    /// Panel title text.
    pub const TITLE: Color32 = Color32::from_rgb(230, 230, 240);

    /// Hover readout background - requires alpha, use function.
    pub fn readout_fill() -> Color32 {
        Color32::from_rgba_unmultiplied(20, 20, 35, 210)
    }

    /// Hover readout text.
    pub const READOUT_TEXT: Color32 = Color32::from_rgb(220, 220, 240);
}
