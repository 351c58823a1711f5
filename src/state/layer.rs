//! Map overlay visibility.

/// Visibility settings for geographic map layers.
#[derive(Clone)]
pub struct LayerState {
    /// Show coastlines
    pub coastline: bool,
    /// Show country borders
    pub borders: bool,
    /// Show the lat/lon/value readout when hovering a panel
    pub hover_readout: bool,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            coastline: true,
            borders: false,
            hover_readout: true,
        }
    }
}
