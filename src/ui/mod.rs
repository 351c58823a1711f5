//! UI modules for the GPV Workbench application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title and status
//! - Left panel: File upload, time and variable selection, overlays
//! - Central canvas: Two-column grid of map panels

mod canvas;
mod colors;
mod left_panel;
mod panel;
mod top_bar;

pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use top_bar::render_top_bar;
