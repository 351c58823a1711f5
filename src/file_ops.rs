//! GRIB2 file picking for native and web builds.
//!
//! The rfd dialog is async while egui's update loop is not, so picked files
//! come back over an mpsc channel and the UI polls it once per frame.

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Extensions offered by the dialog filter.
pub const GRIB_EXTENSIONS: [&str; 4] = ["grib2", "grb2", "grib", "bin"];

/// Bytes of a picked GRIB2 file.
#[derive(Clone)]
pub struct FilePickResult {
    pub file_name: String,
    pub file_size: u64,
    pub file_data: Vec<u8>,
}

impl FilePickResult {
    /// Whether the file name carries one of [`GRIB_EXTENSIONS`].
    pub fn has_grib_extension(&self) -> bool {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                GRIB_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

/// Sender/receiver pair carrying dialog results back to the UI thread.
///
/// `None` on the channel means the dialog was cancelled.
pub struct FilePickerChannel {
    sender: Sender<Option<FilePickResult>>,
    receiver: Receiver<Option<FilePickResult>>,
}

impl Default for FilePickerChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePickerChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Opens the dialog in the background and repaints when it closes.
    ///
    /// Native builds block a spawned thread on the dialog with pollster.
    /// Web builds run it on the browser's event loop.
    pub fn pick_file(&self, ctx: egui::Context) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(async_pick_file());
                if sender.send(result).is_err() {
                    log::warn!("File picker result dropped: receiver closed");
                }
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = async_pick_file().await;
                if sender.send(result).is_err() {
                    log::warn!("File picker result dropped: receiver closed");
                }
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking poll.
    ///
    /// `Some(Some(file))` when a file was picked, `Some(None)` when the dialog
    /// was cancelled, `None` while it is still open.
    pub fn try_recv(&self) -> Option<Option<FilePickResult>> {
        self.receiver.try_recv().ok()
    }
}

/// Opens the dialog and reads the whole file into memory.
async fn async_pick_file() -> Option<FilePickResult> {
    let file = rfd::AsyncFileDialog::new()
        .set_title("Select GRIB2 File")
        .add_filter("GRIB2", &GRIB_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
        .await?;

    let file_name = file.file_name();
    let file_data = file.read().await;
    let file_size = file_data.len() as u64;

    Some(FilePickResult {
        file_name,
        file_size,
        file_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(name: &str) -> FilePickResult {
        FilePickResult {
            file_name: name.to_string(),
            file_size: 0,
            file_data: Vec::new(),
        }
    }

    #[test]
    fn test_grib_extensions() {
        assert!(picked("Z__C_RJTD_20240701000000_MSM_GPV_Rjp_Lsurf_FH00-15_grib2.bin").has_grib_extension());
        assert!(picked("gfs.t00z.pgrb2.GRIB2").has_grib_extension());
        assert!(!picked("coast.shp").has_grib_extension());
        assert!(!picked("README").has_grib_extension());
    }

    #[test]
    fn test_channel_reports_nothing_until_picked() {
        let channel = FilePickerChannel::new();
        assert!(channel.try_recv().is_none());
        channel.sender.send(None).unwrap();
        assert!(matches!(channel.try_recv(), Some(None)));
    }
}
