//! Upload state.

/// State for the file picker and the last picked file.
#[derive(Default)]
pub struct UploadState {
    /// Name of the selected file, if any
    pub file_name: Option<String>,

    /// Size of the selected file in bytes
    pub file_size: Option<u64>,

    /// Whether a file pick operation is in progress
    pub loading: bool,

    /// Decode failure for the last picked file
    pub error: Option<String>,
}

impl UploadState {
    /// Records a newly picked file, clearing any previous error.
    pub fn set_file(&mut self, file_name: String, file_size: u64) {
        self.file_name = Some(file_name);
        self.file_size = Some(file_size);
        self.error = None;
    }
}
