//! Download fallback
//!
//! When a document can't be written in place, its new text is offered as a
//! separate file named `<stem>_updated.<ext>`. Native builds ask where to
//! save it; the browser build hands the bytes to the page's JS.

use super::StorageError;

/// Something that can take the full text of a document as a new file
pub trait DownloadSink {
    /// Returns a short description of where the file went
    fn offer(&mut self, file_name: &str, text: &str) -> Result<String, StorageError>;
}

/// `game.html` -> `game_updated.html`, `notes` -> `notes_updated`
pub fn updated_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_updated{}", &name[..dot], &name[dot..]),
        _ => format!("{}_updated", name),
    }
}

/// Save dialog prefilled with the suggested name
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SaveDialogDownload {
    pub start_dir: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl DownloadSink for SaveDialogDownload {
    fn offer(&mut self, file_name: &str, text: &str) -> Result<String, StorageError> {
        let path = super::dialog::pick_save_path(file_name, self.start_dir.as_deref())?;
        super::LocalStorage::with_base_dir("").write(&path, text.as_bytes())?;
        Ok(path.display().to_string())
    }
}

/// Browser download through the page's JS bundle
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl DownloadSink for BrowserDownload {
    fn offer(&mut self, file_name: &str, text: &str) -> Result<String, StorageError> {
        extern "C" {
            fn rf_set_export_data(ptr: *const u8, len: usize);
            fn rf_set_export_filename(ptr: *const u8, len: usize);
            fn rf_trigger_download();
        }
        unsafe {
            rf_set_export_data(text.as_ptr(), text.len());
            rf_set_export_filename(file_name.as_ptr(), file_name.len());
            rf_trigger_download();
        }
        Ok(format!("downloaded {}", file_name))
    }
}

/// Platform default sink
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_sink(start_dir: Option<std::path::PathBuf>) -> Box<dyn DownloadSink> {
    Box::new(SaveDialogDownload { start_dir })
}

#[cfg(target_arch = "wasm32")]
pub fn platform_sink(_start_dir: Option<std::path::PathBuf>) -> Box<dyn DownloadSink> {
    Box::new(BrowserDownload)
}

/// Keeps offered files in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryDownload {
    pub files: Vec<(String, String)>,
    pub cancel: bool,
}

#[cfg(test)]
impl DownloadSink for MemoryDownload {
    fn offer(&mut self, file_name: &str, text: &str) -> Result<String, StorageError> {
        if self.cancel {
            return Err(StorageError::SelectionCancelled);
        }
        self.files.push((file_name.to_string(), text.to_string()));
        Ok(format!("memory:{}", file_name))
    }
}
