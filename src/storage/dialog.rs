//! Native pickers
//!
//! Thin wrappers over rfd that turn "dialog closed" into
//! `StorageError::SelectionCancelled`. The browser build has no native
//! dialogs; callers show the error as a status note.

use super::StorageError;
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
pub fn pick_host_document(start_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open host document")
        .add_filter("HTML", &["html", "htm"])
        .add_filter("Text", &["txt"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().ok_or(StorageError::SelectionCancelled)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pick_characters_dir(start_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    let mut dialog = rfd::FileDialog::new().set_title("Choose characters folder");
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder().ok_or(StorageError::SelectionCancelled)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pick_save_path(file_name: &str, start_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save updated document")
        .set_file_name(file_name);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().ok_or(StorageError::SelectionCancelled)
}

#[cfg(target_arch = "wasm32")]
pub fn pick_host_document(_start_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    Err(StorageError::Other("Open is not available in the browser build".into()))
}

#[cfg(target_arch = "wasm32")]
pub fn pick_characters_dir(_start_dir: Option<&Path>) -> Result<PathBuf, StorageError> {
    Err(StorageError::Other("Folder selection is not available in the browser build".into()))
}
