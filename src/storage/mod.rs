//! Storage Layer
//!
//! Platform file access used by the rest of the editor:
//! - `local`: filesystem reads/writes relative to a base directory
//! - `async_ops`: fire-and-poll background reads for the frame loop
//! - `dialog`: native file/folder pickers (rfd)
//! - `download`: the "offer as a file" fallback when in-place writes fail
//! - `browser`: file import through the page's JS (wasm32)
//!
//! Works with macroquad's single-threaded model: nothing here blocks the
//! frame except modal dialogs, which block by nature.

pub mod async_ops;
pub mod browser;
pub mod dialog;
pub mod download;
pub mod local;

pub use async_ops::{load_async, AsyncOp, PendingLoad};
pub use download::DownloadSink;
pub use local::LocalStorage;

/// Storage error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The user closed a picker without choosing anything
    #[error("selection cancelled")]
    SelectionCancelled,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("I/O error: {0}")]
    Io(String),
    /// No way to write the original file in place on this platform/document
    #[error("in-place write not available")]
    WriteCapabilityUnavailable,
    #[error("file is not valid UTF-8: {0}")]
    Encoding(String),
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    /// Errors that are status-line notes rather than failures
    pub fn is_quiet(&self) -> bool {
        matches!(self, StorageError::SelectionCancelled | StorageError::WriteCapabilityUnavailable)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::Io(e.to_string()),
        }
    }
}

/// Decode file bytes as UTF-8 text
pub fn into_text(bytes: Vec<u8>) -> Result<String, StorageError> {
    String::from_utf8(bytes).map_err(|e| StorageError::Encoding(e.to_string()))
}
