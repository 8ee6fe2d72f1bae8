//! Host Document Store
//!
//! The full text of the opened host document plus, when the platform allows
//! it, a handle that writes the original file in place.

use log::info;
use std::path::{Path, PathBuf};

use crate::storage::{LocalStorage, StorageError};

/// Capability to replace the original document's contents
pub trait WriteHandle {
    /// Replace the whole document. Either all of `text` lands or nothing does.
    fn write_all(&mut self, text: &str) -> Result<(), StorageError>;

    /// Where the write goes, for status messages
    fn describe(&self) -> String;
}

/// Writes back to a file on disk
#[derive(Debug, Clone)]
pub struct FileWriteHandle {
    path: PathBuf,
}

impl FileWriteHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WriteHandle for FileWriteHandle {
    fn write_all(&mut self, text: &str) -> Result<(), StorageError> {
        LocalStorage::with_base_dir("").write_atomic(&self.path, text.as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct HostDocument {
    name: String,
    text: String,
    handle: Option<Box<dyn WriteHandle>>,
}

impl HostDocument {
    /// A document with no write-back capability (downloads only)
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            handle: None,
        }
    }

    pub fn with_handle(mut self, handle: Box<dyn WriteHandle>) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Read a file and keep a handle for writing it back
    pub fn open_file(path: &Path) -> Result<Self, StorageError> {
        let text = LocalStorage::with_base_dir("").read_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.html".to_string());
        info!("Opened {} ({} bytes)", path.display(), text.len());
        Ok(Self::from_text(name, text).with_handle(Box::new(FileWriteHandle::new(path))))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn can_write_in_place(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn handle_mut(&mut self) -> Option<&mut (dyn WriteHandle + 'static)> {
        self.handle.as_deref_mut()
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

impl std::fmt::Debug for HostDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostDocument")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .field("writable", &self.handle.is_some())
            .finish()
    }
}
