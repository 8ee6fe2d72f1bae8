//! Local filesystem storage backend
//!
//! All operations complete immediately (synchronous).

use super::StorageError;
use std::path::{Path, PathBuf};

/// Local filesystem storage backend rooted at a base directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths (usually current working directory)
    base_dir: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    /// Create a new local storage backend rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    /// Create a local storage backend with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a path relative to the base directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Filenames (not full paths) of regular files in a directory, sorted
    pub fn list(&self, path: impl AsRef<Path>) -> Result<Vec<String>, StorageError> {
        let mut files: Vec<String> = std::fs::read_dir(self.resolve(path))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    pub fn read_string(&self, path: impl AsRef<Path>) -> Result<String, StorageError> {
        super::into_text(self.read(path)?)
    }

    /// Create or overwrite a file, creating parent directories
    pub fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, data)?;
        Ok(())
    }

    /// Replace a file in one step: write a sibling temp file, then rename it
    /// over the target. Readers see either the old or the new contents.
    ///
    /// A symlinked path replaces the file the link points at, and an existing
    /// file keeps its permissions.
    pub fn write_atomic(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        let target = std::fs::canonicalize(&full_path).unwrap_or(full_path);
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| StorageError::Other(format!("not a file path: {}", target.display())))?;
        let tmp_path = target.with_file_name(format!(".{}.tmp", file_name));

        std::fs::write(&tmp_path, data)?;
        if let Ok(meta) = std::fs::metadata(&target) {
            if let Err(e) = std::fs::set_permissions(&tmp_path, meta.permissions()) {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(e.into());
            }
        }
        if let Err(e) = std::fs::rename(&tmp_path, &target) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (_dir, storage) = setup_test_dir();

        storage.write("test.txt", b"hello world").unwrap();
        assert_eq!(storage.read("test.txt").unwrap(), b"hello world");
        assert_eq!(storage.read_string("test.txt").unwrap(), "hello world");
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        let result = storage.read("nonexistent.txt");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list() {
        let (dir, storage) = setup_test_dir();

        std::fs::write(dir.path().join("b.ron"), "b").unwrap();
        std::fs::write(dir.path().join("a.ron"), "a").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        assert_eq!(storage.list(".").unwrap(), vec!["a.ron", "b.ron"]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let (_dir, storage) = setup_test_dir();

        storage.write("deep/nested/dir/file.txt", b"data").unwrap();
        assert_eq!(storage.read("deep/nested/dir/file.txt").unwrap(), b"data");
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("game.html"), "old").unwrap();

        storage.write_atomic("game.html", b"new").unwrap();

        assert_eq!(storage.read_string("game.html").unwrap(), "new");
        assert_eq!(storage.list(".").unwrap(), vec!["game.html"]);
    }

    #[test]
    fn test_write_atomic_missing_dir_fails_without_side_effects() {
        let (dir, storage) = setup_test_dir();
        let result = storage.write_atomic("missing/game.html", b"new");
        assert!(result.is_err());
        assert!(!dir.path().join("missing").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, storage) = setup_test_dir();
        let path = dir.path().join("game.html");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        storage.write_atomic("game.html", b"new").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_through_symlink() {
        let (dir, storage) = setup_test_dir();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        let real = dir.path().join("site").join("game.html");
        std::fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("link.html")).unwrap();

        storage.write_atomic("link.html", b"new").unwrap();

        let link = std::fs::symlink_metadata(dir.path().join("link.html")).unwrap();
        assert!(link.file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "new");
        assert_eq!(storage.read_string("link.html").unwrap(), "new");
    }
}
