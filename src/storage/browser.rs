//! Browser file import
//!
//! The page's JS owns the `<input type="file">`. `request_import` opens it;
//! once the user picks a file the JS keeps the bytes until `take_import`
//! copies them out on a later frame.

use super::StorageError;

/// Maximum import file size (10 MB) to prevent memory exhaustion
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;
/// Maximum filename length
pub const MAX_FILENAME_LEN: usize = 256;

/// A file handed over by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    pub name: String,
    pub text: String,
}

/// Check sizes before allocating anything
pub fn check_import_sizes(data_len: usize, filename_len: usize) -> Result<(), StorageError> {
    if data_len > MAX_IMPORT_SIZE {
        return Err(StorageError::Other("file too large (max 10MB)".into()));
    }
    if filename_len > MAX_FILENAME_LEN {
        return Err(StorageError::Other("filename too long".into()));
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
extern "C" {
    fn rf_import_file();
    fn rf_check_import() -> i32;
    fn rf_get_import_data_len() -> usize;
    fn rf_get_import_filename_len() -> usize;
    fn rf_copy_import_data(ptr: *mut u8, max_len: usize) -> usize;
    fn rf_copy_import_filename(ptr: *mut u8, max_len: usize) -> usize;
    fn rf_clear_import();
}

/// Open the page's file picker
#[cfg(target_arch = "wasm32")]
pub fn request_import() {
    unsafe { rf_import_file() }
}

/// The picked file, once the page has one. Call every frame.
#[cfg(target_arch = "wasm32")]
pub fn take_import() -> Option<Result<ImportedFile, StorageError>> {
    if unsafe { rf_check_import() } == 0 {
        return None;
    }

    let data_len = unsafe { rf_get_import_data_len() };
    let filename_len = unsafe { rf_get_import_filename_len() };
    if let Err(e) = check_import_sizes(data_len, filename_len) {
        unsafe { rf_clear_import() };
        return Some(Err(e));
    }

    let mut data_buf = vec![0u8; data_len];
    let mut filename_buf = vec![0u8; filename_len];
    unsafe {
        rf_copy_import_data(data_buf.as_mut_ptr(), data_len);
        rf_copy_import_filename(filename_buf.as_mut_ptr(), filename_len);
        rf_clear_import();
    }

    let name = String::from_utf8_lossy(&filename_buf).to_string();
    Some(super::into_text(data_buf).map(|text| ImportedFile { name, text }))
}
