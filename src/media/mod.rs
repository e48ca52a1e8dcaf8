//! Photo evidence storage for shop visits.

mod dir_store;

pub use dir_store::DirPhotoStore;

use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Raw photo payload as received from the field device.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a photo from disk. An unreadable file is a validation problem of
    /// the request, not a storage failure.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::Validation(format!("Cannot read photo {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self { file_name, bytes })
    }

    /// Lower-cased extension of the original file name, `jpg` when absent.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "jpg".to_string())
    }
}

/// External storage that turns a photo into a resolvable URL.
pub trait PhotoStore {
    fn upload(&self, agent_id: i64, photo: &PhotoUpload) -> AppResult<String>;
}
