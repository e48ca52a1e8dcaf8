use super::{PhotoStore, PhotoUpload};
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Stores photos under `<root>/<agent_id>/<uuid>.<ext>` and hands back a
/// `file://` URL.
#[derive(Debug, Clone)]
pub struct DirPhotoStore {
    root: PathBuf,
}

impl DirPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PhotoStore for DirPhotoStore {
    fn upload(&self, agent_id: i64, photo: &PhotoUpload) -> AppResult<String> {
        let dir = self.root.join(agent_id.to_string());
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::Upload(format!("{}: {}", dir.display(), e)))?;

        let target = dir.join(format!("{}.{}", Uuid::new_v4(), photo.extension()));
        fs::write(&target, &photo.bytes)
            .map_err(|e| AppError::Upload(format!("{}: {}", target.display(), e)))?;

        let absolute = target.canonicalize().unwrap_or(target);
        debug!(path = %absolute.display(), bytes = photo.bytes.len(), "photo stored");
        Ok(format!("file://{}", absolute.display()))
    }
}
