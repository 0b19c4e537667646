//! Temporary upload storage
//!
//! Each request writes its file under a unique name in the upload directory
//! and holds a [`TempUpload`] guard; dropping the guard removes the file, so
//! every exit path of the handler cleans up after itself.

use postlens_models::UploadedFile;
use postlens_utils::{secure_filename, PostlensResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write the upload to `dir` under `{uuid}_{sanitized filename}`.
    pub async fn persist(dir: &Path, upload: &UploadedFile) -> PostlensResult<Self> {
        // Guard first, so a failed or partial write is still removed.
        let guard = Self {
            path: dir.join(storage_name(&upload.filename)),
        };
        tokio::fs::write(&guard.path, &upload.data).await?;

        debug!(
            path = %guard.path.display(),
            size_bytes = upload.size_bytes(),
            "Persisted upload"
        );
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove upload"),
        }
    }
}

/// Unique on-disk name for an upload.
pub fn storage_name(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), secure_filename(original))
}
