//! File-storage boundary for news image attachments.
//!
//! Uploaded bytes are persisted under a randomized name inside a flat
//! directory; services only ever record and delete the returned reference
//! string, never raw bytes.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub async fn new<P: Into<PathBuf>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("media storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.dir.join(reference)
    }

    /// Persist bytes under a randomized name, keeping the extension from the
    /// hint when it is plain ASCII-alphanumeric. Returns the stored reference.
    pub async fn save(&self, filename_hint: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let reference = match sanitized_extension(filename_hint) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.path_for(&reference);
        fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {}", path.display(), e)))?;
        Ok(reference)
    }

    /// Best-effort removal. A missing file counts as removed; any other
    /// failure is logged and swallowed. Returns whether the file is gone.
    pub async fn remove(&self, reference: &str) -> bool {
        if reference.contains('/') || reference.contains('\\') || reference.contains("..") {
            warn!(reference, "refusing to remove suspicious media reference");
            return false;
        }
        let path = self.path_for(reference);
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(reference, error = %e, "failed to remove media file");
                false
            }
        }
    }
}

fn sanitized_extension(hint: &str) -> Option<String> {
    let ext = Path::new(hint).extension()?.to_str()?;
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_remove_roundtrip() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = MediaStore::new(tmp.path()).await?;

        let reference = store.save("photo.PNG", b"not really a png").await?;
        assert!(reference.ends_with(".png"));
        assert!(store.path_for(&reference).exists());

        assert!(store.remove(&reference).await);
        assert!(!store.path_for(&reference).exists());
        Ok(())
    }

    #[tokio::test]
    async fn removing_a_missing_file_is_fine() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = MediaStore::new(tmp.path()).await?;
        assert!(store.remove("already-gone.png").await);
        Ok(())
    }

    #[tokio::test]
    async fn traversal_references_are_rejected() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = MediaStore::new(tmp.path()).await?;
        assert!(!store.remove("../etc/passwd").await);
        assert!(!store.remove("a/b.png").await);
        Ok(())
    }

    #[tokio::test]
    async fn odd_filename_hints_get_bare_uuid_references() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = MediaStore::new(tmp.path()).await?;
        let reference = store.save("no-extension", b"x").await?;
        assert!(!reference.contains('.'));
        let reference = store.save("weird.p;g", b"x").await?;
        assert!(!reference.contains('.'));
        Ok(())
    }
}
