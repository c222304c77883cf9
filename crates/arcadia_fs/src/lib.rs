//! # Arcadia FileSystem Cover Storage
//!
//! A local filesystem backend for cover images, meant for development
//! setups without an S3-compatible bucket.
//!
//! This crate implements the [`CoverStorage`] trait, storing each cover as a
//! file named after its object key below a root directory.
//!
//! ## Features
//!
//! * **Atomic Writes**: Uses temporary files and rename operations so a cover is never read half-written.
//!
//! ## Usage
//!
//! ```no_run
//! use arcadia_fs::FileSystemCoverStorage;
//!
//! let storage = FileSystemCoverStorage::new("./arcadia_data", "http://localhost:8080/files");
//! ```

use arcadia_core::prelude::*;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

async fn atomic_write(path: &Path, data: Bytes) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = path.with_extension("tmp");

    fs::write(&tmp_path, data).await?;
    fs::rename(&tmp_path, path).await?;

    Ok(())
}

#[derive(Clone)]
pub struct FileSystemCoverStorage {
    root: PathBuf,
    base_url: String,
}

impl FileSystemCoverStorage {
    /// `base_url` is where `root` is served from, used to build public URLs.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Generic(format!("Invalid object key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

impl CoverStorage for FileSystemCoverStorage {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;
        debug!(?path, content_type, "Writing cover");
        atomic_write(&path, data).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}
