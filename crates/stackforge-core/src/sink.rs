//! Durable file sink
//!
//! The three filesystem primitives the engine needs, behind a trait so the
//! render pipeline can be exercised without touching disk.

use crate::error::{GenerateError, Result};
use std::path::Path;
use tokio::fs;

#[allow(async_fn_in_trait)]
pub trait FileSink {
    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything under it. Missing directories are not an error.
    async fn clear_dir(&self, path: &Path) -> Result<()>;

    /// Write a file, creating parent directories as needed
    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;
}

/// [`FileSink`] backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSink;

impl FileSink for DiskSink {
    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| GenerateError::io(path, e))
    }

    async fn clear_dir(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GenerateError::io(path, e)),
        }
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GenerateError::io(parent, e))?;
        }
        fs::write(path, contents)
            .await
            .map_err(|e| GenerateError::io(path, e))
    }
}
