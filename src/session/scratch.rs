//! Per-session scratch directory

use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

/// A session-owned directory for downloaded documents.
///
/// Nothing is created until [`ensure`](Self::ensure) runs, so constructing
/// one is free. The directory is removed on [`purge`](Self::purge) and again
/// on drop as a backstop, so crashes and early returns do not leave PDFs
/// behind.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory (and any missing parents). Safe to call again
    /// after a purge.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Remove the directory and everything in it. Teardown failures are
    /// logged, never propagated.
    pub async fn purge(&self) {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                // leave nothing behind when this was the last session
                if let Some(parent) = self.path.parent() {
                    let _ = tokio::fs::remove_dir(parent).await;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to purge scratch dir"),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
