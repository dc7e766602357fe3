//! Filesystem-backed file sink

use crate::persistence::FileSink;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sink that writes below a project root directory
#[derive(Debug, Clone)]
pub struct LocalFileSink {
    root: PathBuf,
}

impl LocalFileSink {
    /// Create a sink rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a sink-relative path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait::async_trait]
impl FileSink for LocalFileSink {
    async fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        let dir = self.resolve(path);
        debug!(dir = %dir.display(), "Ensuring directory");
        tokio::fs::create_dir_all(&dir).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        let file = self.resolve(path);
        debug!(file = %file.display(), bytes = contents.len(), "Writing file");
        tokio::fs::write(&file, contents).await
    }
}
