//! Persistence layer for rendered workflow files

pub mod local;

pub use local::LocalFileSink;

use crate::core::{PersistenceError, Workflow};
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

/// Directory (relative to the project root) that workflow files live in
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Header written above every generated workflow
pub const AUTOGENERATED_HEADER: &str = "# This file is autogenerated. Do not modify manually.\n\
# Edit the code that builds this workflow and regenerate it instead.\n\n";

/// Trait for file sinks
#[async_trait::async_trait]
pub trait FileSink: Send + Sync {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    async fn ensure_directory(&self, path: &Path) -> io::Result<()>;

    /// Write `contents` to `path`, replacing any existing file
    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl Workflow {
    /// Relative path the workflow is written to
    ///
    /// Root, prefix and `..` components of the filename are dropped, so the
    /// result always stays below [`WORKFLOWS_DIR`].
    pub fn destination(&self) -> PathBuf {
        let mut path = PathBuf::from(WORKFLOWS_DIR);
        for component in Path::new(self.filename()).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path
    }

    /// Header followed by the rendered YAML
    pub fn to_file_contents(&self) -> Result<String, PersistenceError> {
        let yaml = self.to_yaml()?;
        Ok(format!("{}{}", AUTOGENERATED_HEADER, yaml))
    }

    /// Render the workflow and store it at [`Workflow::destination`]
    ///
    /// The destination's directory is created first; the file is then written,
    /// overwriting any previous version. Sink failures are logged and returned
    /// unchanged.
    pub async fn write_to_file<S>(&self, sink: &S) -> Result<PathBuf, PersistenceError>
    where
        S: FileSink + ?Sized,
    {
        let contents = self.to_file_contents().map_err(|e| {
            error!("Error rendering workflow file {}: {}", self.filename(), e);
            e
        })?;
        let path = self.destination();
        let dir = path.parent().unwrap_or_else(|| Path::new(WORKFLOWS_DIR));

        if let Err(e) = sink.ensure_directory(dir).await {
            error!("Error creating workflow directory {}: {}", dir.display(), e);
            return Err(e.into());
        }

        if let Err(e) = sink.write_file(&path, &contents).await {
            error!("Error writing workflow file {}: {}", path.display(), e);
            return Err(e.into());
        }

        info!(path = %path.display(), bytes = contents.len(), "Wrote workflow file");
        Ok(path)
    }
}

/// In-memory sink (for testing or dry runs)
pub struct InMemoryFileSink {
    directories: tokio::sync::RwLock<BTreeSet<PathBuf>>,
    files: tokio::sync::RwLock<HashMap<PathBuf, String>>,
}

impl InMemoryFileSink {
    pub fn new() -> Self {
        Self {
            directories: tokio::sync::RwLock::new(BTreeSet::new()),
            files: tokio::sync::RwLock::new(HashMap::new()),
        }
    }

    /// Contents stored at `path`, if any
    pub async fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().await.get(path.as_ref()).cloned()
    }

    pub async fn has_directory(&self, path: impl AsRef<Path>) -> bool {
        self.directories.read().await.contains(path.as_ref())
    }

    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }
}

impl Default for InMemoryFileSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FileSink for InMemoryFileSink {
    async fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.directories.write().await;
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.directories.read().await.contains(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("directory {} does not exist", parent.display()),
                ));
            }
        }

        let mut files = self.files.write().await;
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
