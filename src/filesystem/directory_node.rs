use std::io;
use std::path::{Path, PathBuf};

use compio::fs::{self, OpenOptions};
use tracing::warn;

use crate::filesystem::MarkerName;

/// Outcome of ensuring a placeholder in a single directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStatus {
    Created,
    Existing,
}

/// A directory discovered during traversal.
///
/// Nodes are never cached: whether the placeholder is present is asked of
/// the filesystem every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    path: PathBuf,
}

impl DirectoryNode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn marker_path(&self, marker: &MarkerName) -> PathBuf {
        self.path.join(marker)
    }

    /// Any entry carrying the marker name counts, including dangling symlinks.
    #[cfg(test)]
    pub async fn has_placeholder(&self, marker: &MarkerName) -> bool {
        fs::symlink_metadata(self.marker_path(marker)).await.is_ok()
    }

    /// Creates the empty marker file unless an entry with that name exists.
    ///
    /// An existing entry is never opened, so its contents stay as they are.
    pub async fn ensure_placeholder(&self, marker: &MarkerName) -> io::Result<PlaceholderStatus> {
        let marker_path = self.marker_path(marker);
        if let Ok(metadata) = fs::symlink_metadata(&marker_path).await {
            if !metadata.is_file() {
                warn!(
                    "{} is not a regular file; keeping it as the placeholder",
                    marker_path.display()
                );
            }
            return Ok(PlaceholderStatus::Existing);
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker_path)
            .await
        {
            Ok(file) => {
                drop(file);
                Ok(PlaceholderStatus::Created)
            }
            // Lost a race with another writer; the marker is there either way
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(PlaceholderStatus::Existing),
            Err(e) => Err(e),
        }
    }
}
