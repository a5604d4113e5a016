use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::Snafu;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{DirectoryNode, MarkerName};
use crate::report::{PlaceholderEntry, SyncReport};

/// Ensures every directory of a tree holds exactly one placeholder marker.
///
/// The walk is sequential and stops at the first filesystem error. Markers
/// written before that error stay on disk.
///
/// Symlinks below the root are not followed, so a symlinked directory gets no
/// marker and cycles cannot occur. Directories whose name is excluded are
/// pruned together with their subtrees; the root itself is never pruned.
#[derive(Debug, Clone, Default)]
pub struct TreePlaceholderSynchronizer {
    marker: MarkerName,
    excludes: HashSet<OsString>,
}

impl TreePlaceholderSynchronizer {
    pub fn new(marker: MarkerName) -> Self {
        Self {
            marker,
            excludes: HashSet::new(),
        }
    }

    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Fails with [`SynchronizeError::NotFoundError`] unless `root` names an
    /// existing directory. Never writes.
    pub async fn ensure_root(root: &Path) -> Result<(), SynchronizeError> {
        match fs::metadata(root).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => {
                debug!("{} is not a directory", root.display());
                NotFoundSnafu { path: root }.fail()
            }
            Err(e) => {
                debug!("Cannot stat {}: {}", root.display(), e);
                NotFoundSnafu { path: root }.fail()
            }
        }
    }

    pub async fn synchronize(&self, root: impl AsRef<Path>) -> Result<SyncReport, SynchronizeError> {
        let root = root.as_ref();
        Self::ensure_root(root).await?;
        debug!(
            "Synchronizing '{}' markers under {}",
            self.marker,
            root.display()
        );

        let mut entries = Vec::new();
        for node in self.directories(root) {
            let node = node?;
            let status = node
                .ensure_placeholder(&self.marker)
                .await
                .map_err(|source| SynchronizeError::marker(node.marker_path(&self.marker), source))?;
            debug!("{:?} placeholder in {}", status, node.path().display());
            entries.push(PlaceholderEntry::new(node.marker_path(&self.marker), status));
        }

        let report = SyncReport::new(entries);
        info!(
            "Ensured {} placeholders under {} ({} created, {} already present)",
            report.entries().len(),
            root.display(),
            report.created_count(),
            report.existing_count()
        );
        Ok(report)
    }

    fn directories<'a>(
        &'a self,
        root: &Path,
    ) -> impl Iterator<Item = Result<DirectoryNode, SynchronizeError>> + 'a {
        let fallback = root.to_path_buf();
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || !self.is_excluded(entry))
            .filter_map(move |entry| match entry {
                // `ensure_root` already stat'ed the root through any symlink
                Ok(entry) if entry.depth() == 0 || entry.file_type().is_dir() => {
                    Some(Ok(DirectoryNode::new(entry.into_path())))
                }
                Ok(entry) => {
                    if entry.path_is_symlink() {
                        debug!("Not following symlink {}", entry.path().display());
                    }
                    None
                }
                Err(source) => Some(Err(SynchronizeError::TraversalError {
                    path: source.path().map_or_else(|| fallback.clone(), Path::to_path_buf),
                    source,
                })),
            })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let excluded = entry.file_type().is_dir() && self.excludes.contains(entry.file_name());
        if excluded {
            debug!("Skipping excluded directory {}", entry.path().display());
        }
        excluded
    }
}

#[derive(Debug, Snafu)]
pub enum SynchronizeError {
    #[snafu(display(
        "Directory {} does not exist or is not a directory",
        path.best_effort_path_display()
    ))]
    NotFoundError { path: PathBuf },
    #[snafu(display("Permission denied while creating placeholder {}", path.best_effort_path_display()))]
    PermissionError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to create placeholder {}", path.best_effort_path_display()))]
    CreateMarkerError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to traverse {}", path.best_effort_path_display()))]
    TraversalError {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl SynchronizeError {
    fn marker(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            SynchronizeError::PermissionError { path, source }
        } else {
            SynchronizeError::CreateMarkerError { path, source }
        }
    }
}
