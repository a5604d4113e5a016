use std::path::{Component, Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

/// Relative directories created under the root before placeholders are synced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skeleton {
    directories: Vec<PathBuf>,
}

impl Skeleton {
    pub fn new<I, P>(directories: I) -> Result<Self, InvalidSkeletonPath>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let directories = directories
            .into_iter()
            .map(Into::into)
            .map(|path| {
                if Self::stays_inside_root(&path) {
                    Ok(path)
                } else {
                    Err(InvalidSkeletonPath { path })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { directories })
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Creates every missing skeleton directory and returns the ones it made.
    pub async fn materialize(&self, root: &Path) -> Result<Vec<PathBuf>, MaterializeError> {
        let mut created = Vec::new();

        for directory in self.directories() {
            let target = root.join(directory);
            if fs::metadata(&target)
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false)
            {
                debug!("Skeleton directory {} already exists", target.display());
                continue;
            }

            fs::create_dir_all(&target)
                .await
                .context(CreateDirSnafu { path: &target })?;
            info!("Created skeleton directory {}", target.display());
            created.push(target);
        }

        created.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(created)
    }

    fn stays_inside_root(path: &Path) -> bool {
        let mut has_normal = false;
        for component in path.components() {
            match component {
                Component::Normal(_) => has_normal = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
            }
        }
        has_normal
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Skeleton path '{}' must be relative and stay inside the root", path.display()))]
pub struct InvalidSkeletonPath {
    path: PathBuf,
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Failed to create skeleton directory {}", path.best_effort_path_display()))]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
}
