use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::filesystem::PlaceholderStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    path: PathBuf,
    status: PlaceholderStatus,
}

impl PlaceholderEntry {
    pub fn new(path: impl Into<PathBuf>, status: PlaceholderStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> PlaceholderStatus {
        self.status
    }
}

/// Every placeholder ensured by a run, sorted byte-wise by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    entries: Vec<PlaceholderEntry>,
}

impl SyncReport {
    pub fn new(mut entries: Vec<PlaceholderEntry>) -> Self {
        entries.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        Self { entries }
    }

    pub fn entries(&self) -> &[PlaceholderEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    pub fn created_count(&self) -> usize {
        self.count(PlaceholderStatus::Created)
    }

    pub fn existing_count(&self) -> usize {
        self.count(PlaceholderStatus::Existing)
    }

    fn count(&self, status: PlaceholderStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Writes one path per line. With `colorize`, new markers are green and
    /// existing ones dimmed.
    pub fn write_to(&self, out: &mut impl Write, colorize: bool) -> io::Result<()> {
        for entry in &self.entries {
            if colorize {
                let line = entry.path().display().to_string();
                let styled = match entry.status() {
                    PlaceholderStatus::Created => line.green(),
                    PlaceholderStatus::Existing => line.dimmed(),
                };
                writeln!(out, "{styled}")?;
            } else {
                write_raw_line(out, entry.path())?;
            }
        }
        out.flush()
    }
}

/// Writes the path bytes unchanged so non-UTF-8 names stay usable.
#[cfg(unix)]
fn write_raw_line(out: &mut impl Write, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_raw_line(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", path.display())
}
