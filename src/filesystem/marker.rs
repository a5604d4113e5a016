use std::fmt;
use std::path::{Component, Path};

use snafu::Snafu;

pub const DEFAULT_MARKER_NAME: &str = ".gitkeep";

/// Name of the zero-byte placeholder file kept in every directory.
///
/// Always a single normal path component, so joining it onto a directory
/// never escapes that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerName(String);

impl MarkerName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidMarkerName> {
        let name = name.into();
        if Self::is_single_component(&name) {
            Ok(Self(name))
        } else {
            Err(InvalidMarkerName { name })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_single_component(name: &str) -> bool {
        if name.is_empty() || name.contains(['/', '\\', '\0']) {
            return false;
        }
        let mut components = Path::new(name).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }
}

impl Default for MarkerName {
    fn default() -> Self {
        Self(DEFAULT_MARKER_NAME.to_string())
    }
}

impl fmt::Display for MarkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<Path> for MarkerName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("'{}' is not a valid marker file name", name))]
pub struct InvalidMarkerName {
    name: String,
}
