use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{borrow::Cow, path::Path};
use tracing::{debug, warn};

use crate::{
    ext::BestEffortPathExt,
    filesystem::{InvalidMarkerName, InvalidSkeletonPath, MarkerName, Skeleton},
};

const MARKER_KEY: &str = "marker";
const EXCLUDE_KEY: &str = "exclude";
const SKELETON_KEY: &str = "skeleton";
const KNOWN_KEYS: [&str; 3] = [MARKER_KEY, EXCLUDE_KEY, SKELETON_KEY];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutConfig {
    marker: MarkerName,
    excludes: Vec<String>,
    skeleton: Skeleton,
}

impl LayoutConfig {
    pub async fn from_path(path: &Path) -> Result<Self, LayoutConfigError> {
        debug!("Reading layout file: {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read layout file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    /// Applies command-line values on top of the file: a marker replaces the
    /// configured one, excludes are appended.
    pub fn with_overrides(
        mut self,
        marker: Option<&str>,
        excludes: &[String],
    ) -> Result<Self, LayoutConfigError> {
        if let Some(marker) = marker {
            self.marker = MarkerName::new(marker).context(InvalidMarkerSnafu)?;
        }
        for exclude in excludes {
            if !self.excludes.contains(exclude) {
                self.excludes.push(exclude.clone());
            }
        }
        Ok(self)
    }

    pub fn marker(&self) -> &MarkerName {
        &self.marker
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    fn get<'a, 'input>(
        top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
        key: &'static str,
    ) -> Option<&'a Yaml<'input>> {
        top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
    }

    fn parse_marker(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<MarkerName, LayoutConfigError> {
        match Self::get(top_level, MARKER_KEY) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(MarkerName::default()),
            Some(value) => {
                let name = value
                    .as_str()
                    .ok_or(LayoutConfigError::NotAString { key: MARKER_KEY })?;
                MarkerName::new(name).context(InvalidMarkerSnafu)
            }
        }
    }

    fn parse_string_list(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Vec<String>, LayoutConfigError> {
        let items = match Self::get(top_level, key) {
            None | Some(Yaml::Value(Scalar::Null)) => return Ok(Vec::new()),
            Some(value) => value
                .as_sequence()
                .ok_or(LayoutConfigError::NotAList { key })?,
        };

        Ok(items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(s) => Some(s.to_string()),
                None => {
                    warn!("Skipping non-string entry in '{}': {:?}", key, item);
                    None
                }
            })
            .collect())
    }

    fn warn_unknown_keys(top_level: &LinkedHashMap<Yaml, Yaml>) {
        for key in top_level.keys() {
            match key.as_str() {
                Some(name) if KNOWN_KEYS.contains(&name) => {}
                _ => debug!("Ignoring unknown layout key: {:?}", key),
            }
        }
    }
}

impl TryFrom<&str> for LayoutConfig {
    type Error = LayoutConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().ok_or(LayoutConfigError::MalformedConfig)?;

        let top_level = document
            .as_mapping()
            .ok_or(LayoutConfigError::TopLevelNotMap)?;
        Self::warn_unknown_keys(top_level);

        let marker = Self::parse_marker(top_level)?;
        let excludes = Self::parse_string_list(top_level, EXCLUDE_KEY)?;
        let skeleton = Skeleton::new(Self::parse_string_list(top_level, SKELETON_KEY)?)
            .context(InvalidSkeletonSnafu)?;

        Ok(LayoutConfig {
            marker,
            excludes,
            skeleton,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum LayoutConfigError {
    #[snafu(display("Failed to read the layout file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Layout file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the layout file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted layout file"))]
    MalformedConfig,
    #[snafu(display("Top level of the layout file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be a string", key))]
    NotAString { key: &'static str },
    #[snafu(display("'{}' should be a list", key))]
    NotAList { key: &'static str },
    #[snafu(display("Invalid marker name"))]
    InvalidMarkerError { source: InvalidMarkerName },
    #[snafu(display("Invalid skeleton entry"))]
    InvalidSkeletonError { source: InvalidSkeletonPath },
}
