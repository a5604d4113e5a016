use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub marker: Option<String>,
    pub layout_path: Option<PathBuf>,
    pub excludes: Vec<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            marker: cli.marker,
            layout_path: cli.config,
            excludes: cli.excludes,
        }
    }
}
