use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Places an empty marker file in every directory of a tree so that version
/// control keeps directories that would otherwise be empty.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Directory whose whole tree receives marker files
    pub root: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Marker file name, `.gitkeep` unless the layout file says otherwise
    #[clap(long, short)]
    pub marker: Option<String>,

    /// YAML layout file with `marker`, `exclude` and `skeleton` entries
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Directory name to skip along with its subtree (repeatable)
    #[clap(long = "exclude", short = 'x', value_name = "NAME")]
    pub excludes: Vec<String>,
}
