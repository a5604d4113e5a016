use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{LayoutConfig, LayoutConfigError};
use crate::filesystem::{MaterializeError, SynchronizeError, TreePlaceholderSynchronizer};
use crate::report::SyncReport;

pub struct Application;

impl Application {
    /// Validates the root, creates the skeleton and syncs every placeholder.
    ///
    /// A missing root is reported before anything touches the disk.
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<SyncReport, ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();

        let layout = match &app_config.layout_path {
            Some(path) => LayoutConfig::from_path(path).await.context(ConfigSnafu)?,
            None => LayoutConfig::default(),
        }
        .with_overrides(app_config.marker.as_deref(), &app_config.excludes)
        .context(ConfigSnafu)?;
        debug!("Resolved layout: {:?}", layout);

        TreePlaceholderSynchronizer::ensure_root(&app_config.root)
            .await
            .context(SynchronizationSnafu)?;

        if !layout.skeleton().is_empty() {
            let created = layout
                .skeleton()
                .materialize(&app_config.root)
                .await
                .context(SkeletonSnafu)?;
            info!("Created {} skeleton directories", created.len());
        }

        TreePlaceholderSynchronizer::new(layout.marker().clone())
            .with_excludes(layout.excludes().iter().cloned())
            .synchronize(&app_config.root)
            .await
            .context(SynchronizationSnafu)
    }

    /// Prints the report to stdout, coloured only on a capable terminal.
    pub fn emit(report: &SyncReport) -> Result<(), ApplicationError> {
        let colorize = supports_color::on(supports_color::Stream::Stdout).is_some();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        report.write_to(&mut out, colorize).context(OutputSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the layout"))]
    ConfigError { source: LayoutConfigError },
    #[snafu(display("Critical failure encountered while creating the directory skeleton"))]
    SkeletonError { source: MaterializeError },
    #[snafu(display("Critical failure encountered while synchronizing placeholders"))]
    SynchronizationError { source: SynchronizeError },
    #[snafu(display("Failed to write the placeholder list"))]
    OutputError { source: io::Error },
}
