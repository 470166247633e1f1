//! Error types emitted by the courier CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_core::PlanError;
use courier_data::{DeliveriesError, MapLoadError};
use courier_planner::PlannerConfigError;
use thiserror::Error;

/// Errors emitted by the courier CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path that is not a regular file.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path being inspected.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The planner settings are out of range.
    #[error("invalid planner settings: {0}")]
    PlannerConfig(#[from] PlannerConfigError),
    /// The street map file could not be loaded.
    #[error("failed to load street map: {0}")]
    MapLoad(#[from] MapLoadError),
    /// The deliveries file could not be loaded.
    #[error("failed to load deliveries: {0}")]
    Deliveries(#[from] DeliveriesError),
    /// Planning the tour failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// The global logger was already installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] std::io::Error),
    /// Serialising the plan failed.
    #[error("failed to serialise delivery plan: {0}")]
    SerialisePlan(#[source] serde_json::Error),
    /// Writing the plan output failed.
    #[error("failed to write plan output: {0}")]
    WritePlanOutput(#[source] std::io::Error),
}
