//! Shared test harness modules for the courier CLI.

use super::*;
use crate::plan::{DEFAULT_SEED, OutputFormat, PlanConfig, run_plan_with};

/// Leaves the global logger alone so tests can run in one process.
fn skip_logging(_level: log::LevelFilter) -> std::io::Result<()> {
    Ok(())
}

mod helpers;
mod plan_unit;
