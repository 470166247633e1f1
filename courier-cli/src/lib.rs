//! Command-line interface for the courier route planner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod logging;
mod plan;

pub use error::CliError;

use plan::{PlanArgs, run_plan};

const ARG_PLAN_DELIVERIES: &str = "deliveries";
const ARG_PLAN_MAP: &str = "map";
const ARG_PLAN_SEED: &str = "seed";
const ARG_PLAN_INITIAL_TEMPERATURE: &str = "initial-temperature";
const ARG_PLAN_COOLING_RATE: &str = "cooling-rate";
const ARG_PLAN_MIN_TEMPERATURE: &str = "min-temperature";
const ARG_PLAN_TURN_TOLERANCE: &str = "turn-tolerance";
const ARG_PLAN_FORMAT: &str = "format";
const ARG_PLAN_LOG_LEVEL: &str = "log-level";
const ENV_PLAN_DELIVERIES: &str = "COURIER_CMDS_PLAN_DELIVERIES";
const ENV_PLAN_MAP: &str = "COURIER_CMDS_PLAN_MAP";

/// Run the courier CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, loading,
/// planning or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Turn-by-turn delivery route planning over a street map",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a delivery tour and print its navigation commands.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
