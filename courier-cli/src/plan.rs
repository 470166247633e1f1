//! Plan command implementation for the courier CLI.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use courier_core::{DeliveryPlan, Planner};
use courier_data::{load_deliveries, load_street_map};
use courier_planner::{AStarRouter, AnnealingConfig, RoutePlanner, RoutePlannerConfig};
use log::{LevelFilter, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_PLAN_COOLING_RATE, ARG_PLAN_DELIVERIES, ARG_PLAN_FORMAT, ARG_PLAN_INITIAL_TEMPERATURE,
    ARG_PLAN_LOG_LEVEL, ARG_PLAN_MAP, ARG_PLAN_MIN_TEMPERATURE, ARG_PLAN_SEED,
    ARG_PLAN_TURN_TOLERANCE, CliError, ENV_PLAN_DELIVERIES, ENV_PLAN_MAP, logging,
};

/// Seed used when none is configured, so repeated runs print the same plan.
pub(crate) const DEFAULT_SEED: u64 = 0;

/// How the finished plan is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Narrative text, one command per line.
    #[default]
    Text,
    /// The full [`DeliveryPlan`] as pretty-printed JSON.
    Json,
}

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Plan a delivery tour. The street map and deliveries files \
                 are loaded, the stop order is optimised with a seeded \
                 simulated annealing pass and every leg is routed over the \
                 street map. Settings can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Plan a delivery tour over a street map"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct PlanArgs {
    /// Path to the deliveries file (depot line, then `lat lon:item` lines).
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) deliveries: Option<Utf8PathBuf>,
    /// Path to the street map file.
    #[arg(long = ARG_PLAN_MAP, value_name = "path")]
    #[serde(default)]
    pub(crate) map: Option<Utf8PathBuf>,
    /// Seed for the stop-order optimiser.
    #[arg(long = ARG_PLAN_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Starting temperature of the annealing schedule.
    #[arg(long = ARG_PLAN_INITIAL_TEMPERATURE, value_name = "t")]
    #[serde(default)]
    pub(crate) initial_temperature: Option<f64>,
    /// Multiplicative cooling applied per iteration, in (0, 1).
    #[arg(long = ARG_PLAN_COOLING_RATE, value_name = "r")]
    #[serde(default)]
    pub(crate) cooling_rate: Option<f64>,
    /// Temperature at which annealing stops.
    #[arg(long = ARG_PLAN_MIN_TEMPERATURE, value_name = "t")]
    #[serde(default)]
    pub(crate) min_temperature: Option<f64>,
    /// Heading change in degrees still treated as going straight.
    #[arg(long = ARG_PLAN_TURN_TOLERANCE, value_name = "degrees")]
    #[serde(default)]
    pub(crate) turn_tolerance: Option<f64>,
    /// Output format for the plan.
    #[arg(long = ARG_PLAN_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Log level for diagnostics written to stderr.
    #[arg(long = ARG_PLAN_LOG_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<LevelFilter>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Path to the deliveries file.
    pub(crate) deliveries: Utf8PathBuf,
    /// Path to the street map file.
    pub(crate) map: Utf8PathBuf,
    /// Optimiser seed.
    pub(crate) seed: u64,
    /// Validated planner settings.
    pub(crate) planner: RoutePlannerConfig,
    /// How the plan is written.
    pub(crate) format: OutputFormat,
    /// Logger filter.
    pub(crate) log_level: LevelFilter,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.deliveries, ARG_PLAN_DELIVERIES)?;
        Self::require_existing(&self.map, ARG_PLAN_MAP)?;
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match courier_data::fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let deliveries = args.deliveries.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_DELIVERIES,
            env: ENV_PLAN_DELIVERIES,
        })?;
        let map = args.map.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_MAP,
            env: ENV_PLAN_MAP,
        })?;

        let defaults = RoutePlannerConfig::default();
        let planner = RoutePlannerConfig {
            annealing: AnnealingConfig {
                initial_temperature: args
                    .initial_temperature
                    .unwrap_or(defaults.annealing.initial_temperature),
                cooling_rate: args
                    .cooling_rate
                    .unwrap_or(defaults.annealing.cooling_rate),
                min_temperature: args
                    .min_temperature
                    .unwrap_or(defaults.annealing.min_temperature),
            },
            turn_tolerance_degrees: args
                .turn_tolerance
                .unwrap_or(defaults.turn_tolerance_degrees),
        };
        planner.validate()?;

        Ok(Self {
            deliveries,
            map,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            planner,
            format: args.format.unwrap_or_default(),
            log_level: args.log_level.unwrap_or(logging::DEFAULT_LOG_LEVEL),
        })
    }
}

/// Installs the global logger at the configured level.
pub(crate) type LoggerInit = fn(LevelFilter) -> io::Result<()>;

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_plan_with(args, logging::init, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    init_logging: LoggerInit,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    init_logging(config.log_level).map_err(CliError::Logging)?;
    execute_plan(&config, writer)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_plan(config: &PlanConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let map = load_street_map(&config.map)?;
    let manifest = load_deliveries(&config.deliveries)?;
    let request = manifest.into_request(config.seed);

    let planner = RoutePlanner::with_config(AStarRouter::new(map), config.planner)?;
    let plan = planner.plan(&request)?;
    info!(
        "planned {} deliveries over {:.2} miles",
        request.stops.len(),
        plan.total_distance_miles
    );

    match config.format {
        OutputFormat::Text => write_text(writer, &plan).map_err(CliError::WritePlanOutput),
        OutputFormat::Json => write_json(writer, &plan),
    }
}

fn write_text(writer: &mut dyn Write, plan: &DeliveryPlan) -> io::Result<()> {
    writeln!(writer, "Starting at the depot...")?;
    for command in &plan.commands {
        writeln!(writer, "{command}")?;
    }
    writeln!(
        writer,
        "You are back at the depot and your deliveries are done!"
    )?;
    writeln!(
        writer,
        "{:.2} miles travelled for all deliveries.",
        plan.total_distance_miles
    )
}

fn write_json(writer: &mut dyn Write, plan: &DeliveryPlan) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(plan).map_err(CliError::SerialisePlan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)?;
    writer.write_all(b"\n").map_err(CliError::WritePlanOutput)?;
    Ok(())
}
