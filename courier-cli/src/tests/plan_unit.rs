//! Focused unit tests covering plan CLI configuration and output.

use super::helpers::{PlanFiles, write_utf8};
use super::*;
use courier_planner::{AnnealingConfig, PlannerConfigError, RoutePlannerConfig};
use log::LevelFilter;
use rstest::rstest;

fn args_for(files: &PlanFiles) -> PlanArgs {
    PlanArgs {
        deliveries: Some(files.deliveries()),
        map: Some(files.map()),
        ..PlanArgs::default()
    }
}

#[rstest]
#[case::no_deliveries(true, false, ARG_PLAN_DELIVERIES, ENV_PLAN_DELIVERIES)]
#[case::no_map(false, true, ARG_PLAN_MAP, ENV_PLAN_MAP)]
fn converting_without_required_paths_errors(
    #[case] drop_deliveries: bool,
    #[case] drop_map: bool,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let files = PlanFiles::new();
    let mut args = args_for(&files);
    if drop_deliveries {
        args.deliveries = None;
    }
    if drop_map {
        args.map = None;
    }

    let err = PlanConfig::try_from(args).expect_err("missing path should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn unset_options_fall_back_to_defaults() {
    let files = PlanFiles::new();
    let config = PlanConfig::try_from(args_for(&files)).expect("config should build");
    assert_eq!(config.seed, DEFAULT_SEED);
    assert_eq!(config.planner, RoutePlannerConfig::default());
    assert_eq!(config.format, OutputFormat::Text);
    assert_eq!(config.log_level, LevelFilter::Warn);
}

#[rstest]
fn explicit_options_override_defaults() {
    let files = PlanFiles::new();
    let args = PlanArgs {
        seed: Some(42),
        initial_temperature: Some(50.0),
        cooling_rate: Some(0.9),
        min_temperature: Some(0.5),
        turn_tolerance: Some(5.0),
        format: Some(OutputFormat::Json),
        log_level: Some(LevelFilter::Debug),
        ..args_for(&files)
    };
    let config = PlanConfig::try_from(args).expect("config should build");
    assert_eq!(config.seed, 42);
    assert_eq!(
        config.planner.annealing,
        AnnealingConfig {
            initial_temperature: 50.0,
            cooling_rate: 0.9,
            min_temperature: 0.5,
        }
    );
    assert_eq!(config.planner.turn_tolerance_degrees, 5.0);
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(config.log_level, LevelFilter::Debug);
}

#[rstest]
fn rejects_out_of_range_turn_tolerance() {
    let files = PlanFiles::new();
    let args = PlanArgs {
        turn_tolerance: Some(180.0),
        ..args_for(&files)
    };
    let err = PlanConfig::try_from(args).expect_err("tolerance should be rejected");
    match err {
        CliError::PlannerConfig(PlannerConfigError::TurnTolerance(value)) => {
            assert_eq!(value, 180.0);
        }
        other => panic!("expected PlannerConfig, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_files() {
    let files = PlanFiles::new();
    write_utf8(&files.map(), b"");
    let config = PlanConfig::try_from(args_for(&files)).expect("config should build");
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_PLAN_DELIVERIES);
            assert_eq!(path, files.deliveries());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_parent_directory() {
    let files = PlanFiles::with_corner();
    let args = PlanArgs {
        map: Some(files.root().join("absent").join("mapdata.txt")),
        ..args_for(&files)
    };
    let config = PlanConfig::try_from(args).expect("config should build");
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_PLAN_MAP),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories() {
    let files = PlanFiles::new();
    write_utf8(&files.deliveries(), b"34.0 -118.0\n");
    let args = PlanArgs {
        map: Some(files.root().to_path_buf()),
        ..args_for(&files)
    };
    let config = PlanConfig::try_from(args).expect("config should build");
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_PLAN_MAP),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn depot_only_deliveries_print_an_empty_tour() {
    let files = PlanFiles::with_corner();
    write_utf8(&files.deliveries(), b"34.0625 -118.4480\n");
    let mut stdout = Vec::new();
    run_plan_with(args_for(&files), skip_logging, &mut stdout).expect("plan should succeed");
    let text = String::from_utf8(stdout).expect("stdout utf-8");
    assert_eq!(
        text,
        "Starting at the depot...\n\
         You are back at the depot and your deliveries are done!\n\
         0.00 miles travelled for all deliveries.\n"
    );
}

#[rstest]
fn malformed_map_surfaces_load_error() {
    let files = PlanFiles::with_corner();
    write_utf8(&files.map(), b"Weyburn Avenue\nmany\n");
    let mut stdout = Vec::new();
    let err = run_plan_with(args_for(&files), skip_logging, &mut stdout)
        .expect_err("map should fail");
    assert!(matches!(err, CliError::MapLoad(_)), "unexpected {err:?}");
    assert!(stdout.is_empty());
}

fn refuse_logger(_level: LevelFilter) -> std::io::Result<()> {
    Err(std::io::Error::other("logger already installed"))
}

#[rstest]
fn logger_failure_stops_before_planning() {
    let files = PlanFiles::with_corner();
    let mut stdout = Vec::new();
    let err = run_plan_with(args_for(&files), refuse_logger, &mut stdout)
        .expect_err("logger failure should surface");
    assert!(matches!(err, CliError::Logging(_)), "unexpected {err:?}");
    assert!(stdout.is_empty());
}

#[rstest]
fn logger_receives_configured_level() {
    fn require_debug(level: LevelFilter) -> std::io::Result<()> {
        if level == LevelFilter::Debug {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("unexpected level {level}")))
        }
    }

    let files = PlanFiles::with_corner();
    let args = PlanArgs {
        log_level: Some(LevelFilter::Debug),
        ..args_for(&files)
    };
    let mut stdout = Vec::new();
    run_plan_with(args, require_debug, &mut stdout).expect("plan should succeed");
    assert!(!stdout.is_empty());
}
