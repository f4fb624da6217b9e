//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Initializes logging
//! - Builds CliArgs and discovers Config
//! - Dispatches to command handlers
//! - Handles all error output

use anyhow::Result;
use clap::Parser;
use stitchpat_utils::logging::{command_span, init_tracing};

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ConfigError, ExitCode, StitchError, UserFriendlyError};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints a user-facing report to stderr and returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: logging unavailable: {e}");
    }

    let cli_args = build_cli_args(&cli);
    let operation = cli.command.name();

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => return Err(report_error(&err, "config")),
    };

    let _span = command_span(operation).entered();

    let result = match cli.command {
        Commands::Info {
            file,
            format,
            json,
            list,
        } => commands::execute_info_command(&file, format, json, list, &config),
        Commands::Csv {
            file,
            output,
            format,
        } => commands::execute_csv_command(&file, &output, format),
        Commands::Resave {
            input,
            output,
            center,
            split_oversized: _,
        } => commands::execute_resave_command(&input, &output, center, &config),
        Commands::Line {
            from,
            to,
            no_ending,
            output,
            ..
        } => commands::execute_line_command(from, to, no_ending, &output, &config),
        Commands::Rect {
            center,
            width,
            height,
            no_ending,
            output,
            ..
        } => commands::execute_rect_command(center, width, height, no_ending, &output, &config),
        Commands::Qr {
            text,
            center,
            hash,
            no_ending,
            output,
            ..
        } => commands::execute_qr_command(&text, center, hash, no_ending, &output, &config),
        Commands::Config { json } => commands::execute_config_command(json, &config),
    };

    match result {
        Ok(()) => Ok(()),
        Err(error) => Err(report_error(&error, operation)),
    }
}

/// Collect CLI overrides, including per-command flags that map onto config keys.
fn build_cli_args(cli: &Cli) -> CliArgs {
    let mut args = CliArgs {
        config_path: cli.config.clone(),
        machine: cli.machine.clone(),
        ..CliArgs::default()
    };

    match &cli.command {
        Commands::Line { spacing, .. } | Commands::Rect { spacing, .. } => {
            args.stitch_spacing = *spacing;
        }
        Commands::Qr {
            module_size,
            spacing,
            ec,
            ..
        } => {
            args.module_size = *module_size;
            args.qr_stitch_spacing = *spacing;
            args.error_correction = ec.clone();
        }
        Commands::Resave {
            split_oversized: true,
            ..
        } => {
            args.oversized_delta = Some("split".to_string());
        }
        _ => {}
    }

    args
}

/// Print a report for `error` and pick the exit code.
fn report_error(error: &anyhow::Error, operation: &str) -> ExitCode {
    if let Some(err) = error.downcast_ref::<StitchError>() {
        eprintln!("{}", err.report());
        return err.to_exit_code();
    }

    if let Some(err) = error.downcast_ref::<ConfigError>() {
        eprintln!("{}", err.report());
        return ExitCode::CLI_ARGS;
    }

    eprintln!("✗ Unexpected error during {operation}: {error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    eprintln!("\n  Run with --verbose for more detailed output");
    ExitCode::INTERNAL
}
