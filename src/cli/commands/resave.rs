//! Resave command implementation
//!
//! Decodes a Format A file, optionally centres it, and encodes it again with
//! the configured oversized-delta policy.

use std::path::Path;

use anyhow::Result;
use stitchpat_codec::io::{read_pattern_file, write_pattern_file};
use tracing::debug;

use crate::{Config, Pattern};

/// Execute the resave command
pub fn execute_resave_command(
    input: &Path,
    output: &Path,
    center: bool,
    config: &Config,
) -> Result<()> {
    let commands = read_pattern_file(input)?;
    let mut pattern = Pattern::from_commands(commands, config.stitch_area());

    if center {
        let (dx, dy) = pattern.center_on_origin();
        debug!(dx, dy, "centred pattern");
        println!("Translated pattern by ({dx}, {dy})");
    }

    let report = write_pattern_file(output, pattern.commands(), config.encode_options())?;
    println!(
        "Wrote {} commands ({} bytes) to {}",
        pattern.len(),
        report.bytes.len(),
        output.display()
    );
    if !report.clamped.is_empty() {
        println!(
            "  note: {} oversized move(s) were clamped; re-run with --split-oversized",
            report.clamped.len()
        );
    }
    if report.split_records > 0 {
        println!("  note: {} extra move record(s) inserted", report.split_records);
    }
    Ok(())
}
