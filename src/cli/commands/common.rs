//! Helpers shared by the pattern-writing commands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use stitchpat_codec::io::{is_pattern_extension, write_pattern_file};
use tracing::warn;

use crate::{Config, Pattern};

/// Append the configured ending (unless disabled) and write `pattern` to `output`.
pub fn finish_and_save(
    mut pattern: Pattern,
    no_ending: bool,
    output: &Path,
    config: &Config,
) -> Result<()> {
    if !no_ending {
        pattern.add_ending_sequence(config.builder.backtack_length, config.builder.backtack_steps);
    }

    let outside = pattern.out_of_area_indices();
    if !outside.is_empty() {
        let area = pattern.area();
        warn!(
            count = outside.len(),
            first = outside[0],
            "commands fall outside the {}x{}mm stitch area",
            area.width_mm(),
            area.height_mm()
        );
    }
    if !is_pattern_extension(output) {
        warn!(path = %output.display(), "output does not use a .001-.300 pattern extension");
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
            "  note: {} oversized move(s) were clamped; re-run with --split-oversized \
             or set [encoding] oversized_delta = \"split\"",
            report.clamped.len()
        );
    }
    if report.split_records > 0 {
        println!("  note: {} extra move record(s) inserted", report.split_records);
    }
    Ok(())
}

/// Pretty JSON for command output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON output")
}
