//! Info command implementation
//!
//! Handles `stitchpat info` and `stitchpat info --json`.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use stitchpat_codec::io::{read_pattern_file, read_record_file};
use stitchpat_codec::{RecordAnalysis, record_analysis};

use super::common::to_json;
use crate::cli::args::PatternFormat;
use crate::{BoundingBox, Config, Pattern, PatternStats, StitchCommand, bounding_box, stats};

/// JSON shape of `stitchpat info --json`.
#[derive(Serialize)]
struct InfoOutput<'a, C: Serialize> {
    file: String,
    format: &'static str,
    stats: PatternStats,
    bounding_box: BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_of_area: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<RecordAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<&'a [C]>,
}

/// Execute the info command
pub fn execute_info_command(
    file: &Path,
    format: PatternFormat,
    json: bool,
    list: bool,
    config: &Config,
) -> Result<()> {
    match format {
        PatternFormat::A => {
            let commands = read_pattern_file(file)?;
            let outside = out_of_area_count(&commands, config);
            let output = InfoOutput {
                file: file.display().to_string(),
                format: "A",
                stats: stats(&commands),
                bounding_box: bounding_box(&commands),
                out_of_area: Some(outside),
                analysis: None,
                commands: list.then_some(commands.as_slice()),
            };
            emit(&output, json)
        }
        PatternFormat::B => {
            let records = read_record_file(file)?;
            let output = InfoOutput {
                file: file.display().to_string(),
                format: "B",
                stats: stats(&records),
                bounding_box: bounding_box(&records),
                out_of_area: None,
                analysis: Some(record_analysis(&records)),
                commands: list.then_some(records.as_slice()),
            };
            emit(&output, json)
        }
    }
}

fn out_of_area_count(commands: &[StitchCommand], config: &Config) -> usize {
    Pattern::from_commands(commands.to_vec(), config.stitch_area())
        .out_of_area_indices()
        .len()
}

fn emit<C: Serialize + std::fmt::Display>(output: &InfoOutput<'_, C>, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(output)?);
        return Ok(());
    }

    let s = &output.stats;
    let bb = output.bounding_box;
    println!("File: {}", output.file);
    println!("Format: {}", output.format);
    println!("Commands: {}", s.total_commands);
    for (kind, count) in s.counts.iter().filter(|(_, n)| **n > 0) {
        println!("  {kind}: {count}");
    }
    println!(
        "Bounding box: ({}, {}) to ({}, {}) [{} x {} units]",
        bb.min_x,
        bb.min_y,
        bb.max_x,
        bb.max_y,
        bb.width(),
        bb.height()
    );
    println!("Path length: {:.1} units", s.path_length);

    if let Some(outside) = output.out_of_area
        && outside > 0
    {
        println!("Outside stitch area: {outside} command(s)");
    }

    if let Some(analysis) = &output.analysis {
        println!("Motion:");
        println!("  Point records: {}", analysis.point_records);
        println!("  Movement records: {}", analysis.movement_records);
        println!("  Speed changes: {}", analysis.speed_changes);
        println!("  Function calls: {}", analysis.function_calls);
        if !analysis.function_names.is_empty() {
            println!("  Functions: {}", analysis.function_names.join(", "));
        }
        println!(
            "  X range: {}..{}, Y range: {}..{}",
            analysis.x_range.0, analysis.x_range.1, analysis.y_range.0, analysis.y_range.1
        );
        println!("  Travel: {:.1} units", analysis.travel_length);
    }

    if let Some(commands) = output.commands {
        println!();
        for (i, cmd) in commands.iter().enumerate() {
            println!("{i:>5}  {cmd}");
        }
    }

    Ok(())
}
