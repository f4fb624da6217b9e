//! Csv command implementation

use std::path::Path;

use anyhow::Result;
use stitchpat_codec::csv::export_to_csv;
use stitchpat_codec::io::{read_pattern_file, read_record_file};

use crate::cli::args::PatternFormat;

/// Execute the csv command
pub fn execute_csv_command(file: &Path, output: &Path, format: PatternFormat) -> Result<()> {
    let rows = match format {
        PatternFormat::A => {
            let commands = read_pattern_file(file)?;
            export_to_csv(&commands, output)?;
            commands.len()
        }
        PatternFormat::B => {
            let records = read_record_file(file)?;
            export_to_csv(&records, output)?;
            records.len()
        }
    };

    println!("Exported {rows} rows to {}", output.display());
    Ok(())
}
