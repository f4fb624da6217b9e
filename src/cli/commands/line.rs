//! Line command implementation

use std::path::Path;

use anyhow::Result;

use super::common::finish_and_save;
use crate::cli::args::PointArg;
use crate::{Config, Pattern};

/// Execute the line command
pub fn execute_line_command(
    from: PointArg,
    to: PointArg,
    no_ending: bool,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let mut pattern = Pattern::with_area(config.stitch_area());
    pattern.add_stitch_line(from.as_tuple(), to.as_tuple(), config.builder.stitch_spacing);
    finish_and_save(pattern, no_ending, output, config)
}
