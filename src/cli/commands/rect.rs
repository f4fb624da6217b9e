//! Rect command implementation

use std::path::Path;

use anyhow::Result;

use super::common::finish_and_save;
use crate::cli::args::PointArg;
use crate::{Config, Pattern};

/// Execute the rect command
pub fn execute_rect_command(
    center: PointArg,
    width: i32,
    height: i32,
    no_ending: bool,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let mut pattern = Pattern::with_area(config.stitch_area());
    pattern.add_rectangle_stitches(
        center.as_tuple(),
        width,
        height,
        config.builder.stitch_spacing,
    );
    finish_and_save(pattern, no_ending, output, config)
}
