//! Qr command implementation
//!
//! Stitches either a real QR code or, with `--hash`, the decorative 8x8 hash glyph.

use std::path::Path;

use anyhow::Result;

use super::common::finish_and_save;
use crate::cli::args::PointArg;
use crate::{Config, Pattern, StitchError, generate_hash_pattern, generate_qr_code};

/// Execute the qr command
pub fn execute_qr_command(
    text: &str,
    center: PointArg,
    hash: bool,
    no_ending: bool,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let mut pattern = Pattern::with_area(config.stitch_area());

    if hash {
        let size = generate_hash_pattern(
            &mut pattern,
            text,
            center.as_tuple(),
            config.qr.module_size,
            config.qr.stitch_spacing,
        );
        println!("Hash glyph ({size}x{size} units)");
    } else {
        let outcome =
            generate_qr_code(&mut pattern, text, center.as_tuple(), &config.qr_settings());
        if !outcome.success {
            return Err(StitchError::QrRejected {
                reason: outcome.message,
            }
            .into());
        }
        println!("{}", outcome.message);
    }

    finish_and_save(pattern, no_ending, output, config)
}
