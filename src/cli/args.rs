//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and all subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// stitchpat - PLK-series sewing pattern toolkit
#[derive(Parser, Debug)]
#[command(name = "stitchpat")]
#[command(about = "Decode, edit and synthesize PLK-series sewing controller pattern files")]
#[command(long_about = r#"
stitchpat reads and writes the 4-byte delta pattern format (Format A) used by
PLK-series controllers, decodes the experimental variable-length Format B, and
synthesizes new patterns: stitch lines, rectangles and QR codes.

EXAMPLES:
  # Summarize a pattern
  stitchpat info pattern.001

  # Dump every command as CSV
  stitchpat csv pattern.001 pattern.csv

  # Centre a pattern on the origin and save it again
  stitchpat resave pattern.001 centred.001 --center

  # Stitch a line with the configured spacing and a backtack ending
  stitchpat line --from -80,0 --to 80,0 -o line.002

  # Stitch a QR code
  stitchpat qr "https://example.com" --module-size 4 -o qr.003

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  The config file is discovered by searching upward from CWD for .stitchpat/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Machine model selecting the stitch area (PLK-A0804, PLK-A0408, PLK-A0204)
    #[arg(long, global = true)]
    pub machine: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pattern file interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PatternFormat {
    /// 4-byte delta records
    #[default]
    A,
    /// Variable-length absolute records (experimental)
    B,
}

/// An `X,Y` coordinate pair in machine units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointArg {
    pub x: i32,
    pub y: i32,
}

impl PointArg {
    #[must_use]
    pub const fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl FromStr for PointArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid coordinate '{}': {e}", v.trim()))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show command counts, bounding box and path length of a pattern file
    Info {
        /// Pattern file to inspect
        file: PathBuf,

        /// Interpretation of the file
        #[arg(long, value_enum, default_value_t = PatternFormat::A)]
        format: PatternFormat,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,

        /// Also print every decoded command
        #[arg(long)]
        list: bool,
    },

    /// Export every decoded command as CSV
    Csv {
        /// Pattern file to read
        file: PathBuf,

        /// CSV file to write
        output: PathBuf,

        /// Interpretation of the file
        #[arg(long, value_enum, default_value_t = PatternFormat::A)]
        format: PatternFormat,
    },

    /// Decode a Format A file, optionally edit it, and encode it again
    Resave {
        /// Pattern file to read
        input: PathBuf,

        /// Pattern file to write
        output: PathBuf,

        /// Translate the pattern so its bounding box is centred on the origin
        #[arg(long)]
        center: bool,

        /// Split oversized deltas into extra moves instead of clamping them
        #[arg(long)]
        split_oversized: bool,
    },

    /// Stitch a straight line
    Line {
        /// Start point as X,Y
        #[arg(long, allow_hyphen_values = true)]
        from: PointArg,

        /// End point as X,Y
        #[arg(long, allow_hyphen_values = true)]
        to: PointArg,

        /// Stitch spacing in machine units
        #[arg(long)]
        spacing: Option<f64>,

        /// Do not append the color change, backtack and pattern end
        #[arg(long)]
        no_ending: bool,

        /// Pattern file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stitch a rectangle outline
    Rect {
        /// Centre point as X,Y
        #[arg(long, allow_hyphen_values = true, default_value = "0,0")]
        center: PointArg,

        /// Width in machine units
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
        width: i32,

        /// Height in machine units
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
        height: i32,

        /// Stitch spacing in machine units
        #[arg(long)]
        spacing: Option<f64>,

        /// Do not append the color change, backtack and pattern end
        #[arg(long)]
        no_ending: bool,

        /// Pattern file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stitch a QR code (or a decorative hash glyph with --hash)
    Qr {
        /// Text to encode
        text: String,

        /// Centre point as X,Y
        #[arg(long, allow_hyphen_values = true, default_value = "0,0")]
        center: PointArg,

        /// Module side in machine units
        #[arg(long)]
        module_size: Option<i32>,

        /// Stitch spacing inside each module block
        #[arg(long)]
        spacing: Option<f64>,

        /// Error correction level (L, M, Q, H)
        #[arg(long)]
        ec: Option<String>,

        /// Stitch a decorative hash glyph instead of a real QR code
        #[arg(long)]
        hash: bool,

        /// Do not append the color change, backtack and pattern end
        #[arg(long)]
        no_ending: bool,

        /// Pattern file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Emit as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Stable name used for log spans and error context.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Info { .. } => "info",
            Self::Csv { .. } => "csv",
            Self::Resave { .. } => "resave",
            Self::Line { .. } => "line",
            Self::Rect { .. } => "rect",
            Self::Qr { .. } => "qr",
            Self::Config { .. } => "config",
        }
    }
}

/// Build the clap command, for completions and tests.
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
