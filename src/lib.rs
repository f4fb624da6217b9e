//! stitchpat - decode, edit and synthesize PLK-series sewing pattern files
//!
//! stitchpat can be used in two ways:
//! - **CLI**: run `stitchpat info pattern.001`, `stitchpat qr "text" -o out.001`, ...
//! - **Library**: decode, analyse and build patterns from Rust code
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Inspect a pattern file
//! stitchpat info square.001 --json
//!
//! # Export it as CSV
//! stitchpat csv square.001 square.csv
//!
//! # Stitch a 100x60 rectangle with a backtack ending
//! stitchpat rect --center 0,0 --width 100 --height 60 -o rect.002
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use stitchpat::{Pattern, bounding_box, parse};
//!
//! let mut pattern = Pattern::new();
//! pattern.add_stitch_line((0, 0), (60, 0), 20.0);
//! pattern.add_full_ending_sequence(4);
//!
//! let bytes = stitchpat::serialize(pattern.commands());
//! let decoded = parse(&bytes);
//! assert_eq!(bounding_box(&decoded).as_tuple(), (0, 0, 62, 0));
//! ```
//!
//! # Formats
//!
//! - **Format A**: 4-byte delta records, decoded and encoded. See [`codec::format_a`].
//! - **Format B**: variable-length absolute records with function codes,
//!   decode only. See [`codec::format_b`].
//!
//! Decoding never fails; truncated or unknown data shortens the command list.
//! File I/O, configuration and QR rejections are reported through
//! [`StitchError`].

// ============================================================================
// Public API
// ============================================================================

/// Pattern construction: lines, rectangles, backtacks and QR glyphs.
pub use stitchpat_builder::{
    EcLevel, MachineModel, Pattern, QrOutcome, QrSettings, StitchArea, generate_hash_pattern,
    generate_qr_code,
};

/// Command model and the two codecs.
pub use stitchpat_codec::{
    BoundingBox, CommandKind, DeltaPolicy, EncodeOptions, EncodeReport, PatternDecoder,
    PatternStats, RecordCommand, RecordKind, StitchCommand, StitchKind, bounding_box, parse,
    parse_records, serialize, stats,
};

/// Configuration for stitchpat operations.
///
/// Use [`Config::discover()`] for CLI-like behavior or [`Config::builder()`]
/// for programmatic configuration.
pub use stitchpat_config::{CliArgs, Config, ConfigBuilder, ConfigSource};

/// Library-level error type with user-friendly reporting and exit code mapping.
///
/// Library code returns `StitchError` and does NOT call `std::process::exit()`.
pub use stitchpat_utils::error::{ConfigError, ErrorCategory, StitchError, UserFriendlyError};

/// Exit codes matching the documented exit code table.
pub use stitchpat_utils::exit_codes::ExitCode;

// ============================================================================
// Module paths
// ============================================================================

pub mod codec {
    //! Format A/B codecs, analytics, CSV export and file I/O.
    pub use stitchpat_codec::*;
}

pub mod builder {
    //! Pattern builder, stitch areas and QR generation.
    pub use stitchpat_builder::*;
}

pub mod cli;
