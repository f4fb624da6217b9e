//! Codecs for PLK-series sewing controller pattern files.
//!
//! Two rival interpretations of the same physical files live side by side:
//!
//! - [`format_a`]: fixed 4-byte delta records, decode and encode. This is the
//!   format used for everyday pattern files.
//! - [`format_b`]: variable-length opcode records with function codes,
//!   decode only and experimental.
//!
//! Both decoders implement [`PatternDecoder`]. Their opcode tables are kept
//! apart in [`classify`] because the formats disagree on shared opcodes.
//!
//! Decoding never fails. Truncated trailing data and unknown opcodes shorten
//! or annotate the command list instead of raising an error.

pub mod analytics;
pub mod classify;
pub mod command;
pub mod coords;
pub mod csv;
pub mod format_a;
pub mod format_b;
pub mod io;

pub use analytics::{BoundingBox, PatternStats, bounding_box, stats};
pub use command::{
    CommandKind, FunctionCode, PatternCommand, RecordCommand, RecordKind, StitchCommand,
    StitchKind,
};
pub use format_a::{DeltaPolicy, EncodeOptions, EncodeReport, FormatA, parse, serialize};
pub use format_b::{FormatB, RecordAnalysis, parse_records, record_analysis};

/// Common contract for the two decoders: bytes in, command list out.
pub trait PatternDecoder {
    type Kind: CommandKind;

    fn decode(&self, bytes: &[u8]) -> Vec<PatternCommand<Self::Kind>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_with<D: PatternDecoder>(decoder: &D, bytes: &[u8]) -> usize {
        decoder.decode(bytes).len()
    }

    #[test]
    fn test_same_bytes_two_interpretations() {
        let bytes = [0x03, 0x00, 0x05, 0x00, 0x00];
        // Format A: one backtack record plus the sentinel; the fifth byte is unread.
        assert_eq!(decode_with(&FormatA, &bytes), 2);
        // Format B: a single 5-byte linear move.
        assert_eq!(decode_with(&FormatB, &bytes), 1);
    }
}
