//! Format A: fixed 4-byte delta records.
//!
//! Each record is `[opcode, reserved, x_delta, y_delta]`. Absolute positions
//! are the running sum of all preceding deltas, seeded at the origin. Opcode
//! 0x1F terminates the stream.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::PatternDecoder;
use crate::classify::{classify_opcode, opcode_for, stitch_op};
use crate::command::{StitchCommand, StitchKind};
use crate::coords::{MAX_DELTA, clamp_delta, decode_delta, decode_y, encode_delta, encode_y};

/// Size of one Format A record in bytes.
pub const RECORD_LEN: usize = 4;

/// Format A decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatA;

impl PatternDecoder for FormatA {
    type Kind = StitchKind;

    fn decode(&self, bytes: &[u8]) -> Vec<StitchCommand> {
        parse(bytes)
    }
}

/// Decode a Format A byte stream.
///
/// Reading stops at the first `PatternEnd` record or when fewer than four
/// bytes remain. An `End` sentinel is always appended.
#[must_use]
pub fn parse(bytes: &[u8]) -> Vec<StitchCommand> {
    let mut commands = Vec::with_capacity(bytes.len() / RECORD_LEN + 1);
    let (mut cur_x, mut cur_y) = (0i32, 0i32);
    let mut terminated = false;

    for record in bytes.chunks_exact(RECORD_LEN) {
        cur_x = cur_x.saturating_add(decode_delta(record[2]));
        cur_y = cur_y.saturating_add(decode_y(record[3]));
        let kind = classify_opcode(record[0]);

        trace!(opcode = record[0], x = cur_x, y = cur_y, kind = %kind, "record");
        commands.push(StitchCommand::new(kind, cur_x, cur_y).with_raw(record));

        if kind == StitchKind::PatternEnd {
            terminated = true;
            break;
        }
    }

    let consumed = commands.len() * RECORD_LEN;
    debug!(
        records = commands.len(),
        terminated,
        unread_bytes = bytes.len() - consumed,
        "decoded Format A stream"
    );

    commands.push(StitchCommand::end());
    commands
}

/// What to do with a per-axis delta larger than one record can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaPolicy {
    /// Clamp to ±127 and keep tracking the intended position. The stitched
    /// path drifts from the intended one after a clamp.
    #[default]
    Clamp,
    /// Emit intermediate `Move` records until the remainder fits.
    Split,
}

impl DeltaPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Split => "split",
        }
    }
}

impl FromStr for DeltaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "split" => Ok(Self::Split),
            other => Err(format!("expected 'clamp' or 'split', got '{other}'")),
        }
    }
}

impl std::fmt::Display for DeltaPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub oversized_delta: DeltaPolicy,
}

/// Encoded bytes plus what the encoder had to do to produce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeReport {
    pub bytes: Vec<u8>,
    /// Indices of commands whose delta was clamped.
    pub clamped: Vec<usize>,
    /// Number of extra `Move` records inserted by [`DeltaPolicy::Split`].
    pub split_records: usize,
}

impl EncodeReport {
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.clamped.is_empty()
    }
}

/// Encoder state scoped to one serialize call.
struct Encoder {
    options: EncodeOptions,
    last: (i32, i32),
    report: EncodeReport,
}

impl Encoder {
    fn new(options: EncodeOptions, capacity: usize) -> Self {
        Self {
            options,
            last: (0, 0),
            report: EncodeReport {
                bytes: Vec::with_capacity(capacity),
                ..EncodeReport::default()
            },
        }
    }

    fn push(&mut self, index: usize, cmd: &StitchCommand) {
        if cmd.kind() == StitchKind::End {
            return;
        }

        if let Some(raw) = self.replayable(cmd) {
            self.report.bytes.extend_from_slice(raw);
            self.last = cmd.position();
            return;
        }

        let mut dx = cmd.x().saturating_sub(self.last.0);
        let mut dy = cmd.y().saturating_sub(self.last.1);
        let oversized = dx.abs() > MAX_DELTA || dy.abs() > MAX_DELTA;

        if oversized {
            match self.options.oversized_delta {
                DeltaPolicy::Clamp => {
                    warn!(index, dx, dy, "delta exceeds ±{MAX_DELTA}, clamping");
                    self.report.clamped.push(index);
                }
                DeltaPolicy::Split => {
                    while dx.abs() > MAX_DELTA || dy.abs() > MAX_DELTA {
                        let (sx, sy) = (clamp_delta(dx), clamp_delta(dy));
                        self.write_record(stitch_op::MOVE, sx, sy);
                        dx -= sx;
                        dy -= sy;
                        self.report.split_records += 1;
                    }
                    debug!(index, records = self.report.split_records, "split oversized delta");
                }
            }
        }

        self.write_record(opcode_for(cmd.kind()), dx, dy);
        self.last = cmd.position();
    }

    /// Cached bytes of `cmd`, if decoding them after the previous record
    /// still lands on `cmd`'s position. Edits upstream shift that origin and
    /// force a fresh delta.
    fn replayable<'c>(&self, cmd: &'c StitchCommand) -> Option<&'c [u8]> {
        let raw = cmd.raw()?;
        let &[_, _, x, y] = raw else {
            return None;
        };
        let landing = (
            self.last.0.saturating_add(decode_delta(x)),
            self.last.1.saturating_add(decode_y(y)),
        );
        if landing == cmd.position() {
            Some(raw)
        } else {
            trace!(?landing, position = ?cmd.position(), "stale raw record, re-encoding");
            None
        }
    }

    fn write_record(&mut self, opcode: u8, dx: i32, dy: i32) {
        self.report
            .bytes
            .extend_from_slice(&[opcode, 0x00, encode_delta(dx), encode_y(dy)]);
    }
}

/// Encode commands with full reporting.
#[must_use]
pub fn encode_with_report(commands: &[StitchCommand], options: EncodeOptions) -> EncodeReport {
    let mut encoder = Encoder::new(options, commands.len() * RECORD_LEN);
    for (index, cmd) in commands.iter().enumerate() {
        encoder.push(index, cmd);
    }
    encoder.report
}

/// Encode commands with the given options.
#[must_use]
pub fn serialize_with(commands: &[StitchCommand], options: EncodeOptions) -> Vec<u8> {
    encode_with_report(commands, options).bytes
}

/// Encode commands with the default clamp policy.
#[must_use]
pub fn serialize(commands: &[StitchCommand]) -> Vec<u8> {
    serialize_with(commands, EncodeOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(commands: &[StitchCommand]) -> Vec<StitchKind> {
        commands.iter().map(StitchCommand::kind).collect()
    }

    #[test]
    fn test_decode_stitch_then_terminator() {
        let bytes = [0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00, 0x00, 0x00];
        let commands = parse(&bytes);

        assert_eq!(
            kinds(&commands),
            vec![StitchKind::Stitch, StitchKind::PatternEnd, StitchKind::End]
        );
        assert_eq!(commands[0].position(), (10, 0));
        assert_eq!(commands[1].position(), (10, 0));
        assert_eq!(commands[0].raw(), Some(&bytes[..4]));
        assert_eq!(commands[2].raw(), None);
    }

    #[test]
    fn test_decode_accumulates_deltas_with_negated_y() {
        // +5,+5 then -10,-3
        let bytes = [0x61, 0x00, 0x05, 0x85, 0x01, 0x00, 0x8a, 0x03];
        let commands = parse(&bytes);

        assert_eq!(commands[0].position(), (5, 5));
        assert_eq!(commands[1].kind(), StitchKind::Move);
        assert_eq!(commands[1].position(), (-5, 2));
    }

    #[test]
    fn test_decode_stops_at_terminator() {
        let bytes = [
            0x61, 0x00, 0x01, 0x00, 0x1f, 0x00, 0x00, 0x00, 0x61, 0x00, 0x05, 0x00,
        ];
        let commands = parse(&bytes);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands.last().map(StitchCommand::kind), Some(StitchKind::End));
    }

    #[test]
    fn test_decode_ignores_trailing_partial_record() {
        let bytes = [0x61, 0x00, 0x01, 0x00, 0x61, 0x00];
        let commands = parse(&bytes);
        assert_eq!(kinds(&commands), vec![StitchKind::Stitch, StitchKind::End]);
    }

    #[test]
    fn test_decode_empty_yields_only_sentinel() {
        assert_eq!(parse(&[]), vec![StitchCommand::end()]);
    }

    #[test]
    fn test_round_trip_unedited() {
        let bytes = [
            0x01, 0x00, 0x14, 0x94, 0x61, 0x00, 0x0a, 0x00, 0x03, 0x00, 0x81, 0x00, 0x02, 0x00,
            0x00, 0x00, 0x1f, 0x00, 0x00, 0x00,
        ];
        assert_eq!(serialize(&parse(&bytes)), bytes);
    }

    #[test]
    fn test_edited_command_is_reencoded_not_replayed() {
        let bytes = [0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00, 0x00, 0x00];
        let mut commands = parse(&bytes);
        commands[0].set_position(20, -3);

        let out = serialize(&commands);
        // Stitch re-encoded as +20,-3. The terminator still sits at (10, 0),
        // so its cached zero delta no longer fits and it carries -10,+3.
        assert_eq!(out, vec![0x61, 0x00, 0x14, 0x03, 0x1f, 0x00, 0x8a, 0x83]);
        let reparsed = parse(&out);
        assert_eq!(reparsed[0].position(), (20, -3));
        assert_eq!(reparsed[1].position(), (10, 0));
    }

    const THREE_STEPS: [u8; 16] = [
        0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00, 0x00,
        0x00,
    ];

    fn stitch_positions(commands: &[StitchCommand]) -> Vec<(i32, i32)> {
        commands
            .iter()
            .filter(|c| c.kind() == StitchKind::Stitch)
            .map(StitchCommand::position)
            .collect()
    }

    #[test]
    fn test_mid_stream_edit_rebases_following_record() {
        let mut commands = parse(&THREE_STEPS);
        commands[0].set_position(50, 0);

        let out = serialize(&commands);
        assert_eq!(stitch_positions(&parse(&out)), vec![(50, 0), (20, 0), (30, 0)]);
        // The second stitch now needs -30; the third still replays its +10.
        assert_eq!(&out[4..12], &[0x61, 0x00, 0x9e, 0x00, 0x61, 0x00, 0x0a, 0x00]);
    }

    #[test]
    fn test_removed_record_rebases_successor() {
        let mut commands = parse(&THREE_STEPS);
        commands.remove(1);

        let out = serialize(&commands);
        assert_eq!(
            out,
            vec![0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x14, 0x00, 0x1f, 0x00, 0x00, 0x00]
        );
        assert_eq!(stitch_positions(&parse(&out)), vec![(10, 0), (30, 0)]);
    }

    #[test]
    fn test_synthesized_commands_encode_deltas() {
        let commands = vec![
            StitchCommand::new(StitchKind::Move, 10, 10),
            StitchCommand::new(StitchKind::Stitch, 0, 20),
            StitchCommand::new(StitchKind::PatternEnd, 0, 20),
            StitchCommand::end(),
        ];
        let out = serialize(&commands);
        assert_eq!(
            out,
            vec![
                0x01, 0x00, 0x0a, 0x8a, // +10, +10
                0x61, 0x00, 0x8a, 0x8a, // -10, +10
                0x1f, 0x00, 0x00, 0x00,
            ]
        );
        let decoded = parse(&out);
        assert_eq!(decoded[1].position(), (0, 20));
    }

    #[test]
    fn test_clamp_policy_drifts_and_reports() {
        let commands = vec![
            StitchCommand::new(StitchKind::Move, 200, 0),
            StitchCommand::new(StitchKind::Stitch, 210, 0),
        ];
        let report = encode_with_report(&commands, EncodeOptions::default());
        assert_eq!(report.clamped, vec![0]);
        assert!(!report.is_lossless());

        let decoded = parse(&report.bytes);
        assert_eq!(decoded[0].position(), (127, 0));
        // Second delta is computed against the intended 200, not the clamped 127.
        assert_eq!(decoded[1].position(), (137, 0));
    }

    #[test]
    fn test_split_policy_preserves_geometry() {
        let commands = vec![
            StitchCommand::new(StitchKind::Move, 300, -200),
            StitchCommand::new(StitchKind::Stitch, 310, -200),
        ];
        let options = EncodeOptions {
            oversized_delta: DeltaPolicy::Split,
        };
        let report = encode_with_report(&commands, options);
        assert!(report.is_lossless());
        assert_eq!(report.split_records, 2);

        let decoded = parse(&report.bytes);
        let logical: Vec<_> = decoded
            .iter()
            .filter(|c| c.kind() == StitchKind::Stitch)
            .map(StitchCommand::position)
            .collect();
        assert_eq!(logical, vec![(310, -200)]);
        // The last split step lands exactly on the intended Move target.
        assert_eq!(decoded[2].position(), (300, -200));
        assert_eq!(decoded[2].kind(), StitchKind::Move);
    }

    #[test]
    fn test_raw_command_resets_last_position() {
        let commands = vec![
            StitchCommand::new(StitchKind::Stitch, 50, 0).with_raw(&[0x61, 0x00, 0x32, 0x00]),
            StitchCommand::new(StitchKind::Stitch, 60, 0),
        ];
        let out = serialize(&commands);
        assert_eq!(&out[4..], &[0x61, 0x00, 0x0a, 0x00]);
    }

    #[test]
    fn test_end_sentinel_writes_nothing() {
        assert!(serialize(&[StitchCommand::end(), StitchCommand::end()]).is_empty());
    }

    #[test]
    fn test_delta_policy_parse() {
        assert_eq!("Split".parse::<DeltaPolicy>(), Ok(DeltaPolicy::Split));
        assert_eq!("clamp".parse::<DeltaPolicy>(), Ok(DeltaPolicy::Clamp));
        assert!("wrap".parse::<DeltaPolicy>().is_err());
    }
}
