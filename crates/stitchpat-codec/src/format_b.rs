//! Format B: variable-length records dispatched on the first byte.
//!
//! This interpretation is experimental and decode-only. Coordinates are
//! literal absolute values, not deltas, and there is no terminator opcode.

use serde::Serialize;
use tracing::{debug, warn};

use crate::PatternDecoder;
use crate::classify::{RecordLayout, record_shape};
use crate::command::{FunctionCode, RecordCommand, RecordKind};

/// Format B decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatB;

impl PatternDecoder for FormatB {
    type Kind = RecordKind;

    fn decode(&self, bytes: &[u8]) -> Vec<RecordCommand> {
        parse_records(bytes)
    }
}

fn u16_le(lo: u8, hi: u8) -> i32 {
    i32::from(u16::from_le_bytes([lo, hi]))
}

/// Decode a Format B byte stream.
///
/// Unknown opcodes become one-byte `Unknown` records. A record that would
/// read past the end of the buffer ends decoding without being emitted.
#[must_use]
pub fn parse_records(bytes: &[u8]) -> Vec<RecordCommand> {
    let mut records = Vec::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let shape = record_shape(bytes[cursor]);
        let Some(record) = bytes.get(cursor..cursor + shape.len) else {
            warn!(
                offset = cursor,
                needed = shape.len,
                available = bytes.len() - cursor,
                "truncated Format B record, stopping"
            );
            break;
        };

        let cmd = match shape.layout {
            RecordLayout::WideXy => RecordCommand::new(
                shape.kind,
                u16_le(record[1], record[2]),
                u16_le(record[3], record[4]),
            ),
            RecordLayout::NarrowXy => RecordCommand::new(
                shape.kind,
                i32::from(record[1]),
                u16_le(record[2], record[3]),
            ),
            RecordLayout::Params => {
                let params = &record[1..4];
                let mut cmd = RecordCommand::new(shape.kind, 0, 0).with_parameters(params);
                if shape.kind == RecordKind::Function {
                    let code = u16::from_le_bytes([params[0], params[1]]);
                    cmd = cmd.with_function_code(FunctionCode::from_code(code));
                }
                cmd
            }
            RecordLayout::Single => {
                RecordCommand::new(RecordKind::Unknown, 0, 0).with_parameters(record)
            }
        };

        records.push(cmd.with_raw(record));
        cursor += shape.len;
    }

    debug!(records = records.len(), consumed = cursor, "decoded Format B stream");
    records
}

/// Motion summary of a Format B stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordAnalysis {
    pub total_records: usize,
    pub point_records: usize,
    /// `LinearMove` and `Circular` records.
    pub movement_records: usize,
    pub speed_changes: usize,
    pub function_calls: usize,
    /// Distinct function titles in first-seen order.
    pub function_names: Vec<String>,
    pub x_range: (i32, i32),
    pub y_range: (i32, i32),
    /// Distance travelled through every coordinate record, starting at the origin.
    pub travel_length: f64,
}

/// Summarise a decoded Format B stream.
#[must_use]
pub fn record_analysis(records: &[RecordCommand]) -> RecordAnalysis {
    let mut analysis = RecordAnalysis {
        total_records: records.len(),
        ..RecordAnalysis::default()
    };
    let mut prev = (0i32, 0i32);
    let mut range: Option<((i32, i32), (i32, i32))> = None;

    for record in records {
        match record.kind() {
            RecordKind::Point => analysis.point_records += 1,
            RecordKind::LinearMove | RecordKind::Circular => analysis.movement_records += 1,
            RecordKind::Speed => analysis.speed_changes += 1,
            RecordKind::Function => {
                analysis.function_calls += 1;
                if let Some(name) = record.function_name()
                    && !analysis.function_names.contains(&name)
                {
                    analysis.function_names.push(name);
                }
            }
            _ => {}
        }

        if record.has_coordinates() {
            let (x, y) = record.position();
            analysis.travel_length += f64::from(x - prev.0).hypot(f64::from(y - prev.1));
            prev = (x, y);
            range = Some(match range {
                None => ((x, x), (y, y)),
                Some(((x0, x1), (y0, y1))) => ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y))),
            });
        }
    }

    if let Some((x_range, y_range)) = range {
        analysis.x_range = x_range;
        analysis.y_range = y_range;
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_move_reads_two_u16() {
        let records = parse_records(&[0x03, 0x34, 0x12, 0x02, 0x01]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), RecordKind::LinearMove);
        assert_eq!(records[0].position(), (0x1234, 0x0102));
        assert_eq!(records[0].raw(), Some(&[0x03, 0x34, 0x12, 0x02, 0x01][..]));
    }

    #[test]
    fn test_point_and_circular_share_shape() {
        let records = parse_records(&[0x61, 0x10, 0x20, 0x01, 0xE1, 0x05, 0x00, 0x01]);
        assert_eq!(records[0].kind(), RecordKind::Point);
        assert_eq!(records[0].position(), (0x10, 0x0120));
        assert_eq!(records[1].kind(), RecordKind::Circular);
        assert_eq!(records[1].position(), (5, 0x0100));
    }

    #[test]
    fn test_parameter_records() {
        let records = parse_records(&[0x82, 1, 2, 3, 0x83, 4, 5, 6, 0x02, 7, 8, 9, 0x01, 0, 0, 0]);
        let kinds: Vec<_> = records.iter().map(RecordCommand::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Arc,
                RecordKind::Curve,
                RecordKind::Speed,
                RecordKind::Separator
            ]
        );
        assert_eq!(records[2].parameters(), &[7, 8, 9]);
        assert_eq!(records[0].position(), (0, 0));
    }

    #[test]
    fn test_function_code_decoding() {
        let records = parse_records(&[
            0x1F, 0x02, 0x00, 0x00, 0x1F, 0x31, 0x00, 0x09, 0x1F, 0x09, 0x00, 0x00,
        ]);
        assert_eq!(records[0].function_code(), Some(FunctionCode::ThreadTrimming));
        assert_eq!(records[1].function_code(), Some(FunctionCode::EndData));
        assert_eq!(records[2].function_code(), None);
        assert_eq!(records[2].parameters(), &[0x09, 0x00, 0x00]);
        assert_eq!(records[2].function_name().as_deref(), Some("Unknown Function 0009"));
    }

    #[test]
    fn test_unknown_byte_resyncs_one_byte() {
        let records = parse_records(&[0x55, 0x61, 0x01, 0x02, 0x00]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind(), RecordKind::Unknown);
        assert_eq!(records[0].parameters(), &[0x55]);
        assert_eq!(records[0].raw(), Some(&[0x55][..]));
        assert_eq!(records[1].kind(), RecordKind::Point);
        assert_eq!(records[1].position(), (1, 2));
    }

    #[test]
    fn test_truncated_record_stops_silently() {
        let records = parse_records(&[0x61, 0x01, 0x02, 0x00, 0x03, 0x01, 0x02]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), RecordKind::Point);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_records(&[]).is_empty());
    }

    #[test]
    fn test_record_analysis() {
        let records = parse_records(&[
            0x61, 3, 4, 0, // point (3,4)
            0x03, 3, 0, 0, 0, // linear move (3,0)
            0x02, 1, 0, 0, // speed
            0x1F, 0x03, 0x00, 0x00, // feed
            0x1F, 0x03, 0x00, 0x00, // feed again
            0x99, // unknown
        ]);
        let analysis = record_analysis(&records);

        assert_eq!(analysis.total_records, 6);
        assert_eq!(analysis.point_records, 1);
        assert_eq!(analysis.movement_records, 1);
        assert_eq!(analysis.speed_changes, 1);
        assert_eq!(analysis.function_calls, 2);
        assert_eq!(analysis.function_names, vec!["Feed".to_string()]);
        assert_eq!(analysis.x_range, (3, 3));
        assert_eq!(analysis.y_range, (0, 4));
        assert!((analysis.travel_length - 9.0).abs() < 1e-9);
    }
}
