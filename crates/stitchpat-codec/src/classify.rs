//! Opcode tables for both record formats.
//!
//! The two tables disagree on overlapping opcodes (0x03 is a backtack in
//! Format A and a 5-byte linear move in Format B) and must stay separate.

use crate::command::{RecordKind, StitchKind};

/// Format A opcodes written by the encoder.
pub mod stitch_op {
    pub const STITCH: u8 = 0x61;
    pub const MOVE: u8 = 0x01;
    pub const COLOR_CHANGE: u8 = 0x02;
    pub const BACKTACK: u8 = 0x03;
    pub const PATTERN_END: u8 = 0x1F;
}

/// Format B opcodes with a fixed record shape.
pub mod record_op {
    pub const SEPARATOR: u8 = 0x01;
    pub const SPEED: u8 = 0x02;
    pub const LINEAR_MOVE: u8 = 0x03;
    pub const FUNCTION: u8 = 0x1F;
    pub const POINT: u8 = 0x61;
    pub const ARC: u8 = 0x82;
    pub const CURVE: u8 = 0x83;
    pub const CIRCULAR: u8 = 0xE1;
}

/// Classify a Format A opcode. Total over every byte value.
#[must_use]
pub const fn classify_opcode(opcode: u8) -> StitchKind {
    match opcode {
        stitch_op::STITCH => StitchKind::Stitch,
        stitch_op::PATTERN_END => StitchKind::PatternEnd,
        stitch_op::BACKTACK => StitchKind::Backtack,
        op if op & 0x01 != 0 => StitchKind::Move,
        _ => StitchKind::ColorChange,
    }
}

/// Opcode written for a synthesized Format A command.
///
/// `End` never reaches the encoder; it maps to a move like any other
/// unrecognised kind.
#[must_use]
pub const fn opcode_for(kind: StitchKind) -> u8 {
    match kind {
        StitchKind::Stitch => stitch_op::STITCH,
        StitchKind::Move | StitchKind::End => stitch_op::MOVE,
        StitchKind::ColorChange => stitch_op::COLOR_CHANGE,
        StitchKind::Backtack => stitch_op::BACKTACK,
        StitchKind::PatternEnd => stitch_op::PATTERN_END,
    }
}

/// Field layout of a Format B record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `x: u16le @1, y: u16le @3`
    WideXy,
    /// `x: u8 @1, y: u16le @2`
    NarrowXy,
    /// three raw parameter bytes at 1..4
    Params,
    /// the opcode byte alone, kept as the single parameter
    Single,
}

/// Dispatch entry for one Format B opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    pub kind: RecordKind,
    pub len: usize,
    pub layout: RecordLayout,
}

impl RecordShape {
    const fn new(kind: RecordKind, len: usize, layout: RecordLayout) -> Self {
        Self { kind, len, layout }
    }
}

/// Look up the record shape for a Format B opcode.
#[must_use]
pub const fn record_shape(opcode: u8) -> RecordShape {
    use RecordLayout::*;

    match opcode {
        record_op::LINEAR_MOVE => RecordShape::new(RecordKind::LinearMove, 5, WideXy),
        record_op::POINT => RecordShape::new(RecordKind::Point, 4, NarrowXy),
        record_op::CIRCULAR => RecordShape::new(RecordKind::Circular, 4, NarrowXy),
        record_op::ARC => RecordShape::new(RecordKind::Arc, 4, Params),
        record_op::CURVE => RecordShape::new(RecordKind::Curve, 4, Params),
        record_op::SPEED => RecordShape::new(RecordKind::Speed, 4, Params),
        record_op::FUNCTION => RecordShape::new(RecordKind::Function, 4, Params),
        record_op::SEPARATOR => RecordShape::new(RecordKind::Separator, 4, Params),
        _ => RecordShape::new(RecordKind::Unknown, 1, Single),
    }
}
