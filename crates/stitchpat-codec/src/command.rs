//! Command model shared by both record formats.
//!
//! A stream is a `Vec<PatternCommand<K>>` where `K` is one of two disjoint
//! vocabularies: [`StitchKind`] for Format A streams and [`RecordKind`] for
//! Format B streams. The vocabularies are never mixed in one stream.

use std::fmt;

use serde::{Serialize, Serializer};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Capability shared by both command vocabularies.
pub trait CommandKind:
    Copy + Eq + fmt::Debug + Into<&'static str> + IntoEnumIterator + 'static
{
    /// Whether commands of this kind carry a meaningful position.
    fn has_coordinates(self) -> bool;

    /// Upper-case name used in CSV export and reports.
    fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Format A command types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StitchKind {
    Stitch,
    Move,
    ColorChange,
    Backtack,
    PatternEnd,
    /// Synthetic end-of-stream sentinel; never written to disk.
    End,
}

impl CommandKind for StitchKind {
    fn has_coordinates(self) -> bool {
        matches!(self, Self::Stitch | Self::Move | Self::Backtack)
    }
}

/// Format B record types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Point,
    LinearMove,
    Speed,
    Function,
    Separator,
    Circular,
    Arc,
    Curve,
    Unknown,
}

impl CommandKind for RecordKind {
    fn has_coordinates(self) -> bool {
        matches!(self, Self::Point | Self::LinearMove | Self::Circular)
    }
}

/// Machine-level action named by a Format B `Function` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionCode {
    ThreadTrimming,
    Feed,
    Halt,
    ReverseRotation,
    SecondHomePosition,
    Basting,
    EndData,
}

impl FunctionCode {
    /// Look up a little-endian code read from a `Function` record.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0002 => Some(Self::ThreadTrimming),
            0x0003 => Some(Self::Feed),
            0x0004 => Some(Self::Halt),
            0x0005 => Some(Self::ReverseRotation),
            0x0006 => Some(Self::SecondHomePosition),
            0x0007 => Some(Self::Basting),
            0x0031 => Some(Self::EndData),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::ThreadTrimming => 0x0002,
            Self::Feed => 0x0003,
            Self::Halt => 0x0004,
            Self::ReverseRotation => 0x0005,
            Self::SecondHomePosition => 0x0006,
            Self::Basting => 0x0007,
            Self::EndData => 0x0031,
        }
    }

    /// Human-readable title, e.g. "Thread Trimming".
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ThreadTrimming => "Thread Trimming",
            Self::Feed => "Feed",
            Self::Halt => "Halt",
            Self::ReverseRotation => "Reverse Rotation",
            Self::SecondHomePosition => "Second Home Position",
            Self::Basting => "Basting",
            Self::EndData => "End Data",
        }
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One decoded or synthesized unit of motion or control.
///
/// `raw` caches the exact bytes the command was decoded from. Serialization
/// re-emits the cache verbatim when present; every setter that changes the
/// kind or position clears it so an edited command is re-encoded from its
/// logical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCommand<K> {
    kind: K,
    x: i32,
    y: i32,
    #[serde(serialize_with = "serialize_hex")]
    raw: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_code: Option<FunctionCode>,
}

/// A Format A command.
pub type StitchCommand = PatternCommand<StitchKind>;

/// A Format B record.
pub type RecordCommand = PatternCommand<RecordKind>;

impl<K: CommandKind> PatternCommand<K> {
    /// A synthesized command with no cached encoding.
    #[must_use]
    pub fn new(kind: K, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            raw: None,
            parameters: Vec::new(),
            function_code: None,
        }
    }

    /// Attach the bytes this command was decoded from.
    #[must_use]
    pub fn with_raw(mut self, raw: &[u8]) -> Self {
        self.raw = Some(raw.to_vec());
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: &[u8]) -> Self {
        self.parameters = parameters.to_vec();
        self
    }

    #[must_use]
    pub fn with_function_code(mut self, code: Option<FunctionCode>) -> Self {
        self.function_code = code;
        self
    }

    #[must_use]
    pub fn kind(&self) -> K {
        self.kind
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    #[must_use]
    pub fn parameters(&self) -> &[u8] {
        &self.parameters
    }

    #[must_use]
    pub fn function_code(&self) -> Option<FunctionCode> {
        self.function_code
    }

    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.kind.has_coordinates()
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.invalidate_raw();
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
        self.invalidate_raw();
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
        self.invalidate_raw();
    }

    pub fn set_kind(&mut self, kind: K) {
        self.kind = kind;
        self.invalidate_raw();
    }

    /// Shift the command by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.set_position(self.x.saturating_add(dx), self.y.saturating_add(dy));
    }

    /// Drop the cached encoding.
    pub fn invalidate_raw(&mut self) {
        self.raw = None;
    }

    /// Raw bytes as lowercase hex, empty when nothing is cached.
    #[must_use]
    pub fn raw_hex(&self) -> String {
        self.raw.as_deref().map(to_hex).unwrap_or_default()
    }
}

impl StitchCommand {
    /// The synthetic `End` sentinel appended after every decoded stream.
    #[must_use]
    pub fn end() -> Self {
        Self::new(StitchKind::End, 0, 0)
    }
}

impl RecordCommand {
    /// Function title for `Function` records.
    ///
    /// Returns the table title when the code is known, "Unknown Function XXXX"
    /// when the record carries at least two parameter bytes that match no
    /// entry, and `None` for every other record.
    #[must_use]
    pub fn function_name(&self) -> Option<String> {
        if let Some(code) = self.function_code {
            return Some(code.title().to_string());
        }
        if self.kind != RecordKind::Function {
            return None;
        }
        match self.parameters.as_slice() {
            [lo, hi, ..] => {
                let code = u16::from_le_bytes([*lo, *hi]);
                Some(match FunctionCode::from_code(code) {
                    Some(known) => known.title().to_string(),
                    None => format!("Unknown Function {code:04X}"),
                })
            }
            _ => None,
        }
    }
}

impl<K: CommandKind> fmt::Display for PatternCommand<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind.as_str();
        if self.has_coordinates() {
            write!(f, "{name} ({}, {})", self.x, self.y)
        } else if !self.parameters.is_empty() {
            write!(f, "{name} {:?}", self.parameters)
        } else {
            f.write_str(name)
        }
    }
}

/// Lowercase hex rendering of a byte slice.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn serialize_hex<S: Serializer>(raw: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match raw {
        Some(bytes) => serializer.serialize_some(&to_hex(bytes)),
        None => serializer.serialize_none(),
    }
}
