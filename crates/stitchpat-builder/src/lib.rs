//! Pattern synthesis: stitch lines, rectangles, thread-locking backtacks and
//! QR glyphs, all bounded by a machine stitch area.

pub mod area;
pub mod pattern;
pub mod qr;

pub use area::{MachineModel, StitchArea, UNITS_PER_MM};
pub use pattern::{DEFAULT_BACKTACK_STEPS, Pattern, Point};
pub use qr::{
    EcLevel, QrOutcome, QrSettings, estimated_capacity, generate_hash_pattern, generate_qr_code,
};
