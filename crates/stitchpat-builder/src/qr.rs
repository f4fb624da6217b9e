//! QR codes and hash glyphs rendered as stitched module blocks.
//!
//! Real-QR mode encodes text with the `qrcode` crate, picks the largest
//! version 1..=10 that fits the stitch area, and stitches one small
//! rectangle per dark module. Hash mode is decorative: an 8×8 grid derived
//! from a BLAKE3 digest, not a decodable code.

use std::fmt;
use std::str::FromStr;

use qrcode::{Color, QrCode, Version};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::pattern::{Pattern, Point};

/// Highest QR version considered by the fitting search.
pub const MAX_VERSION: i16 = 10;

/// Fraction of the numeric capacity assumed usable for mixed text.
const CAPACITY_RATIO: f64 = 0.6;

/// Numeric-mode capacity per version (rows) and level L, M, Q, H (columns).
const CAPACITY_TABLE: [[u32; 4]; 10] = [
    [41, 34, 27, 17],
    [77, 63, 48, 34],
    [127, 101, 77, 58],
    [187, 149, 111, 82],
    [255, 202, 144, 106],
    [322, 255, 178, 139],
    [370, 293, 207, 154],
    [461, 365, 259, 202],
    [552, 432, 312, 235],
    [652, 513, 364, 288],
];

const HASH_GRID: usize = 8;
const HASH_THRESHOLD: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }

    const fn column(self) -> usize {
        match self {
            Self::L => 0,
            Self::M => 1,
            Self::Q => 2,
            Self::H => 3,
        }
    }

    const fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            Self::L => qrcode::EcLevel::L,
            Self::M => qrcode::EcLevel::M,
            Self::Q => qrcode::EcLevel::Q,
            Self::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("invalid error correction level '{wanted}' (expected L, M, Q or H)")
            })
    }
}

/// Approximate character capacity for `version` at `level`.
///
/// Versions outside 1..=10 report 0.
#[must_use]
pub fn estimated_capacity(version: i16, level: EcLevel) -> usize {
    usize::try_from(version - 1)
        .ok()
        .and_then(|row| CAPACITY_TABLE.get(row))
        .map_or(0, |row| (f64::from(row[level.column()]) * CAPACITY_RATIO) as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QrSettings {
    /// Side of one module in machine units.
    pub module_size: i32,
    pub stitch_spacing: f64,
    pub ec_level: EcLevel,
    /// Units reserved around the code when budgeting modules.
    pub margin: i32,
    /// Light modules on each side of the matrix.
    pub quiet_zone: i32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            module_size: 8,
            stitch_spacing: 10.0,
            ec_level: EcLevel::M,
            margin: 20,
            quiet_zone: 4,
        }
    }
}

/// Result of a QR request. Rejections are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrOutcome {
    pub success: bool,
    pub message: String,
    /// Approximate character capacity, 0 on rejection.
    pub capacity: usize,
}

impl QrOutcome {
    fn rejected(message: String) -> Self {
        info!(%message, "QR code rejected");
        Self {
            success: false,
            message,
            capacity: 0,
        }
    }
}

/// Stitch `text` as a real QR code centred on `center`.
///
/// Nothing is appended to `pattern` unless the outcome is a success.
pub fn generate_qr_code(
    pattern: &mut Pattern,
    text: &str,
    center: Point,
    settings: &QrSettings,
) -> QrOutcome {
    let module = settings.module_size;
    if module <= 0 {
        return QrOutcome::rejected(format!("Invalid module size: {module}"));
    }

    let area = pattern.area();
    let budget = area.width.min(area.height).saturating_sub(settings.margin);
    let max_modules = usize::try_from(budget / module).unwrap_or(0);
    let ec = settings.ec_level.to_qrcode();

    let mut fitted = None;
    for v in 1..=MAX_VERSION {
        match QrCode::with_version(text.as_bytes(), Version::Normal(v), ec) {
            Ok(code) if code.width() <= max_modules => fitted = Some(code),
            _ => break,
        }
    }

    let code = match fitted {
        Some(code) => code,
        None => match QrCode::with_error_correction_level(text.as_bytes(), ec) {
            Ok(code) if code.width() > max_modules => {
                let n = code.width();
                return QrOutcome::rejected(format!(
                    "QR code too large: {n}x{n} modules, max {max_modules}x{max_modules}"
                ));
            }
            Ok(code) => code,
            Err(e) => return QrOutcome::rejected(format!("Error generating QR code: {e}")),
        },
    };

    let width = code.width();
    let quiet = settings.quiet_zone.max(0);
    // Footprint math runs in i64 so oversized settings reject instead of wrapping.
    let qr_size = (width as i64).saturating_add(2 * i64::from(quiet));
    let total = qr_size.saturating_mul(i64::from(module));
    let half = total / 2;
    let (cx, cy) = (i64::from(center.0), i64::from(center.1));
    let (hw, hh) = (i64::from(area.half_width()), i64::from(area.half_height()));

    let start = if [cx - half, cx + half].iter().any(|x| x.abs() > hw)
        || [cy - half, cy + half].iter().any(|y| y.abs() > hh)
    {
        None
    } else {
        i32::try_from(cx - total / 2)
            .ok()
            .zip(i32::try_from(cy - total / 2).ok())
    };
    let Some(start) = start else {
        return QrOutcome::rejected(format!(
            "QR code extends beyond {}x{}mm stitch area",
            area.width_mm(),
            area.height_mm()
        ));
    };

    let block = (module - 2).max(4);
    let mut dark = 0usize;

    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let row = (index / width) as i32 + quiet;
        let col = (index % width) as i32 + quiet;
        let x = start.0 + col * module + module / 2;
        let y = start.1 + row * module + module / 2;
        pattern.add_rectangle_stitches((x, y), block, block, settings.stitch_spacing);
        dark += 1;
    }

    let version = match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    };
    let capacity = estimated_capacity(version, settings.ec_level);
    let message = format!(
        "QR Code v{version} ({qr_size}x{qr_size}), {dark} modules, ~{capacity} chars capacity"
    );
    info!(version, dark, capacity, commands = pattern.len(), "QR code generated");

    QrOutcome {
        success: true,
        message,
        capacity,
    }
}

/// Stitch a decorative 8×8 hash glyph of `text`, framed by one empty cell.
///
/// Returns the side of the full 10×10 grid in machine units.
pub fn generate_hash_pattern(
    pattern: &mut Pattern,
    text: &str,
    center: Point,
    module_size: i32,
    stitch_spacing: f64,
) -> i32 {
    let digest = blake3::hash(text.as_bytes()).to_hex();
    let digits: Vec<u32> = digest.chars().filter_map(|c| c.to_digit(16)).collect();

    let framed = HASH_GRID as i32 + 2;
    let total = framed.saturating_mul(module_size);
    let start = (
        center.0.saturating_sub(total.div_euclid(2)),
        center.1.saturating_sub(total.div_euclid(2)),
    );
    let block = module_size.saturating_sub(2);
    // Centre of grid cell `k` along one axis, skipping the frame cell.
    let cell = |origin: i32, k: usize| {
        origin
            .saturating_add((k as i32 + 1).saturating_mul(module_size))
            .saturating_add(module_size / 2)
    };
    let mut filled = 0usize;

    for i in 0..HASH_GRID {
        for j in 0..HASH_GRID {
            let digit = digits[(i * HASH_GRID + j) % digits.len()];
            if digit <= HASH_THRESHOLD {
                continue;
            }
            let (x, y) = (cell(start.0, j), cell(start.1, i));
            pattern.add_rectangle_stitches((x, y), block, block, stitch_spacing);
            filled += 1;
        }
    }

    debug!(filled, total, "hash pattern generated");
    total
}
