//! Delta byte conversions for Format A records.
//!
//! A delta byte holds a magnitude in the low seven bits with 0x80 acting as a
//! sign flag, except that 0x80 itself decodes to +128. The Y axis is stored
//! negated relative to X.

/// Largest per-axis delta a single record can encode.
pub const MAX_DELTA: i32 = 127;

const SIGN_FLAG: u8 = 0x80;

/// Decode an X delta byte.
#[must_use]
pub const fn decode_delta(byte: u8) -> i32 {
    if byte > SIGN_FLAG {
        -((byte - SIGN_FLAG) as i32)
    } else {
        byte as i32
    }
}

/// Decode a Y delta byte (sign-flag decode, then negate).
#[must_use]
pub const fn decode_y(byte: u8) -> i32 {
    -decode_delta(byte)
}

/// Clamp a delta into the encodable range.
#[must_use]
pub const fn clamp_delta(value: i32) -> i32 {
    if value > MAX_DELTA {
        MAX_DELTA
    } else if value < -MAX_DELTA {
        -MAX_DELTA
    } else {
        value
    }
}

/// Encode an X delta. Out-of-range input is clamped to ±127.
#[must_use]
pub const fn encode_delta(value: i32) -> u8 {
    let v = clamp_delta(value);
    if v >= 0 {
        v as u8
    } else {
        (-v) as u8 + SIGN_FLAG
    }
}

/// Encode a Y delta, undoing the decode-side negation.
#[must_use]
pub const fn encode_y(value: i32) -> u8 {
    encode_delta(clamp_delta(value).wrapping_neg())
}
