// src/common/segment.rs

//! 7-segment display decoding.
//!
//! The control box mirrors its display over UART, one byte per digit. Bits 0-6
//! are the segments, bit 7 is the decimal point following the digit:
//!
//! ```text
//!   _6_
//!  |   |
//!  5   1
//!  |_0_|
//!  |   |
//!  4   2
//!  |_3_|
//! ```

/// Bit set when the decimal point next to a digit is lit.
pub const DECIMAL_POINT: u8 = 0x80;
/// Mask of the seven segment bits.
pub const SEGMENT_MASK: u8 = 0x7F;

const DIGIT_PATTERNS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

const MINUS_PATTERN: u8 = 0b0100_0000;

/// What a single display position shows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Segment {
    Digit(u8),
    /// Only the middle segment; shown while the desk is resetting.
    Minus,
    /// All segments off.
    Blank,
    /// Anything else (letters of error codes, menus).
    Unknown(u8),
}

impl Segment {
    /// Decodes one display byte, ignoring the decimal point.
    pub fn decode(byte: u8) -> Segment {
        let segments = byte & SEGMENT_MASK;
        if segments == 0 {
            return Segment::Blank;
        }
        if segments == MINUS_PATTERN {
            return Segment::Minus;
        }
        match DIGIT_PATTERNS.iter().position(|&p| p == segments) {
            Some(digit) => Segment::Digit(digit as u8),
            None => Segment::Unknown(segments),
        }
    }

    pub const fn digit(&self) -> Option<u8> {
        match self {
            Segment::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

#[inline]
pub const fn has_decimal_point(byte: u8) -> bool {
    byte & DECIMAL_POINT == DECIMAL_POINT
}
