// src/common/message.rs

use core::fmt;

use super::frame::Packet;
use super::segment::{has_decimal_point, Segment};

/// Frame type of the display mirror broadcast.
pub const DISPLAY_TYPE: u8 = 0x12;
/// Frame type of the control box heartbeat.
pub const HEARTBEAT_TYPE: u8 = 0x11;
/// Length byte of a display broadcast (three digits plus two status bytes).
pub const DISPLAY_LENGTH: u8 = 7;

/// Desk height in centimetres.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Height(f32);

impl Height {
    pub fn from_cm(cm: f32) -> Self {
        Self(cm)
    }

    pub fn as_cm(&self) -> f32 {
        self.0
    }

    /// Only positive heights are ever published.
    pub fn is_valid(&self) -> bool {
        self.0 > 0.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} cm", self.0)
    }
}

/// What the display showed in a display broadcast.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DisplayReading {
    /// A height, in whole or tenths of centimetres.
    Height(Height),
    /// All three positions dark: the display is just waking up.
    Waking,
    /// Letters, menus or stray blanks; not a height.
    NonHeight([Segment; 3]),
    /// A minus sign is shown while the desk runs its reset routine.
    Resetting,
    /// Shows `000`.
    Zero,
}

impl DisplayReading {
    /// Decodes the three digit bytes of a display broadcast, most significant first.
    pub fn decode(digits: [u8; 3]) -> DisplayReading {
        let mut segments = digits.map(Segment::decode);

        if segments.iter().all(|s| *s == Segment::Blank) {
            return DisplayReading::Waking;
        }

        // Heights under 100 cm leave the hundreds position dark.
        if segments[0] == Segment::Blank {
            segments[0] = Segment::Digit(0);
        }

        if segments.iter().any(|s| matches!(s, Segment::Blank | Segment::Unknown(_))) {
            return DisplayReading::NonHeight(segments);
        }

        if segments.contains(&Segment::Minus) {
            return DisplayReading::Resetting;
        }

        // Only digits are left at this point.
        let [d1, d2, d3] = segments.map(|s| s.digit().unwrap_or_default());

        if d1 == 0 && d2 == 0 && d3 == 0 {
            return DisplayReading::Zero;
        }

        let raw = u16::from(d1) * 100 + u16::from(d2) * 10 + u16::from(d3);
        // The decimal point after the tens digit shifts everything one place.
        let cm = if has_decimal_point(digits[1]) {
            f32::from(raw) / 10.0
        } else {
            f32::from(raw)
        };
        DisplayReading::Height(Height(cm))
    }

    /// Whether the display showed anything at all. Used to detect a moving desk.
    pub fn is_activity(&self) -> bool {
        !matches!(self, DisplayReading::Waking)
    }
}

/// A decoded frame from the control box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Message {
    Display(DisplayReading),
    Heartbeat,
    Unknown { kind: Option<u8>, length: u8 },
}

impl Message {
    pub fn parse(packet: &Packet) -> Message {
        let length = packet.length();
        match packet.kind() {
            Some(DISPLAY_TYPE) if length == DISPLAY_LENGTH => {
                let payload = packet.payload();
                Message::Display(DisplayReading::decode([payload[0], payload[1], payload[2]]))
            }
            Some(HEARTBEAT_TYPE) => Message::Heartbeat,
            kind => Message::Unknown { kind, length },
        }
    }
}
