// src/common/command.rs

//! Commands sent to the desk controller.
//!
//! A command frame is `START_COMMAND len type key_lo key_hi crc_hi crc_lo END`,
//! where `len` counts every byte between the length byte and the end byte,
//! inclusive of the length byte itself and the checksum.

use super::crc::{calculate_crc16, encode_crc};
use super::error::DeskError;
use super::frame::{END_BYTE, START_COMMAND};

/// Frame type byte for a key press sent from the handset side.
pub const KEY_PRESS_TYPE: u8 = 0x02;

/// Size of a framed key-press command.
pub const COMMAND_FRAME_LEN: usize = 8;

/// A command understood by the desk controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    /// The "M" key. Wakes the display, which then broadcasts the current height
    /// without moving the desk.
    WakeDisplay,
}

impl Command {
    /// Two-byte key code carried in the frame body, low byte first.
    pub const fn key_code(&self) -> [u8; 2] {
        match self {
            Command::WakeDisplay => [0x20, 0x00],
        }
    }

    /// Builds the complete frame for this command.
    pub fn frame(&self) -> [u8; COMMAND_FRAME_LEN] {
        let [key_lo, key_hi] = self.key_code();
        // Length covers len, type, key(2), crc(2).
        let len = (COMMAND_FRAME_LEN - 2) as u8;
        let body = [len, KEY_PRESS_TYPE, key_lo, key_hi];
        let [crc_hi, crc_lo] = encode_crc(calculate_crc16(&body));
        [START_COMMAND, len, KEY_PRESS_TYPE, key_lo, key_hi, crc_hi, crc_lo, END_BYTE]
    }

    /// Writes the frame into `buffer`, returning the written part.
    pub fn format_into<'a, E: core::fmt::Debug>(
        &self,
        buffer: &'a mut [u8],
    ) -> Result<&'a [u8], DeskError<E>> {
        if buffer.len() < COMMAND_FRAME_LEN {
            return Err(DeskError::BufferOverflow { needed: COMMAND_FRAME_LEN, got: buffer.len() });
        }
        buffer[..COMMAND_FRAME_LEN].copy_from_slice(&self.frame());
        Ok(&buffer[..COMMAND_FRAME_LEN])
    }
}

/// Pre-built wake frame, as captured from the handset.
pub const WAKE_DISPLAY_FRAME: [u8; COMMAND_FRAME_LEN] = [0x9B, 0x06, 0x02, 0x20, 0x00, 0xAC, 0xB8, 0x9D];
