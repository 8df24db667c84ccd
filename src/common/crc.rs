// src/common/crc.rs

use super::error::DeskError;
use crc::{Crc, CRC_16_MODBUS};

// The desk controller checksums command frames with CRC-16/MODBUS
// (poly 0x8005 reflected, init 0xFFFF, no final XOR).
const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Calculates the CRC-16/MODBUS of `data`.
///
/// For a command frame `data` runs from the length byte up to the byte before
/// the checksum, i.e. the start byte is excluded.
#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a checksum the way the controller expects it on the wire: high byte first.
pub fn encode_crc(crc_value: u16) -> [u8; 2] {
    crc_value.to_be_bytes()
}

/// Decodes two wire bytes (high byte first) into a checksum.
///
/// # Panics
///
/// Panics if `crc_bytes` does not have a length of exactly 2.
pub fn decode_crc(crc_bytes: &[u8]) -> u16 {
    assert_eq!(crc_bytes.len(), 2, "CRC must be 2 bytes long");
    u16::from_be_bytes([crc_bytes[0], crc_bytes[1]])
}

/// Verifies the checksum of a framed command.
///
/// Expects the full frame: start byte, length, body, 2 checksum bytes, end byte.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(DeskError::InvalidFrame)` if the frame is too short to carry a checksum.
/// * `Err(DeskError::CrcMismatch)` if the CRCs don't match.
pub fn verify_frame_crc<E>(frame: &[u8]) -> Result<(), DeskError<E>>
where
    E: core::fmt::Debug,
{
    // start + len + crc(2) + end
    if frame.len() < 5 {
        return Err(DeskError::InvalidFrame);
    }
    let crc_start = frame.len() - 3;
    let covered = &frame[1..crc_start];
    let received = decode_crc(&frame[crc_start..crc_start + 2]);
    let calculated = calculate_crc16(covered);

    if calculated == received {
        Ok(())
    } else {
        Err(DeskError::CrcMismatch { expected: received, calculated })
    }
}
