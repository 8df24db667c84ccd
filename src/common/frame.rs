// src/common/frame.rs

use heapless::Vec;

/// Start byte of frames sent by the handset, and of our own commands.
pub const START_COMMAND: u8 = 0x9B;
/// Start byte of frames broadcast by the control box.
pub const START_BROADCAST: u8 = 0x98;
/// Every frame ends with this byte.
pub const END_BYTE: u8 = 0x9D;
/// Receive buffer capacity. A frame that grows this long without completing is dropped.
pub const MAX_FRAME_LEN: usize = 32;

#[inline]
pub const fn is_start_byte(byte: u8) -> bool {
    matches!(byte, START_COMMAND | START_BROADCAST)
}

/// A complete frame, start and end bytes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(Vec<u8, MAX_FRAME_LEN>);

impl Packet {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The length byte: number of bytes following the start byte, end byte excluded.
    pub fn length(&self) -> u8 {
        self.0[1]
    }

    /// Frame type byte, absent for degenerate frames of length 1.
    pub fn kind(&self) -> Option<u8> {
        // The last byte is always the end byte, never the type.
        if self.0.len() > 3 {
            Some(self.0[2])
        } else {
            None
        }
    }

    /// Bytes between the type byte and the end byte.
    pub fn payload(&self) -> &[u8] {
        if self.0.len() > 3 {
            &self.0[3..self.0.len() - 1]
        } else {
            &[]
        }
    }
}

/// Outcome of feeding one byte to the [`FrameAssembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A frame with the right length and end byte.
    Packet(Packet),
    /// Frame reached its declared length but did not end with [`END_BYTE`].
    BadEndByte(u8),
    /// Buffer filled up before the frame completed.
    Overflow,
}

/// Reassembles frames from the raw UART byte stream.
///
/// Bytes are dropped until a start byte shows up. After the length byte, the
/// frame is complete at `length + 2` bytes. The buffer is cleared after every
/// completed, malformed or overflowing frame.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8, MAX_FRAME_LEN>,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        FrameAssembler { buffer: Vec::new() }
    }

    /// Number of bytes of the frame currently being assembled.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn push(&mut self, byte: u8) -> Option<FrameEvent> {
        if self.buffer.is_empty() {
            if is_start_byte(byte) {
                // Capacity is never zero, so this cannot fail.
                let _ = self.buffer.push(byte);
            }
            return None;
        }

        if self.buffer.push(byte).is_err() {
            self.reset();
            return Some(FrameEvent::Overflow);
        }

        let len = self.buffer.len();
        let expected = self.buffer[1] as usize + 2;
        if len == expected {
            let last = self.buffer[len - 1];
            let event = if last == END_BYTE {
                FrameEvent::Packet(Packet(self.buffer.clone()))
            } else {
                FrameEvent::BadEndByte(last)
            };
            self.reset();
            return Some(event);
        }

        if len >= MAX_FRAME_LEN {
            self.reset();
            return Some(FrameEvent::Overflow);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(assembler: &mut FrameAssembler, bytes: &[u8]) -> heapless::Vec<FrameEvent, 8> {
        let mut events = heapless::Vec::new();
        for &b in bytes {
            if let Some(ev) = assembler.push(b) {
                events.push(ev).unwrap();
            }
        }
        events
    }

    #[test]
    fn test_height_broadcast_frame() {
        let mut asm = FrameAssembler::new();
        let frame = [0x98, 0x07, 0x12, 0x06, 0xFD, 0x6D, 0x00, 0x00, 0x9D];
        let events = feed(&mut asm, &frame);
        assert_eq!(events.len(), 1);
        match &events[0] {
            FrameEvent::Packet(p) => {
                assert_eq!(p.as_bytes(), &frame);
                assert_eq!(p.length(), 7);
                assert_eq!(p.kind(), Some(0x12));
                assert_eq!(p.payload(), &[0x06, 0xFD, 0x6D, 0x00, 0x00]);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn test_leading_garbage_skipped() {
        let mut asm = FrameAssembler::new();
        let events = feed(&mut asm, &[0x00, 0x12, 0x9D, 0x9B, 0x02, 0x11, 0x9D]);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], FrameEvent::Packet(p) if p.kind() == Some(0x11)));
    }

    #[test]
    fn test_bad_end_byte_resets() {
        let mut asm = FrameAssembler::new();
        let events = feed(&mut asm, &[0x9B, 0x02, 0x11, 0x42]);
        assert_eq!(events.as_slice(), &[FrameEvent::BadEndByte(0x42)]);
        assert_eq!(asm.pending(), 0);

        // Next frame assembles normally.
        let events = feed(&mut asm, &[0x9B, 0x02, 0x11, 0x9D]);
        assert!(matches!(events.as_slice(), [FrameEvent::Packet(_)]));
    }

    #[test]
    fn test_zero_length_frame() {
        let mut asm = FrameAssembler::new();
        // Expected length is 2, so the length byte itself is the "end byte".
        let events = feed(&mut asm, &[0x98, 0x00]);
        assert_eq!(events.as_slice(), &[FrameEvent::BadEndByte(0x00)]);
    }

    #[test]
    fn test_minimal_frame_has_no_kind() {
        let mut asm = FrameAssembler::new();
        let events = feed(&mut asm, &[0x9B, 0x01, 0x9D]);
        match events.as_slice() {
            [FrameEvent::Packet(p)] => {
                assert_eq!(p.kind(), None);
                assert!(p.payload().is_empty());
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_overflow() {
        let mut asm = FrameAssembler::new();
        let mut events = heapless::Vec::<FrameEvent, 8>::new();
        // Declared length can never be reached within the buffer.
        for b in core::iter::once(0x9B).chain(core::iter::once(0xFF)).chain(core::iter::repeat(0x01).take(40)) {
            if let Some(ev) = asm.push(b) {
                events.push(ev).unwrap();
            }
        }
        assert_eq!(events.first(), Some(&FrameEvent::Overflow));
        // Bytes after the reset are not start bytes, so nothing else happens.
        assert_eq!(events.len(), 1);
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn test_frame_filling_whole_buffer() {
        let mut asm = FrameAssembler::new();
        let mut frame = [0x11u8; MAX_FRAME_LEN];
        frame[0] = 0x9B;
        frame[1] = (MAX_FRAME_LEN - 2) as u8;
        frame[MAX_FRAME_LEN - 1] = END_BYTE;
        let events = feed(&mut asm, &frame);
        assert!(matches!(events.as_slice(), [FrameEvent::Packet(p)] if p.as_bytes().len() == MAX_FRAME_LEN));
    }
}
