// src/common/error.rs

/// Runtime error of the desk height component.
///
/// Generic over the HAL's serial error type, which only needs `Debug`.
#[derive(Debug, thiserror::Error)]
pub enum DeskError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A blocking write or flush did not complete in time.
    #[error("Operation timed out")]
    Timeout,

    /// Command frame did not fit the output buffer.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Checksum of a command frame does not match its contents.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// Frame is too short or not delimited by the start/end bytes.
    #[error("Invalid frame format")]
    InvalidFrame,
}

impl<E: core::fmt::Debug> From<E> for DeskError<E> {
    fn from(e: E) -> Self {
        DeskError::Io(e)
    }
}
