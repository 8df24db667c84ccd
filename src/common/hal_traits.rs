// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time as reported by a [`DeskTimer`].
///
/// Only differences matter; the epoch is whatever the platform uses (boot, usually).
pub trait DeskInstant: Copy + Ord + Debug + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> DeskInstant for T where
    T: Copy + Ord + Debug + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

/// Abstraction for the monotonic clock and delays the component relies on.
pub trait DeskTimer {
    type Instant: DeskInstant;

    /// Current monotonic time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

/// Non-blocking access to the UART connected to the desk controller.
pub trait DeskSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when nothing is buffered, which is how
    /// the component knows it has drained the line for this loop iteration.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to queue a single byte for transmission.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}
