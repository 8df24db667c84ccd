// src/common/native.rs

//! Glue for HALs that expose their UART through the `embedded-hal-nb` serial traits.

use super::hal_traits::{DeskSerial, DeskTimer};
use embedded_hal_nb::serial::{ErrorType, Read, Write};

/// Bundles an `embedded-hal-nb` UART with a [`DeskTimer`] into the single
/// interface the sensor component drives.
#[derive(Debug)]
pub struct NativeAdapter<U, T> {
    uart: U,
    timer: T,
}

impl<U, T> NativeAdapter<U, T> {
    pub fn new(uart: U, timer: T) -> Self {
        NativeAdapter { uart, timer }
    }

    pub fn release(self) -> (U, T) {
        (self.uart, self.timer)
    }
}

impl<U, T> DeskSerial for NativeAdapter<U, T>
where
    U: Read<u8> + Write<u8>,
{
    type Error = <U as ErrorType>::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.uart.read()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.uart.write(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.uart.flush()
    }
}

impl<U, T: DeskTimer> DeskTimer for NativeAdapter<U, T> {
    type Instant = T::Instant;

    fn now(&self) -> Self::Instant {
        self.timer.now()
    }

    fn delay_us(&mut self, us: u32) {
        self.timer.delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timer.delay_ms(ms)
    }
}
