// src/common/timing.rs

use core::time::Duration;

// === Display polling ===

/// Wait after boot before the first M command, so the controller is up.
pub const BOOT_DELAY: Duration = Duration::from_millis(5000);
/// Poll period while the desk is not moving.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(5000);
/// Poll period while the desk is moving.
pub const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(330);
/// No decoded display activity for this long means the desk has stopped.
pub const ACTIVITY_TIMEOUT: Duration = Duration::from_millis(3000);

// === Byte Timing at 9600 Baud (8N1) ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte
// Time per byte = 10 / 9600 s = 1.0417 ms

/// Nominal duration of a single byte (10 bits total) at 9600 baud.
pub const BYTE_DURATION: Duration = Duration::from_micros(1042);

/// Slack added on top of the nominal transmit time of a command.
pub const WRITE_TIMEOUT_SLACK: Duration = Duration::from_millis(20);
/// Upper bound for a transmit flush.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(10);

/// Poll step used while waiting on a blocked write.
pub const IO_RETRY_DELAY_US: u32 = 100;
