// src/sensor/state.rs

use core::time::Duration;

use crate::common::timing;

/// Polling state of the desk display.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DisplayState {
    /// Waiting after boot before the first M command.
    BootWait,
    /// Desk at rest. Only listens.
    Idle,
    /// Desk moving. Polls rapidly so the published height follows the movement.
    Active,
}

/// Intervals driving [`DisplayState`] transitions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PollTiming {
    pub boot_delay: Duration,
    pub idle_poll_interval: Duration,
    pub active_poll_interval: Duration,
    pub activity_timeout: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        PollTiming {
            boot_delay: timing::BOOT_DELAY,
            idle_poll_interval: timing::IDLE_POLL_INTERVAL,
            active_poll_interval: timing::ACTIVE_POLL_INTERVAL,
            activity_timeout: timing::ACTIVITY_TIMEOUT,
        }
    }
}
