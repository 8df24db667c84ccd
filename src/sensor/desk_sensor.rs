// src/sensor/desk_sensor.rs

use core::fmt::Debug;
use core::time::Duration;

use log::{debug, info, trace, warn};
use nb::Result as NbResult;

use super::sink::HeightSink;
use super::state::{DisplayState, PollTiming};
use crate::common::{
    command::{Command, COMMAND_FRAME_LEN},
    error::DeskError,
    frame::{FrameAssembler, FrameEvent},
    hal_traits::{DeskSerial, DeskTimer},
    message::{DisplayReading, Height, Message},
    timing,
};

const TAG: &str = "desk_height";

/// Setup priorities understood by the host scheduler. Higher runs earlier.
pub mod setup_priority {
    /// Sensors and other data sources, set up after buses.
    pub const DATA: f32 = 600.0;
}

/// The desk height sensor component.
///
/// Listens to the display mirror broadcast by the desk control box, decodes
/// the shown height and publishes it whenever it changes. The display only
/// talks while it is lit, so the component sends the M command once after
/// boot and keeps sending it while the desk is moving.
#[derive(Debug)]
pub struct DeskHeightSensor<IF, S>
where
    IF: DeskSerial + DeskTimer,
    IF::Error: Debug,
    S: HeightSink,
{
    interface: IF,
    sink: S,
    timing: PollTiming,
    assembler: FrameAssembler,
    state: DisplayState,
    boot_time: Option<IF::Instant>,
    last_poll_time: Option<IF::Instant>,
    last_activity_time: Option<IF::Instant>,
    current_height: Option<Height>,
    last_published: Option<Height>,
    /// Frame interrupted mid-write and the number of bytes already sent.
    tx_pending: Option<([u8; COMMAND_FRAME_LEN], usize)>,
}

impl<IF, S> DeskHeightSensor<IF, S>
where
    IF: DeskSerial + DeskTimer,
    IF::Error: Debug,
    S: HeightSink,
{
    pub fn new(interface: IF, sink: S) -> Self {
        Self::with_timing(interface, sink, PollTiming::default())
    }

    pub fn with_timing(interface: IF, sink: S, timing: PollTiming) -> Self {
        DeskHeightSensor {
            interface,
            sink,
            timing,
            assembler: FrameAssembler::new(),
            state: DisplayState::BootWait,
            boot_time: None,
            last_poll_time: None,
            last_activity_time: None,
            current_height: None,
            last_published: None,
            tx_pending: None,
        }
    }

    // --- Component lifecycle ---

    pub fn setup(&mut self) {
        info!(target: TAG, "Setting up Desk Height Sensor...");
        self.boot_time = Some(self.interface.now());
        self.state = DisplayState::BootWait;
    }

    pub fn setup_priority(&self) -> f32 {
        setup_priority::DATA
    }

    pub fn dump_config(&self) {
        info!(target: TAG, "Desk Height Sensor:");
        info!(target: TAG, "  Boot delay: {} ms", self.timing.boot_delay.as_millis());
        info!(target: TAG, "  Idle poll interval: {} ms", self.timing.idle_poll_interval.as_millis());
        info!(target: TAG, "  Active poll interval: {} ms", self.timing.active_poll_interval.as_millis());
        info!(target: TAG, "  Activity timeout: {} ms", self.timing.activity_timeout.as_millis());
    }

    /// One iteration of the component loop: drain the UART, then advance the
    /// polling state machine.
    pub fn loop_once(&mut self) -> Result<(), DeskError<IF::Error>> {
        if self.boot_time.is_none() {
            self.setup();
        }

        self.drain_uart()?;

        let now = self.interface.now();
        match self.state {
            DisplayState::BootWait => {
                if self.is_due(now, self.boot_time, self.timing.boot_delay) {
                    info!(target: TAG, "Sending initial M command to get desk height");
                    self.send_command(Command::WakeDisplay)?;
                    self.last_poll_time = Some(now);
                    self.state = DisplayState::Idle;
                }
            }
            DisplayState::Idle => {
                // The control box broadcasts on its own when someone presses a
                // key, so idle polling only keeps the schedule.
                if self.is_due(now, self.last_poll_time, self.timing.idle_poll_interval) {
                    self.last_poll_time = Some(now);
                }
            }
            DisplayState::Active => {
                if self.is_due(now, self.last_poll_time, self.timing.active_poll_interval) {
                    debug!(target: TAG, "Polling for height (active)");
                    self.send_command(Command::WakeDisplay)?;
                    self.last_poll_time = Some(now);
                }
                if self.is_due(now, self.last_activity_time, self.timing.activity_timeout) {
                    info!(target: TAG, "Desk stopped, slowing poll rate");
                    self.state = DisplayState::Idle;
                }
            }
        }

        Ok(())
    }

    // --- Accessors ---

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn current_height(&self) -> Option<Height> {
        self.current_height
    }

    pub fn last_published(&self) -> Option<Height> {
        self.last_published
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn release(self) -> (IF, S) {
        (self.interface, self.sink)
    }

    // --- Receive path (Private) ---

    fn drain_uart(&mut self) -> Result<(), DeskError<IF::Error>> {
        loop {
            let byte = match self.interface.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(e)) => return Err(DeskError::Io(e)),
            };

            match self.assembler.push(byte) {
                Some(FrameEvent::Packet(packet)) => self.process_message(Message::parse(&packet)),
                Some(FrameEvent::BadEndByte(end)) => {
                    warn!(target: TAG, "Invalid end byte: 0x{:02X}", end)
                }
                Some(FrameEvent::Overflow) => warn!(target: TAG, "Buffer overflow, resetting"),
                None => {}
            }
        }
    }

    fn process_message(&mut self, message: Message) {
        match message {
            Message::Display(reading) => self.process_display(reading),
            Message::Heartbeat => {}
            Message::Unknown { kind, length } => {
                trace!(target: TAG, "Unknown message type: {:02X?} (length: {})", kind, length)
            }
        }
    }

    fn process_display(&mut self, reading: DisplayReading) {
        if !reading.is_activity() {
            debug!(target: TAG, "Display waking up (blank), ignoring");
            return;
        }

        self.last_activity_time = Some(self.interface.now());

        let new_height = match reading {
            DisplayReading::Height(height) => height,
            DisplayReading::NonHeight(segments) => {
                debug!(target: TAG, "Display showing non-height data ({:?})", segments);
                return;
            }
            DisplayReading::Zero => {
                debug!(target: TAG, "Blank display, ignoring");
                return;
            }
            DisplayReading::Resetting => {
                debug!(target: TAG, "Desk showing minus sign (resetting)");
                return;
            }
            DisplayReading::Waking => return,
        };

        debug!(target: TAG, "Height decoded: {}", new_height);

        if let Some(current) = self.current_height {
            if current.is_valid() && current != new_height && self.state == DisplayState::Idle {
                info!(target: TAG, "Height change detected, increasing poll rate");
                self.state = DisplayState::Active;
            }
        }

        self.current_height = Some(new_height);
        self.publish_current_height();
    }

    fn publish_current_height(&mut self) {
        let Some(height) = self.current_height else {
            return;
        };
        if height.is_valid() && self.last_published != Some(height) {
            self.sink.publish_state(height.as_cm());
            self.last_published = Some(height);
            info!(target: TAG, "Published height: {}", height);
        }
    }

    // --- Transmit path (Private) ---

    fn send_command(&mut self, command: Command) -> Result<(), DeskError<IF::Error>> {
        // A frame cut off by a write timeout is finished first. Starting over
        // would leave a fragment whose length byte swallows the next frame.
        let (frame, mut sent) = self.tx_pending.take().unwrap_or((command.frame(), 0));

        let write_timeout = timing::BYTE_DURATION * frame.len() as u32 + timing::WRITE_TIMEOUT_SLACK;
        for &byte in &frame[sent..] {
            if let Err(e) = self.execute_blocking_io_with_timeout(write_timeout, |iface| iface.write_byte(byte)) {
                if sent > 0 {
                    self.tx_pending = Some((frame, sent));
                }
                return Err(e);
            }
            sent += 1;
        }
        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())?;

        Ok(())
    }

    fn is_due(&self, now: IF::Instant, since: Option<IF::Instant>, interval: Duration) -> bool {
        match since {
            Some(since) => now - since >= interval,
            None => true,
        }
    }

    // --- Timeout Helper ---
    fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, DeskError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(DeskError::Timeout);
                    }
                    self.interface.delay_us(timing::IO_RETRY_DELAY_US);
                }
                Err(nb::Error::Other(e)) => return Err(DeskError::Io(e)),
            }
        }
    }
}
