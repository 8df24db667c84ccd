// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod id;
pub mod message;
pub mod segment;
pub mod timing;

#[cfg(feature = "impl-native")]
pub mod native;

// --- Re-export key types/traits/functions for easier access ---

pub use command::{Command, WAKE_DISPLAY_FRAME};
pub use crc::{calculate_crc16, decode_crc, encode_crc, verify_frame_crc};
pub use error::DeskError;
pub use frame::{FrameAssembler, FrameEvent, Packet};
pub use hal_traits::{DeskInstant, DeskSerial, DeskTimer};
pub use id::{ComponentId, IdError};
pub use message::{DisplayReading, Height, Message};
pub use segment::Segment;

// Timing constants stay behind common::timing::*

#[cfg(feature = "impl-native")]
pub use native::NativeAdapter;
