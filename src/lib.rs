// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

pub mod common;
pub mod sensor;

// Build-time registration; needs heap-backed config values
#[cfg(feature = "alloc")]
pub mod component;

// Re-export key types for convenience
pub use common::{DeskError, DisplayReading, Height, Message};
pub use sensor::{DeskHeightSensor, DisplayState, HeightSink};
