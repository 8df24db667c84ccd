// src/sensor/mod.rs

// The runtime side of the desk height component: what the registration
// shim in `component` instantiates on the device.

pub mod desk_sensor; // DeskHeightSensor, the component itself
pub mod sink; // HeightSink, where published heights go
pub mod state; // DisplayState and its timing

pub use desk_sensor::{setup_priority, DeskHeightSensor};
pub use sink::HeightSink;
pub use state::{DisplayState, PollTiming};
