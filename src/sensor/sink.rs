// src/sensor/sink.rs

/// Receiver of published heights, the sensor entity of the host firmware.
pub trait HeightSink {
    /// Publishes a new state, in centimetres.
    fn publish_state(&mut self, height_cm: f32);
}

impl<F> HeightSink for F
where
    F: FnMut(f32),
{
    fn publish_state(&mut self, height_cm: f32) {
        self(height_cm)
    }
}
