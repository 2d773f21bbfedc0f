use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseWheelDelta};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys, modifiers).
/// `InputFrame` provides events and transitions since the last frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame, including key-repeats.
    pub keys_pressed: Vec<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Accumulated wheel lines this frame (vertical).
    pub wheel_lines: f32,

    /// Accumulated wheel pixels this frame (vertical).
    pub wheel_pixels: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.wheel_lines = 0.0;
        self.wheel_pixels = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub(super) fn add_wheel(&mut self, delta: MouseWheelDelta) {
        match delta {
            MouseWheelDelta::Line { y, .. } => self.wheel_lines += y,
            MouseWheelDelta::Pixel { y, .. } => self.wheel_pixels += y,
        }
    }

    /// Whether anything arrived this frame.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
