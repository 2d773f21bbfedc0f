//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! wall-clock tweens in `anim` advance by `FrameTime::dt`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
