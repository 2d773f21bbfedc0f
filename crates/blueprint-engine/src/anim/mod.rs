//! Property animation.
//!
//! Animations never touch their targets directly: they write `f32` values by
//! key into a [`PropertySink`], which maps keys onto whatever the caller
//! animates (view fractions, transform components, overlay state).
//!
//! Two clocks drive them:
//! - [`ScrollDriver`] binds tweens and timelines to a scroll offset
//! - [`TimeDriver`] advances tweens by frame time
//!
//! Sampling is a pure function of progress; drivers only decide which
//! progress to sample and when to write.

mod driver;
mod ease;
mod scroll;
mod sink;
mod time;
mod timeline;
mod tween;

pub use driver::ScrollDriver;
pub use ease::{Ease, EaseMode, EaseParseError};
pub use scroll::{AnchorParseError, AnchorPoint, ScrollAnchor, ScrollRange, Span};
pub use sink::PropertySink;
pub use time::{TimeDriver, TimeTween};
pub use timeline::{Step, Timeline};
pub use tween::{Track, Tween};
