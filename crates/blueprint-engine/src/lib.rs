//! Blueprint engine crate.
//!
//! Owns the platform + GPU runtime and the pieces of a scroll-driven 3D
//! showcase: a scene graph, a multi-view viewport compositor, OBJ loading and
//! a small tween/timeline animation driver. The studio binary composes them.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;

pub mod anim;
pub mod asset;
pub mod compositor;
