//! Color model shared by the 3D renderers and overlays.

mod color;

pub use color::Color;
