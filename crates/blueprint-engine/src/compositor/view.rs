use crate::coords::{PixelRect, SurfaceSize};
use crate::scene::PerspectiveCamera;

/// Initial placement of a view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewSpec {
    pub bottom: f32,
    pub height: f32,
    pub layer: u8,
}

impl ViewSpec {
    pub const fn new(bottom: f32, height: f32, layer: u8) -> Self {
        Self { bottom, height, layer }
    }
}

/// A horizontal slice of the surface with its own camera.
///
/// `bottom` and `height` are fractions of the surface height. They animate
/// independently, so `bottom + height` may exceed one.
#[derive(Debug, Clone)]
pub struct View {
    pub bottom: f32,
    pub height: f32,
    pub camera: PerspectiveCamera,
}

impl View {
    /// Slice in device pixels: `(floor(H × bottom), floor(H × height))`.
    pub fn rect(&self, surface: SurfaceSize) -> PixelRect {
        PixelRect::from_fractions(surface, self.bottom, self.height)
    }
}
