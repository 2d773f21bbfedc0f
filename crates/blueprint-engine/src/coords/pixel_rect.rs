use super::SurfaceSize;

/// Axis-aligned rectangle in device pixels, bottom-left origin.
///
/// This is the convention view fractions are expressed in: `y` is the distance
/// from the bottom edge of the surface.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole surface.
    #[inline]
    pub const fn full(surface: SurfaceSize) -> Self {
        Self::new(0, 0, surface.width, surface.height)
    }

    /// Full-width horizontal slice from vertical fractions of the surface.
    ///
    /// `y = floor(H × bottom)`, `height = floor(H × height)`. Fractions below
    /// zero produce zero; fractions above one are not clamped, so independently
    /// animated slices may extend past the top edge.
    pub fn from_fractions(surface: SurfaceSize, bottom: f32, height: f32) -> Self {
        Self::new(
            0,
            floor_fraction(surface.height, bottom),
            surface.width,
            floor_fraction(surface.height, height),
        )
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Top edge (exclusive) measured from the bottom.
    #[inline]
    pub fn top(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Intersects with the surface bounds.
    pub fn clamped_to(self, surface: SurfaceSize) -> Self {
        let x0 = self.x.min(surface.width);
        let y0 = self.y.min(surface.height);
        let x1 = self.x.saturating_add(self.width).min(surface.width);
        let y1 = self.top().min(surface.height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Converts to a top-left-origin `(x, y, w, h)` tuple for the GPU scissor
    /// and viewport calls. Returns `None` if nothing of the rect is on the surface.
    pub fn to_top_left(self, surface: SurfaceSize) -> Option<(u32, u32, u32, u32)> {
        let r = self.clamped_to(surface);
        if r.is_empty() {
            return None;
        }
        let y = surface.height - r.top();
        Some((r.x, y, r.width, r.height))
    }
}

fn floor_fraction(total: u32, fraction: f32) -> u32 {
    let v = (f64::from(total) * f64::from(fraction)).floor();
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}
