//! Coordinate and geometry types shared by the compositor, renderers and overlays.
//!
//! Two spaces are in use:
//! - device pixels with a bottom-left origin (`SurfaceSize`, `PixelRect`), the
//!   space view fractions are expressed in
//! - logical pixels with a top-left origin (`Rect`), used by 2D overlays
//!
//! Conversion to the GPU's top-left scissor convention happens only at the
//! render boundary (`PixelRect::to_top_left`).

mod pixel_rect;
mod rect;
mod surface;

pub use pixel_rect::PixelRect;
pub use rect::Rect;
pub use surface::SurfaceSize;
