//! Viewport compositor.
//!
//! Several views share one surface. Each view is a full-width horizontal
//! slice given by two independent fractions of the surface height, with its
//! own camera restricted to a single layer. Rendering walks the views in
//! order and draws the whole scene once per view, clipped to the slice; the
//! layer mask decides what each view shows.
//!
//! Drawing goes through [`DrawSurface`], implemented by the GPU canvas
//! renderer and by [`RecordingSurface`] for headless use.

mod compositor;
mod context;
mod framing;
mod surface;
mod view;

pub use compositor::ViewportCompositor;
pub use context::SceneContext;
pub use framing::FramingConfig;
pub use surface::{DrawSurface, RecordedPass, RecordingSurface, ViewPass};
pub use view::{View, ViewSpec};
