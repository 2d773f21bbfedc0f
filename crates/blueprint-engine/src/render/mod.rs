//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily or at construction.
//!
//! Two targets are in play per frame:
//! - the scene canvas, an offscreen transparent texture the compositor's views
//!   draw into through [`SceneRenderer::target`]
//! - the window surface, where overlays and the composited canvas land
//!
//! Convention for overlays:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod canvas;
mod clear;
mod common;
mod ctx;
mod lines;
mod mesh;
mod overlay;
mod scene;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::{OverlayRect, OverlayRenderer, OverlayShape};
pub use scene::{CanvasTarget, SceneRenderer};
