use crate::coords::{PixelRect, SurfaceSize};
use crate::scene::{NodeId, PerspectiveCamera};

use super::SceneContext;

/// One view's draw: the scene through `camera`, clipped to `scissor`.
#[derive(Debug, Copy, Clone)]
pub struct ViewPass<'a> {
    pub index: usize,
    /// Always the whole surface; the camera projects across all of it.
    pub viewport: PixelRect,
    /// The view's slice, already clamped to the surface. Never empty.
    pub scissor: PixelRect,
    pub camera: &'a PerspectiveCamera,
    pub surface: SurfaceSize,
}

/// Backend the compositor draws through.
///
/// A render is `begin`, then `draw_view` once per non-empty view in view
/// order, then `finish`. Later views overwrite earlier ones where slices
/// overlap.
pub trait DrawSurface {
    /// Called before the first view of a render.
    fn begin(&mut self, _scene: &SceneContext, _view_count: usize) {}

    fn draw_view(&mut self, pass: &ViewPass<'_>, scene: &SceneContext);

    /// Called after the last view of a render.
    fn finish(&mut self) {}
}

/// What a [`RecordingSurface`] saw for one view pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPass {
    /// 1-based render this pass belongs to.
    pub render: usize,
    pub index: usize,
    pub viewport: PixelRect,
    pub scissor: PixelRect,
    pub aspect: f32,
    pub camera_z: f32,
    /// Drawable nodes the camera's layers admit, in draw order.
    pub drawn: Vec<NodeId>,
}

/// Headless surface that records every pass instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub renders: usize,
    pub passes: Vec<RecordedPass>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes of the most recent render.
    pub fn last_render(&self) -> &[RecordedPass] {
        let start = self.passes.partition_point(|p| p.render < self.renders);
        &self.passes[start..]
    }
}

impl DrawSurface for RecordingSurface {
    fn begin(&mut self, _scene: &SceneContext, _view_count: usize) {
        self.renders += 1;
    }

    fn draw_view(&mut self, pass: &ViewPass<'_>, scene: &SceneContext) {
        let drawn = scene
            .scene
            .visible(pass.camera.layers)
            .into_iter()
            .map(|v| v.id)
            .collect();
        self.passes.push(RecordedPass {
            render: self.renders,
            index: pass.index,
            viewport: pass.viewport,
            scissor: pass.scissor,
            aspect: pass.camera.aspect,
            camera_z: pass.camera.position.z,
            drawn,
        });
    }
}
