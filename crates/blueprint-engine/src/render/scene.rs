use crate::compositor::{DrawSurface, SceneContext, ViewPass};
use crate::coords::SurfaceSize;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{NodeContent, NodeId, VisibleNode};

use super::canvas::{Canvas, CanvasCompositor};
use super::clear::ClearPipeline;
use super::lines::LineRenderer;
use super::mesh::MeshRenderer;
use super::uniforms::{DrawSlots, DrawUniform};

/// GPU backend for the viewport compositor.
///
/// Views render into an offscreen canvas through [`target`](Self::target);
/// the frame later places that canvas with [`composite`](Self::composite).
pub struct SceneRenderer {
    canvas_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    canvas: Option<Canvas>,
    slots: DrawSlots,
    clear: ClearPipeline,
    meshes: MeshRenderer,
    lines: LineRenderer,
    compositor: CanvasCompositor,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        canvas_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let slots = DrawSlots::new(device);
        Self {
            canvas_format,
            depth_format,
            canvas: None,
            clear: ClearPipeline::new(device, canvas_format, depth_format),
            meshes: MeshRenderer::new(device, canvas_format, depth_format, slots.layout()),
            lines: LineRenderer::new(device, canvas_format, depth_format, slots.layout()),
            slots,
            compositor: CanvasCompositor::new(),
        }
    }

    /// A draw surface rendering into a canvas of `size`.
    ///
    /// Commands are submitted when the compositor finishes the render, so the
    /// canvas is up to date before the next frame composites it.
    pub fn target<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        size: SurfaceSize,
    ) -> CanvasTarget<'a> {
        Canvas::ensure(&mut self.canvas, device, size, self.canvas_format, self.depth_format);
        CanvasTarget { renderer: self, device, queue, encoder: None }
    }

    /// Draws the last rendered canvas over `target`.
    ///
    /// `offset_x` is a fraction of the surface width. Nothing is drawn before
    /// the first render.
    pub fn composite(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        opacity: f32,
        offset_x: f32,
    ) {
        let Some(canvas) = self.canvas.as_ref() else { return };
        self.compositor.draw(ctx, target, canvas, opacity, offset_x);
    }
}

/// [`DrawSurface`] recording view passes into the scene canvas.
pub struct CanvasTarget<'a> {
    renderer: &'a mut SceneRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    encoder: Option<wgpu::CommandEncoder>,
}

impl DrawSurface for CanvasTarget<'_> {
    fn begin(&mut self, scene: &SceneContext, view_count: usize) {
        let r = &mut *self.renderer;
        r.slots.begin(self.device, view_count * scene.scene.drawable_count());
        r.slots.write_lights(self.queue, &scene.lights);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("blueprint canvas encoder"),
        });

        // Slices no view covers this render must not keep stale pixels.
        if let Some(canvas) = r.canvas.as_ref() {
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blueprint canvas clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: canvas.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.encoder = Some(encoder);
    }

    fn draw_view(&mut self, pass: &ViewPass<'_>, scene: &SceneContext) {
        let r = &mut *self.renderer;
        let Some(encoder) = self.encoder.as_mut() else { return };
        let Some(canvas) = r.canvas.as_ref() else { return };
        if canvas.size() != pass.surface {
            log::warn!("canvas {:?} does not match surface {:?}", canvas.size(), pass.surface);
            return;
        }
        let Some((sx, sy, sw, sh)) = pass.scissor.to_top_left(pass.surface) else { return };

        let view_proj = pass.camera.view_projection();
        let camera_pos = pass.camera.position;

        let mut meshes: Vec<(NodeId, u32)> = Vec::new();
        let mut lines: Vec<(NodeId, bool, u32)> = Vec::new();

        for VisibleNode { id, world, content } in scene.scene.visible(pass.camera.layers) {
            match content {
                NodeContent::Mesh { geometry, material } => {
                    r.meshes.prepare(self.device, id, geometry);
                    let u = DrawUniform::new(view_proj, world, camera_pos, material.color)
                        .with_specular(material.specular, material.shininess);
                    if let Some(offset) = r.slots.push(self.queue, &u) {
                        meshes.push((id, offset));
                    }
                }
                NodeContent::Lines { geometry, material } => {
                    r.lines.prepare(self.device, id, geometry);
                    let u = DrawUniform::new(view_proj, world, camera_pos, material.resolved_color());
                    if let Some(offset) = r.slots.push(self.queue, &u) {
                        lines.push((id, material.depth_test, offset));
                    }
                }
                NodeContent::Group => {}
            }
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blueprint view pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: canvas.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: canvas.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (vw, vh) = (pass.viewport.width as f32, pass.viewport.height as f32);
        rpass.set_viewport(0.0, 0.0, vw, vh, 0.0, 1.0);
        rpass.set_scissor_rect(sx, sy, sw, sh);

        r.clear.draw(&mut rpass);

        let bind_group = r.slots.bind_group();
        for (id, offset) in meshes {
            r.meshes.draw(&mut rpass, id, bind_group, offset);
        }
        // Lines last: the on-top wireframe must land over solid geometry.
        for (id, depth_test, offset) in lines {
            r.lines.draw(&mut rpass, id, depth_test, bind_group, offset);
        }
    }

    fn finish(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }
}
