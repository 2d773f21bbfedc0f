use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    logical_clip_to_scissor, min_binding_size, premul_alpha_blend, QuadVertex, ViewportUniform,
    QUAD_INDICES, QUAD_VERTICES,
};

/// How an [`OverlayRect`] fills its rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum OverlayShape {
    #[default]
    Fill,
    /// Circle outline inscribed in the rectangle, `stroke` logical pixels
    /// wide, drawn clockwise from 3 o'clock over the first `sweep` fraction.
    Ring { stroke: f32, sweep: f32 },
}

/// One rectangle drawn over (or under) the scene canvas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayRect {
    /// Logical pixels, top-left origin.
    pub rect: Rect,
    /// Linear premultiplied.
    pub color: Color,
    pub clip: Option<Rect>,
    pub shape: OverlayShape,
}

impl OverlayRect {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color, clip: None, shape: OverlayShape::Fill }
    }

    /// A ring of `radius` around `center`, partially drawn up to `sweep`.
    pub fn ring(center: Vec2, radius: f32, stroke: f32, sweep: f32, color: Color) -> Self {
        let rect = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
        Self {
            shape: OverlayShape::Ring { stroke, sweep: sweep.clamp(0.0, 1.0) },
            ..Self::new(rect, color)
        }
    }

    pub fn clipped(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }
}

/// Consecutive instances sharing a clip rect.
#[derive(Debug, Clone)]
struct Batch {
    instances: Range<u32>,
    clip: Option<Rect>,
}

/// Instanced solid-rectangle renderer for page overlays.
///
/// A frame uploads every overlay layer once with [`prepare`](Self::prepare),
/// then draws layers individually so the scene canvas can be composited
/// between them.
#[derive(Default)]
pub struct OverlayRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    layers: Vec<Vec<Batch>>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `layers` for this frame; layer `i` is drawn by `draw(.., i)`.
    ///
    /// Empty, fully transparent and undrawn items are dropped.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, layers: &[&[OverlayRect]]) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let mut raw: Vec<OverlayInstance> = Vec::new();
        self.layers.clear();

        for layer in layers {
            let mut batches: Vec<Batch> = Vec::new();
            for item in layer.iter() {
                let Some(instance) = OverlayInstance::from_item(item) else { continue };
                let index = raw.len() as u32;
                raw.push(instance);
                match batches.last_mut() {
                    Some(b) if b.clip == item.clip && b.instances.end == index => {
                        b.instances.end += 1;
                    }
                    _ => batches.push(Batch {
                        instances: index..index + 1,
                        clip: item.clip,
                    }),
                }
            }
            self.layers.push(batches);
        }

        if raw.is_empty() {
            return;
        }

        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, raw.len());
        if let Some(instance_vbo) = self.instance_vbo.as_ref() {
            ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));
        }
    }

    /// Draws one prepared layer into `target`.
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, layer: usize) {
        let Some(batches) = self.layers.get(layer) else { return };
        if batches.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blueprint overlay pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for batch in batches {
            if let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(batch.clip, ctx.viewport, ctx.scale_factor)
            {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(0..6, 0, batch.instances.clone());
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blueprint overlay shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("blueprint overlay bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: min_binding_size::<ViewportUniform>(),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("blueprint overlay pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blueprint overlay pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), OverlayInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blueprint overlay viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blueprint overlay bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blueprint overlay quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blueprint overlay quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.x.max(1.0), ctx.viewport.y.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(32);
        let new_size = (new_cap * std::mem::size_of::<OverlayInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blueprint overlay instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct OverlayInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    /// Ring stroke width and sweep; a zero stroke fills the rectangle.
    ring: [f32; 2],
}

impl OverlayInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // color
        4 => Float32x2  // ring
    ];

    fn from_item(item: &OverlayRect) -> Option<Self> {
        let r = item.rect.normalized();
        if r.is_empty() || item.color.a <= 0.0 {
            return None;
        }
        let ring = match item.shape {
            OverlayShape::Fill => [0.0, 0.0],
            OverlayShape::Ring { stroke, sweep } => {
                if stroke <= 0.0 || sweep <= 0.0 {
                    return None;
                }
                // Inscribed circle: the stroke never exceeds the radius.
                let radius = r.size.x.min(r.size.y) * 0.5;
                [stroke.min(radius), sweep.min(1.0)]
            }
        };
        Some(Self {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            color: item.color.to_array(),
            ring,
        })
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_carry_no_ring() {
        let item = OverlayRect::new(Rect::new(10.0, 20.0, 30.0, 40.0), Color::WHITE);
        let inst = OverlayInstance::from_item(&item).unwrap();
        assert_eq!(inst.origin, [10.0, 20.0]);
        assert_eq!(inst.size, [30.0, 40.0]);
        assert_eq!(inst.ring, [0.0, 0.0]);
    }

    #[test]
    fn ring_is_inscribed_around_its_center() {
        let item = OverlayRect::ring(Vec2::new(100.0, 50.0), 20.0, 2.0, 0.5, Color::WHITE);
        assert_eq!(item.rect, Rect::new(80.0, 30.0, 40.0, 40.0));
        let inst = OverlayInstance::from_item(&item).unwrap();
        assert_eq!(inst.ring, [2.0, 0.5]);
    }

    #[test]
    fn ring_sweep_and_stroke_are_bounded() {
        let item = OverlayRect::ring(Vec2::ZERO, 3.0, 10.0, 4.0, Color::WHITE);
        assert_eq!(item.shape, OverlayShape::Ring { stroke: 10.0, sweep: 1.0 });
        assert_eq!(OverlayInstance::from_item(&item).unwrap().ring, [3.0, 1.0]);
    }

    #[test]
    fn undrawn_and_invisible_items_are_dropped() {
        let undrawn = OverlayRect::ring(Vec2::ZERO, 10.0, 2.0, 0.0, Color::WHITE);
        assert!(OverlayInstance::from_item(&undrawn).is_none());

        let clear = OverlayRect::new(Rect::new(0.0, 0.0, 5.0, 5.0), Color::TRANSPARENT);
        assert!(OverlayInstance::from_item(&clear).is_none());

        let empty = OverlayRect::new(Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE);
        assert!(OverlayInstance::from_item(&empty).is_none());
    }
}
