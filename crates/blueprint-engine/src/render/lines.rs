use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene::{LineGeometry, NodeId};

use super::common::premul_alpha_blend;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

struct GpuLines {
    vbo: wgpu::Buffer,
    vertex_count: u32,
}

/// Unlit line lists in a uniform premultiplied color.
///
/// Two pipelines: depth tested and always-on-top. Neither writes depth, so
/// translucent lines never occlude each other.
pub(super) struct LineRenderer {
    depth_tested: wgpu::RenderPipeline,
    on_top: wgpu::RenderPipeline,
    buffers: HashMap<NodeId, GpuLines>,
}

impl LineRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blueprint lines shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lines.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blueprint lines pipeline layout"),
            bind_group_layouts: &[layout],
            immediate_size: 0,
        });

        let build = |label: &str, compare: wgpu::CompareFunction| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[LineVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_format,
                    depth_write_enabled: false,
                    depth_compare: compare,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        Self {
            depth_tested: build("blueprint lines pipeline", wgpu::CompareFunction::LessEqual),
            on_top: build("blueprint lines on-top pipeline", wgpu::CompareFunction::Always),
            buffers: HashMap::new(),
        }
    }

    pub fn prepare(&mut self, device: &wgpu::Device, id: NodeId, geometry: &LineGeometry) {
        if self.buffers.contains_key(&id) || geometry.is_empty() {
            return;
        }
        let vertices: Vec<LineVertex> = geometry
            .positions()
            .iter()
            .map(|&position| LineVertex { position })
            .collect();
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blueprint lines vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        log::debug!("uploaded lines {id:?}: {} segments", geometry.segment_count());
        self.buffers.insert(id, GpuLines { vbo, vertex_count: vertices.len() as u32 });
    }

    pub fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        id: NodeId,
        depth_test: bool,
        bind_group: &wgpu::BindGroup,
        offset: u32,
    ) {
        let Some(lines) = self.buffers.get(&id) else { return };
        rpass.set_pipeline(if depth_test { &self.depth_tested } else { &self.on_top });
        rpass.set_bind_group(0, bind_group, &[offset]);
        rpass.set_vertex_buffer(0, lines.vbo.slice(..));
        rpass.draw(0..lines.vertex_count, 0..1);
    }
}
