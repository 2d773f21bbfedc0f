use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene::{MeshGeometry, NodeId};

/// Vertex of an expanded (non-indexed) triangle carrying its face normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Expands indexed triangles into flat-shaded vertices.
///
/// Degenerate triangles get a zero normal and still draw (as nothing).
pub(super) fn flat_vertices(geometry: &MeshGeometry) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(geometry.triangle_count() * 3);
    for [a, b, c] in geometry.triangles() {
        let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
        for p in [a, b, c] {
            out.push(MeshVertex { position: p.to_array(), normal });
        }
    }
    out
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    vertex_count: u32,
}

/// Flat-shaded Blinn-Phong meshes, depth tested.
///
/// Vertex buffers are uploaded once per node; geometry never changes after the
/// node is inserted.
pub(super) struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    buffers: HashMap<NodeId, GpuMesh>,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blueprint mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blueprint mesh pipeline layout"),
            bind_group_layouts: &[layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blueprint mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline, buffers: HashMap::new() }
    }

    /// Uploads `geometry` for `id` if it has not been seen yet.
    pub fn prepare(&mut self, device: &wgpu::Device, id: NodeId, geometry: &MeshGeometry) {
        if self.buffers.contains_key(&id) {
            return;
        }
        let vertices = flat_vertices(geometry);
        if vertices.is_empty() {
            return;
        }
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blueprint mesh vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        log::debug!("uploaded mesh {id:?}: {} vertices", vertices.len());
        self.buffers.insert(id, GpuMesh { vbo, vertex_count: vertices.len() as u32 });
    }

    pub fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        id: NodeId,
        bind_group: &wgpu::BindGroup,
        offset: u32,
    ) {
        let Some(mesh) = self.buffers.get(&id) else { return };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, bind_group, &[offset]);
        rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
        rpass.draw(0..mesh.vertex_count, 0..1);
    }
}
