//! Uniform layouts and the dynamically-offset slot buffer shared by the scene
//! pipelines.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::paint::Color;
use crate::scene::Lights;

use super::common::{align_to, min_binding_size};

/// Per-draw data: one slot per (view, drawable) pair in a render.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct DrawUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, padded to a mat4.
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// `w` carries the shininess.
    pub specular: [f32; 4],
    pub camera_pos: [f32; 4],
}

impl DrawUniform {
    pub fn new(view_proj: Mat4, model: Mat4, camera_pos: Vec3, color: Color) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            color: color.to_array(),
            specular: [0.0; 4],
            camera_pos: camera_pos.extend(1.0).to_array(),
        }
    }

    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = [specular.r, specular.g, specular.b, shininess];
        self
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct LightsUniform {
    pub point_position: [f32; 4],
    /// Color already scaled by intensity.
    pub point_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl From<&Lights> for LightsUniform {
    fn from(lights: &Lights) -> Self {
        let p = lights.point.color;
        let a = lights.ambient.color;
        let pi = lights.point.intensity;
        let ai = lights.ambient.intensity;
        Self {
            point_position: lights.point.position.extend(1.0).to_array(),
            point_color: [p.r * pi, p.g * pi, p.b * pi, 1.0],
            ambient: [a.r * ai, a.g * ai, a.b * ai, 1.0],
        }
    }
}

/// Uniform buffer holding one aligned [`DrawUniform`] per draw of a render,
/// plus the lights, behind a single bind group.
///
/// Binding 0 uses a dynamic offset; every draw picks its slot at
/// `set_bind_group` time so views recorded into one submission keep their own
/// camera data.
pub(super) struct DrawSlots {
    layout: wgpu::BindGroupLayout,
    lights: wgpu::Buffer,
    draws: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    next: usize,
}

impl DrawSlots {
    const INITIAL_CAPACITY: usize = 16;

    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blueprint scene bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: min_binding_size::<DrawUniform>(),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: min_binding_size::<LightsUniform>(),
                    },
                    count: None,
                },
            ],
        });

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = align_to(std::mem::size_of::<DrawUniform>() as u64, align);

        let lights = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blueprint scene lights ubo"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let capacity = Self::INITIAL_CAPACITY;
        let draws = create_draw_buffer(device, stride, capacity);
        let bind_group = create_bind_group(device, &layout, &draws, &lights);

        Self { layout, lights, draws, bind_group, stride, capacity, next: 0 }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Starts a render needing up to `slots` draws, growing the buffer first.
    pub fn begin(&mut self, device: &wgpu::Device, slots: usize) {
        self.next = 0;
        if slots <= self.capacity {
            return;
        }
        let capacity = slots.next_power_of_two();
        log::debug!("growing draw uniform slots {} -> {capacity}", self.capacity);
        self.draws = create_draw_buffer(device, self.stride, capacity);
        self.bind_group = create_bind_group(device, &self.layout, &self.draws, &self.lights);
        self.capacity = capacity;
    }

    pub fn write_lights(&self, queue: &wgpu::Queue, lights: &Lights) {
        queue.write_buffer(&self.lights, 0, bytemuck::bytes_of(&LightsUniform::from(lights)));
    }

    /// Writes the next slot and returns its dynamic offset, or `None` when the
    /// render asked for fewer slots than it uses.
    pub fn push(&mut self, queue: &wgpu::Queue, uniform: &DrawUniform) -> Option<u32> {
        if self.next >= self.capacity {
            log::warn!("draw uniform slots exhausted ({})", self.capacity);
            return None;
        }
        let offset = self.next as u64 * self.stride;
        queue.write_buffer(&self.draws, offset, bytemuck::bytes_of(uniform));
        self.next += 1;
        u32::try_from(offset).ok()
    }
}

fn create_draw_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("blueprint scene draw ubo"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    draws: &wgpu::Buffer,
    lights: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blueprint scene bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: draws,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: lights.as_entire_binding(),
            },
        ],
    })
}
