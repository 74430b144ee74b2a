//! Directional shadow mapping.
//!
//! The scene is rendered depth-only from the shadow caster into
//! [`ShadowMap::texture`]; the PBR shader then compares each fragment's
//! light-space depth against it.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    camera::orthographic_lh,
    data_structures::{mesh::Vertex, texture::Texture},
    pipelines::basic::{PipelineOptions, mk_render_pipeline},
};

/// How far back along its direction the shadow camera sits.
pub const SHADOW_DISTANCE: f32 = 20.0;
/// Width and height of the area covered by the shadow map, world units.
pub const SHADOW_EXTENT: f32 = 30.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl ShadowUniform {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            view: view.into(),
            projection: projection.into(),
        }
    }

    /// Used while no light casts shadows; the map then stays cleared to 1.0.
    pub fn identity() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity())
    }
}

/// View and projection of an orthographic shadow camera looking along
/// `direction` at the origin from `distance` away, covering `extent`
/// world units in both directions. The far plane is at `2 * distance`.
pub fn light_view_projection(
    direction: impl Into<Vector3<f32>>,
    distance: f32,
    extent: f32,
) -> (Matrix4<f32>, Matrix4<f32>) {
    let direction = direction.into().normalize();
    // Looking straight up or down leaves +Y useless as an up vector.
    let up = if direction.y.abs() > 0.999 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let eye = Point3::from_vec(-direction * distance);
    let view = Matrix4::look_to_lh(eye, direction, up);
    let projection = orthographic_lh(extent, extent, 0.0, 2.0 * distance);
    (view, projection)
}

/// Depth target, its light-space uniform and the bind group of the shadow pass.
#[derive(Debug)]
pub struct ShadowMap {
    pub texture: Texture,
    /// Compares with `LessEqual`; samples outside the map clamp to its edge.
    pub sampler: wgpu::Sampler,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    size: u32,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, size: u32) -> Self {
        let texture = Texture::create_depth_texture(device, [size, size], "shadow_map");
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Buffer"),
            contents: bytemuck::cast_slice(&[ShadowUniform::identity()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });
        Self {
            texture,
            sampler,
            buffer,
            bind_group,
            size,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &ShadowUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

/// Depth-only pipeline over `[shadow layout, object layout]`, with slope
/// scaled bias against acne.
pub fn mk_shadow_pipeline(
    device: &wgpu::Device,
    shadow_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Shadow Pipeline Layout"),
        bind_group_layouts: &[shadow_layout, object_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Shadow Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shadow.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        shader,
        PipelineOptions {
            label: "Shadow",
            color_format: None,
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            cull_mode: Some(wgpu::Face::Back),
            vertex_layouts: &[Vertex::desc()],
        },
    )
}
