//! Off-screen scene target and the full-screen blur pass that resolves it
//! into the surface.

use wgpu::util::DeviceExt;

use crate::{
    config::MAX_BLUR_RADIUS,
    data_structures::texture::Texture,
    pipelines::basic::{PipelineOptions, mk_render_pipeline},
};

/// Format of the image the scene is rendered into before post-processing.
pub const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniform {
    pub pixel_size: [f32; 2],
    pub blur_radius: i32,
    _padding: u32,
}

impl PostUniform {
    /// `blur_radius` is clamped to [`MAX_BLUR_RADIUS`].
    pub fn new(width: u32, height: u32, blur_radius: u32) -> Self {
        Self {
            pixel_size: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32],
            blur_radius: blur_radius.min(MAX_BLUR_RADIUS) as i32,
            _padding: 0,
        }
    }
}

#[derive(Debug)]
pub struct PostProcess {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    target: Texture,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    blur_radius: u32,
}

impl PostProcess {
    pub fn new(
        device: &wgpu::Device,
        layout: wgpu::BindGroupLayout,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        blur_radius: u32,
    ) -> Self {
        let pipeline = mk_post_process_pipeline(device, &layout, output_format);
        let blur_radius = blur_radius.min(MAX_BLUR_RADIUS);
        let target = Texture::create_render_target(device, [width, height], SCENE_FORMAT, "scene_target");
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Post Process Buffer"),
            contents: bytemuck::cast_slice(&[PostUniform::new(width, height, blur_radius)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = mk_bind_group(device, &layout, &target, &buffer);
        Self {
            pipeline,
            layout,
            target,
            buffer,
            bind_group,
            width,
            height,
            blur_radius,
        }
    }

    /// The scene pass renders into this view.
    pub fn target_view(&self) -> &wgpu::TextureView {
        &self.target.view
    }

    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    pub fn set_blur_radius(&mut self, queue: &wgpu::Queue, blur_radius: u32) {
        self.blur_radius = blur_radius.min(MAX_BLUR_RADIUS);
        self.write_uniform(queue);
    }

    /// Recreates the scene target; the old bind group points at a dropped view.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.target = Texture::create_render_target(device, [width, height], SCENE_FORMAT, "scene_target");
        self.bind_group = mk_bind_group(device, &self.layout, &self.target, &self.buffer);
        self.write_uniform(queue);
    }

    fn write_uniform(&self, queue: &wgpu::Queue) {
        let uniform = PostUniform::new(self.width, self.height, self.blur_radius);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Resolves the scene target into `output`.
    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Post Process Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    target: &Texture,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &target.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = device.create_sampler(&wgpu::SamplerDescriptor::default());
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&target.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: buffer.as_entire_binding(),
            },
        ],
        label: Some("post_process_bind_group"),
    })
}

fn mk_post_process_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    output_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Post Process Pipeline Layout"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Post Process Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("post_process.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &pipeline_layout,
        shader,
        PipelineOptions {
            label: "Post Process",
            color_format: Some(output_format),
            depth_stencil: None,
            cull_mode: None,
            vertex_layouts: &[],
        },
    )
}
