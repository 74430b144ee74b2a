use crate::data_structures::{mesh::Vertex, texture::Texture};

/// Everything that differs between the render pipelines of the renderer.
pub struct PipelineOptions<'a> {
    pub label: &'a str,
    /// `None` builds a depth-only pipeline without a fragment stage.
    pub color_format: Option<wgpu::TextureFormat>,
    pub depth_stencil: Option<wgpu::DepthStencilState>,
    pub cull_mode: Option<wgpu::Face>,
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
}

/// Depth state for a pass that tests against [`Texture::DEPTH_FORMAT`].
pub fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: Texture::DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Lit PBR pipeline over the frame, material and object groups.
pub fn mk_pbr_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_scene_pipeline(
        device,
        "PBR",
        color_format,
        [frame_layout, material_layout, object_layout],
        wgpu::ShaderModuleDescriptor {
            label: Some("PBR Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("pbr.wgsl").into()),
        },
    )
}

/// Unlit pipeline: colour tint times albedo.
pub fn mk_solid_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_scene_pipeline(
        device,
        "Solid",
        color_format,
        [frame_layout, material_layout, object_layout],
        wgpu::ShaderModuleDescriptor {
            label: Some("Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("solid.wgsl").into()),
        },
    )
}

fn mk_scene_pipeline(
    device: &wgpu::Device,
    label: &str,
    color_format: wgpu::TextureFormat,
    layouts: [&wgpu::BindGroupLayout; 3],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} Pipeline Layout")),
        bind_group_layouts: &layouts,
        push_constant_ranges: &[],
    });
    mk_render_pipeline(
        device,
        &layout,
        shader,
        PipelineOptions {
            label,
            color_format: Some(color_format),
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            cull_mode: Some(wgpu::Face::Back),
            vertex_layouts: &[Vertex::desc()],
        },
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: wgpu::ShaderModuleDescriptor,
    options: PipelineOptions<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);
    let targets = [options.color_format.map(|format| wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(options.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: options.vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: options.color_format.map(|_| wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            // Left-handed world with clockwise front faces.
            front_face: wgpu::FrontFace::Cw,
            cull_mode: options.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: options.depth_stencil,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
