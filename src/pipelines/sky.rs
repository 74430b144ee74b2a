use crate::{
    data_structures::mesh::Vertex,
    pipelines::basic::{PipelineOptions, depth_state, mk_render_pipeline},
};

/// Draws the inside of the sky cube on the far plane: depth is tested with
/// `LessEqual` but never written, and front faces are culled since the
/// camera sits inside the cube.
pub fn mk_sky_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
    sky_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sky Pipeline Layout"),
        bind_group_layouts: &[frame_layout, sky_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Sky Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        shader,
        PipelineOptions {
            label: "Sky",
            color_format: Some(color_format),
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::LessEqual)),
            cull_mode: Some(wgpu::Face::Front),
            vertex_layouts: &[Vertex::desc()],
        },
    )
}
