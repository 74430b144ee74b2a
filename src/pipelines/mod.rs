//! Render pipelines and the bind group layouts they are built over.
//!
//! - `layouts` holds the bind group layouts
//! - `basic` builds the PBR and solid scene pipelines
//! - `sky` draws the cube-mapped background
//! - `shadow` renders and describes the directional shadow map
//! - `post_process` owns the off-screen target and the full-screen blur

use std::sync::Arc;

pub mod basic;
pub mod layouts;
pub mod post_process;
pub mod shadow;
pub mod sky;

/// Layouts plus the pipelines materials can choose from.
#[derive(Debug)]
pub struct Pipelines {
    pub frame_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    pub object_layout: wgpu::BindGroupLayout,
    pub sky_layout: wgpu::BindGroupLayout,
    pub shadow_layout: wgpu::BindGroupLayout,
    pub pbr: Arc<wgpu::RenderPipeline>,
    pub solid: Arc<wgpu::RenderPipeline>,
    pub sky: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl Pipelines {
    /// `scene_format` is the format of the target the scene pass draws into.
    pub fn new(device: &wgpu::Device, scene_format: wgpu::TextureFormat) -> Self {
        let frame_layout = layouts::mk_frame_layout(device);
        let material_layout = layouts::mk_material_layout(device);
        let object_layout = layouts::mk_object_layout(device);
        let sky_layout = layouts::mk_sky_layout(device);
        let shadow_layout = layouts::mk_shadow_layout(device);

        let pbr = basic::mk_pbr_pipeline(
            device,
            scene_format,
            &frame_layout,
            &material_layout,
            &object_layout,
        );
        let solid = basic::mk_solid_pipeline(
            device,
            scene_format,
            &frame_layout,
            &material_layout,
            &object_layout,
        );
        let sky = sky::mk_sky_pipeline(device, scene_format, &frame_layout, &sky_layout);
        let shadow = shadow::mk_shadow_pipeline(device, &shadow_layout, &object_layout);

        Self {
            frame_layout,
            material_layout,
            object_layout,
            sky_layout,
            shadow_layout,
            pbr: Arc::new(pbr),
            solid: Arc::new(solid),
            sky,
            shadow,
        }
    }
}
