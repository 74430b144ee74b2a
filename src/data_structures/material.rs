//! Surface description: pipeline, PBR parameters and texture maps.
//!
//! A [`Material`] keeps its parameters on the CPU and mirrors them into a
//! uniform buffer plus a bind group (group 1 of the scene pipelines). GPU
//! objects are created lazily by [`Material::write_to_buffer`], which the
//! renderer calls once per frame; only what changed is re-uploaded.
//!
//! Texture slots that were never filled are bound to the neutral textures in
//! [`DefaultTextures`], so every pipeline can always sample every slot.

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;

use crate::data_structures::texture::{Texture, create_default_sampler};

/// Binding index of the uniform buffer inside the material bind group.
pub const UNIFORM_BINDING: u32 = 0;
/// Binding index of the shared sampler inside the material bind group.
pub const SAMPLER_BINDING: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Albedo,
    Normal,
    Roughness,
    Metalness,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Albedo,
        TextureSlot::Normal,
        TextureSlot::Roughness,
        TextureSlot::Metalness,
    ];

    pub fn binding(self) -> u32 {
        match self {
            TextureSlot::Albedo => 1,
            TextureSlot::Normal => 2,
            TextureSlot::Roughness => 3,
            TextureSlot::Metalness => 4,
        }
    }

    /// Only albedo holds colour; the other maps store data and must not be
    /// gamma-decoded.
    pub fn is_linear(self) -> bool {
        !matches!(self, TextureSlot::Albedo)
    }
}

/// Scalar material inputs. Texture maps are multiplied by these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub colour_tint: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            colour_tint: [1.0; 3],
            roughness: 1.0,
            metalness: 0.0,
            uv_scale: [1.0, 1.0],
            uv_offset: [0.0, 0.0],
        }
    }
}

impl MaterialParams {
    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            colour_tint: self.colour_tint,
            roughness: self.roughness.clamp(0.0, 1.0),
            uv_scale: self.uv_scale,
            uv_offset: self.uv_offset,
            metalness: self.metalness.clamp(0.0, 1.0),
            _padding: [0.0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub colour_tint: [f32; 3],
    pub roughness: f32,
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
    pub metalness: f32,
    _padding: [f32; 3],
}

/// Neutral stand-ins for texture slots a material leaves empty.
#[derive(Clone, Debug)]
pub struct DefaultTextures {
    pub white: Texture,
    pub white_linear: Texture,
    pub flat_normal: Texture,
    pub sampler: wgpu::Sampler,
}

impl DefaultTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            white: Texture::from_colour(device, queue, [255; 4], "default white", false),
            white_linear: Texture::from_colour(device, queue, [255; 4], "default white linear", true),
            flat_normal: Texture::create_default_normal_map(device, queue),
            sampler: create_default_sampler(device),
        }
    }

    pub fn for_slot(&self, slot: TextureSlot) -> &Texture {
        match slot {
            TextureSlot::Albedo => &self.white,
            TextureSlot::Normal => &self.flat_normal,
            TextureSlot::Roughness | TextureSlot::Metalness => &self.white_linear,
        }
    }
}

#[derive(Debug)]
struct MaterialGpu {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct Material {
    name: String,
    pipeline: Arc<wgpu::RenderPipeline>,
    params: MaterialParams,
    textures: HashMap<TextureSlot, Texture>,
    sampler: Option<wgpu::Sampler>,
    gpu: Option<MaterialGpu>,
    params_dirty: bool,
    bindings_dirty: bool,
}

impl Material {
    pub fn new(name: &str, pipeline: Arc<wgpu::RenderPipeline>, colour_tint: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            pipeline,
            params: MaterialParams {
                colour_tint,
                ..Default::default()
            },
            textures: HashMap::new(),
            sampler: None,
            gpu: None,
            params_dirty: true,
            bindings_dirty: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn set_pipeline(&mut self, pipeline: Arc<wgpu::RenderPipeline>) {
        self.pipeline = pipeline;
    }

    pub fn params(&self) -> &MaterialParams {
        &self.params
    }

    pub fn set_params(&mut self, params: MaterialParams) {
        self.params = params;
        self.params_dirty = true;
    }

    pub fn colour_tint(&self) -> [f32; 3] {
        self.params.colour_tint
    }

    pub fn set_colour_tint(&mut self, colour_tint: [f32; 3]) {
        self.params.colour_tint = colour_tint;
        self.params_dirty = true;
    }

    pub fn uv_scale(&self) -> [f32; 2] {
        self.params.uv_scale
    }

    pub fn set_uv_scale(&mut self, uv_scale: [f32; 2]) {
        self.params.uv_scale = uv_scale;
        self.params_dirty = true;
    }

    pub fn uv_offset(&self) -> [f32; 2] {
        self.params.uv_offset
    }

    pub fn set_uv_offset(&mut self, uv_offset: [f32; 2]) {
        self.params.uv_offset = uv_offset;
        self.params_dirty = true;
    }

    pub fn roughness(&self) -> f32 {
        self.params.roughness
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.params.roughness = roughness;
        self.params_dirty = true;
    }

    pub fn metalness(&self) -> f32 {
        self.params.metalness
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.params.metalness = metalness;
        self.params_dirty = true;
    }

    /// Replaces whatever texture occupied `slot`.
    pub fn add_texture(&mut self, slot: TextureSlot, texture: Texture) {
        self.textures.insert(slot, texture);
        self.bindings_dirty = true;
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        self.textures.get(&slot)
    }

    pub fn set_sampler(&mut self, sampler: wgpu::Sampler) {
        self.sampler = Some(sampler);
        self.bindings_dirty = true;
    }

    /// `None` until the first [`write_to_buffer`](Self::write_to_buffer).
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    pub fn needs_upload(&self) -> bool {
        self.gpu.is_none() || self.params_dirty || self.bindings_dirty
    }

    /// Creates the bind group if textures or the sampler changed and uploads
    /// the parameters if they changed.
    pub fn write_to_buffer(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        defaults: &DefaultTextures,
    ) {
        if self.bindings_dirty || self.gpu.is_none() {
            self.gpu = Some(self.create_gpu(device, layout, defaults));
        } else if self.params_dirty {
            if let Some(gpu) = &self.gpu {
                queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&[self.params.to_uniform()]));
            }
        }
        self.params_dirty = false;
        self.bindings_dirty = false;
    }

    fn create_gpu(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        defaults: &DefaultTextures,
    ) -> MaterialGpu {
        log::debug!("Building bind group for material {}", self.name);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material Buffer", self.name)),
            contents: bytemuck::cast_slice(&[self.params.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = self.sampler.as_ref().unwrap_or(&defaults.sampler);
        let mut entries = vec![wgpu::BindGroupEntry {
            binding: UNIFORM_BINDING,
            resource: buffer.as_entire_binding(),
        }];
        entries.extend(TextureSlot::ALL.iter().map(|&slot| {
            let texture = self.textures.get(&slot).unwrap_or_else(|| defaults.for_slot(slot));
            wgpu::BindGroupEntry {
                binding: slot.binding(),
                resource: wgpu::BindingResource::TextureView(&texture.view),
            }
        }));
        entries.push(wgpu::BindGroupEntry {
            binding: SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(sampler),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &entries,
            label: Some(&format!("{} Material Bind Group", self.name)),
        });

        MaterialGpu { buffer, bind_group }
    }
}
