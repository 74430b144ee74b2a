//! Frame composition.
//!
//! A frame is three passes recorded into one encoder:
//!
//! 1. shadow: depth-only from the first directional light into the shadow map
//! 2. scene: every entity with its material's pipeline, then the sky
//!    (perspective cameras only), into the off-screen scene target
//! 3. post-process: the scene target blurred into the caller's view
//!
//! [`Renderer::prepare_scene`] must run before [`Renderer::render`] whenever
//! materials or entities may have changed, so their bind groups exist and
//! hold current data.

use std::{iter, sync::Arc};

use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, CameraUniform},
    data_structures::{
        light::LightsUniform,
        material::DefaultTextures,
        scene::Scene,
        sky::Sky,
        texture::Texture,
    },
    pipelines::{
        Pipelines,
        layouts::mk_post_process_layout,
        post_process::{PostProcess, SCENE_FORMAT},
        shadow::{SHADOW_DISTANCE, SHADOW_EXTENT, ShadowMap, ShadowUniform, light_view_projection},
    },
};

#[derive(Debug)]
pub struct Renderer {
    pipelines: Pipelines,
    defaults: DefaultTextures,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    shadow_map: ShadowMap,
    frame_bind_group: wgpu::BindGroup,
    depth_texture: Texture,
    post: PostProcess,
}

impl Renderer {
    /// `output_format` is the format of the views later passed to
    /// [`render`](Self::render).
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shadow_map_size: u32,
        blur_radius: u32,
    ) -> Self {
        let pipelines = Pipelines::new(device, SCENE_FORMAT);
        let defaults = DefaultTextures::new(device, queue);

        let empty_camera: CameraUniform = bytemuck::Zeroable::zeroed();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[empty_camera]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::new(&[], [0.0; 3])]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_map = ShadowMap::new(device, &pipelines.shadow_layout, shadow_map_size);

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipelines.frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: shadow_map.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let depth_texture = Texture::create_depth_texture(device, [width, height], "depth_texture");
        let post = PostProcess::new(
            device,
            mk_post_process_layout(device),
            output_format,
            width,
            height,
            blur_radius,
        );
        log::info!(
            "Renderer ready: {width}x{height}, shadow map {shadow_map_size}, blur radius {}",
            post.blur_radius()
        );

        Self {
            pipelines,
            defaults,
            camera_buffer,
            lights_buffer,
            shadow_map,
            frame_bind_group,
            depth_texture,
            post,
        }
    }

    pub fn pipelines(&self) -> &Pipelines {
        &self.pipelines
    }

    pub fn pbr_pipeline(&self) -> Arc<wgpu::RenderPipeline> {
        self.pipelines.pbr.clone()
    }

    pub fn solid_pipeline(&self) -> Arc<wgpu::RenderPipeline> {
        self.pipelines.solid.clone()
    }

    pub fn defaults(&self) -> &DefaultTextures {
        &self.defaults
    }

    pub fn shadow_map(&self) -> &ShadowMap {
        &self.shadow_map
    }

    /// Builds a sky for this renderer's sky layout.
    pub fn create_sky(&self, device: &wgpu::Device, cubemap: Texture) -> Sky {
        Sky::new(device, &self.pipelines.sky_layout, cubemap)
    }

    pub fn blur_radius(&self) -> u32 {
        self.post.blur_radius()
    }

    pub fn set_blur_radius(&mut self, queue: &wgpu::Queue, blur_radius: u32) {
        self.post.set_blur_radius(queue, blur_radius);
    }

    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.depth_texture = Texture::create_depth_texture(device, [width, height], "depth_texture");
        self.post.resize(device, queue, width, height);
    }

    /// Creates or refreshes the GPU side of every material and entity.
    pub fn prepare_scene(&self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut Scene) {
        for material in scene.materials_mut() {
            material.write_to_buffer(device, queue, &self.pipelines.material_layout, &self.defaults);
        }
        for entity in scene.entities.iter_mut() {
            entity.write_to_buffer(device, queue, &self.pipelines.object_layout);
        }
    }

    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
        clear_colour: wgpu::Color,
    ) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera.uniform()]));
        queue.write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[scene.lights_uniform()]));
        let caster = scene.shadow_caster();
        let shadow_uniform = match caster {
            Some(light) => {
                let (view, projection) =
                    light_view_projection(light.direction, SHADOW_DISTANCE, SHADOW_EXTENT);
                ShadowUniform::new(view, projection)
            }
            None => ShadowUniform::identity(),
        };
        self.shadow_map.write(queue, &shadow_uniform);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if caster.is_some() {
                shadow_pass.set_pipeline(&self.pipelines.shadow);
                shadow_pass.set_bind_group(0, &self.shadow_map.bind_group, &[]);
                for entity in &scene.entities {
                    let (Some(object), Some(mesh)) = (entity.bind_group(), scene.mesh(entity.mesh())) else {
                        continue;
                    };
                    shadow_pass.set_bind_group(1, object, &[]);
                    mesh.draw(&mut shadow_pass);
                }
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post.target_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for entity in &scene.entities {
                let Some(material) = scene.material(entity.material()) else {
                    log::debug!("Skipping entity with unknown material {:?}", entity.material());
                    continue;
                };
                let Some(mesh) = scene.mesh(entity.mesh()) else {
                    log::debug!("Skipping entity with unknown mesh {:?}", entity.mesh());
                    continue;
                };
                let (Some(material_group), Some(object_group)) =
                    (material.bind_group(), entity.bind_group())
                else {
                    log::debug!("Skipping entity drawn before prepare_scene");
                    continue;
                };
                render_pass.set_pipeline(material.pipeline());
                render_pass.set_bind_group(1, material_group, &[]);
                render_pass.set_bind_group(2, object_group, &[]);
                mesh.draw(&mut render_pass);
            }

            if let Some(sky) = scene.sky.as_ref().filter(|_| camera.kind().shows_sky()) {
                render_pass.set_pipeline(&self.pipelines.sky);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                sky.draw(&mut render_pass);
            }
        }

        self.post.run(&mut encoder, target);

        queue.submit(iter::once(encoder.finish()));
    }
}
