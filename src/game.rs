//! The demo: scene setup, per-frame logic and drawing.
//!
//! [`Game`] follows the classic Initialize / Update / Draw / OnResize shape.
//! Assets are looked up under [`DemoConfig::asset_dir`]; anything missing is
//! replaced by generated geometry or textures so the demo always starts.

use std::path::Path;

use cgmath::{Deg, Rad};
use image::RgbaImage;
use winit::keyboard::KeyCode;

use crate::{
    camera::{Camera, DEFAULT_FAR, DEFAULT_NEAR, Projection},
    config::{DemoConfig, MAX_BLUR_RADIUS},
    context::Context,
    data_structures::{
        entity::Entity,
        light::{Light, LightKind},
        material::{Material, TextureSlot},
        mesh::{Mesh, MeshData, MeshStats},
        scene::{MaterialId, MeshId, Scene},
        sky::procedural_sky_faces,
        texture::Texture,
    },
    input::Input,
    render::Renderer,
    resources::{
        mesh::load_mesh_obj,
        texture::{bump_normal_map, checkerboard, load_cubemap, load_texture},
    },
};

const AMBIENT: [f32; 3] = [0.25, 0.25, 0.25];
/// Blur radius used when blur is switched on without a configured radius.
pub const DEFAULT_BLUR_RADIUS: u32 = 4;
const SKY_FACES: [&str; 6] = [
    "skies/right.png",
    "skies/left.png",
    "skies/up.png",
    "skies/down.png",
    "skies/front.png",
    "skies/back.png",
];
const CAMERA_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Continue,
    Exit,
}

/// The cameras of the demo and which one is looking.
#[derive(Clone, Debug)]
pub struct CameraRig {
    cameras: Vec<Camera>,
    active: usize,
}

impl CameraRig {
    pub fn new(first: Camera) -> Self {
        Self {
            cameras: vec![first],
            active: 0,
        }
    }

    pub fn push(&mut self, camera: Camera) {
        self.cameras.push(camera);
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Camera {
        &self.cameras[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active]
    }

    /// Out-of-range indices leave the selection unchanged and return `false`.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.cameras.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn cycle(&mut self) {
        self.active = (self.active + 1) % self.cameras.len();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter()
    }

    pub fn update_projections(&mut self, aspect_ratio: f32) {
        for camera in &mut self.cameras {
            camera.update_projection_matrix(aspect_ratio);
        }
    }
}

/// Keyboard controls of the demo: exit, camera selection and the blur knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    blur_enabled: bool,
    blur_radius: u32,
}

impl Controls {
    /// A configured radius of 0 starts with blur off and
    /// [`DEFAULT_BLUR_RADIUS`] ready for when it is switched on.
    pub fn new(configured_radius: u32) -> Self {
        Self {
            blur_enabled: configured_radius > 0,
            blur_radius: if configured_radius > 0 {
                configured_radius.min(MAX_BLUR_RADIUS)
            } else {
                DEFAULT_BLUR_RADIUS
            },
        }
    }

    pub fn blur_enabled(&self) -> bool {
        self.blur_enabled
    }

    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    /// Radius the post-process pass should use; 0 while blur is off.
    pub fn effective_blur_radius(&self) -> u32 {
        if self.blur_enabled { self.blur_radius } else { 0 }
    }

    /// Applies this frame's key presses. Escape wins over everything else.
    pub fn handle(&mut self, input: &Input, cameras: &mut CameraRig) -> UpdateOutcome {
        if input.key_pressed(KeyCode::Escape) {
            return UpdateOutcome::Exit;
        }

        if input.key_pressed(KeyCode::Tab) {
            cameras.cycle();
            log::info!("Camera {} active", cameras.active_index() + 1);
        }
        for (index, key) in CAMERA_KEYS.iter().enumerate() {
            if input.key_pressed(*key) && cameras.select(index) {
                log::info!("Camera {} active", index + 1);
            }
        }

        if input.key_pressed(KeyCode::KeyB) {
            self.blur_enabled = !self.blur_enabled;
            log::info!("Blur {}", if self.blur_enabled { "on" } else { "off" });
        }
        if input.key_pressed(KeyCode::ArrowUp) {
            self.blur_radius = (self.blur_radius + 1).min(MAX_BLUR_RADIUS);
        }
        if input.key_pressed(KeyCode::ArrowDown) {
            self.blur_radius = self.blur_radius.saturating_sub(1);
        }

        UpdateOutcome::Continue
    }
}

/// Entity that spins around its Y axis; `bob` additionally moves it up and down.
#[derive(Clone, Copy, Debug)]
struct Animated {
    entity: usize,
    spin: f32,
    bob: Option<f32>,
}

#[derive(Debug)]
pub struct Game {
    renderer: Renderer,
    scene: Scene,
    cameras: CameraRig,
    clear_colour: wgpu::Color,
    controls: Controls,
    animated: Vec<Animated>,
}

impl Game {
    /// Builds the demo for the window behind `ctx`.
    pub async fn initialize(ctx: &Context, config: &DemoConfig) -> anyhow::Result<Self> {
        let (width, height) = ctx.size();
        Self::new(&ctx.device, &ctx.queue, ctx.config.format, width, height, config).await
    }

    /// Builds the demo for any output of `output_format`, with or without a window.
    ///
    /// Assets are read with `tokio::fs`, so this must be polled inside a
    /// tokio runtime.
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &DemoConfig,
    ) -> anyhow::Result<Self> {
        let renderer = Renderer::new(
            device,
            queue,
            output_format,
            width,
            height,
            config.shadow_map_size,
            config.blur_radius,
        );
        let scene = build_scene(device, queue, &renderer, &config.asset_dir).await?;
        let animated = scene
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                scene
                    .mesh(e.mesh())
                    .is_some_and(|m| m.name != "floor" && m.name != "marker")
            })
            .map(|(entity, _)| Animated {
                entity,
                spin: 0.5 + 0.1 * entity as f32,
                bob: (entity % 2 == 0).then_some(1.0 + entity as f32 * 0.4),
            })
            .collect();

        let aspect_ratio = width as f32 / height.max(1) as f32;
        let mut perspective = Camera::perspective((0.0, 3.0, -10.0), aspect_ratio);
        perspective.look(0.0, Rad::from(Deg(10.0)).0);
        let mut cameras = CameraRig::new(perspective);
        let mut orthographic = Camera::new(
            (0.0, 8.0, -12.0),
            aspect_ratio,
            Projection::Orthographic { width: 20.0 },
            DEFAULT_NEAR,
            DEFAULT_FAR,
        );
        orthographic.look(0.0, Rad::from(Deg(30.0)).0);
        cameras.push(orthographic);
        for camera in &mut cameras.cameras {
            camera.update_view_matrix();
        }

        for stats in scene.mesh_stats() {
            log::info!(
                "Mesh {}: {} vertices, {} indices, {} triangles",
                stats.name,
                stats.vertices,
                stats.indices,
                stats.triangles
            );
        }

        Ok(Self {
            renderer,
            scene,
            cameras,
            clear_colour: config.clear_colour,
            controls: Controls::new(config.blur_radius),
            animated,
        })
    }

    pub fn update(&mut self, input: &Input, dt: f32, total: f32) -> UpdateOutcome {
        if self.controls.handle(input, &mut self.cameras) == UpdateOutcome::Exit {
            return UpdateOutcome::Exit;
        }

        self.cameras.active_mut().update(dt, input);

        for animated in &self.animated {
            let Some(entity) = self.scene.entities.get_mut(animated.entity) else {
                continue;
            };
            let transform = entity.transform_mut();
            transform.rotate((0.0, animated.spin * dt, 0.0));
            if let Some(phase) = animated.bob {
                let position = transform.position();
                transform.set_position((position.x, 1.0 + 0.5 * (total + phase).sin(), position.z));
            }
        }

        UpdateOutcome::Continue
    }

    pub fn draw(&mut self, ctx: &Context) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to(&ctx.device, &ctx.queue, &view);
        output.present();
        Ok(())
    }

    /// Prepares and renders one frame into `view`.
    pub fn render_to(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        let radius = self.effective_blur_radius();
        if self.renderer.blur_radius() != radius {
            self.renderer.set_blur_radius(queue, radius);
        }
        self.renderer.prepare_scene(device, queue, &mut self.scene);
        self.renderer.render(
            device,
            queue,
            view,
            &self.scene,
            self.cameras.active(),
            self.clear_colour,
        );
    }

    pub fn on_resize(&mut self, ctx: &Context) {
        let (width, height) = ctx.size();
        self.resize(&ctx.device, &ctx.queue, width, height);
    }

    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.cameras
            .update_projections(width as f32 / height.max(1) as f32);
        self.renderer.resize(device, queue, width, height);
    }

    pub fn effective_blur_radius(&self) -> u32 {
        self.controls.effective_blur_radius()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn mesh_stats(&self) -> Vec<MeshStats> {
        self.scene.mesh_stats()
    }

    pub fn active_camera_index(&self) -> usize {
        self.cameras.active_index()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn cameras(&self) -> &CameraRig {
        &self.cameras
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

async fn build_scene(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &Renderer,
    asset_dir: &Path,
) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();
    scene.ambient = AMBIENT;

    let cube = add_mesh(&mut scene, device, asset_dir, "cube.obj", "cube", || MeshData::cube(1.0)).await;
    let sphere =
        add_mesh(&mut scene, device, asset_dir, "sphere.obj", "sphere", || MeshData::sphere(0.5, 24)).await;
    let floor = scene.add_mesh(Mesh::new(device, "floor", &MeshData::plane(30.0)));
    let marker = scene.add_mesh(Mesh::new(device, "marker", &MeshData::sphere(0.1, 8)));

    let pbr = renderer.pbr_pipeline();
    let surfaces = [
        ("bronze", [205, 127, 50, 255], [150, 90, 40, 255], 0.35, 1.0),
        ("cobblestone", [140, 140, 140, 255], [90, 90, 90, 255], 0.9, 0.0),
        ("scratched", [220, 220, 230, 255], [180, 180, 190, 255], 0.2, 1.0),
        ("paint", [40, 90, 200, 255], [30, 70, 160, 255], 0.5, 0.0),
    ];
    let mut materials = Vec::with_capacity(surfaces.len());
    for (name, a, b, roughness, metalness) in surfaces {
        let mut material = Material::new(name, pbr.clone(), [1.0; 3]);
        material.set_roughness(roughness);
        material.set_metalness(metalness);
        load_surface(&mut material, device, queue, asset_dir, name, a, b).await?;
        materials.push(scene.add_material(material));
    }

    let mut floor_material = Material::new("floor", pbr.clone(), [0.8, 0.8, 0.8]);
    floor_material.set_uv_scale([8.0, 8.0]);
    load_surface(
        &mut floor_material,
        device,
        queue,
        asset_dir,
        "cobblestone",
        [170, 170, 170, 255],
        [120, 120, 120, 255],
    )
    .await?;
    let floor_material = scene.add_material(floor_material);

    add_entity(&mut scene, floor, floor_material, (0.0, 0.0, 0.0));
    for (i, material) in materials.iter().enumerate() {
        let x = -4.5 + 3.0 * i as f32;
        add_entity(&mut scene, sphere, *material, (x, 1.0, 0.0));
        add_entity(&mut scene, cube, *material, (x, 1.0, 4.0));
    }

    let lights = [
        Light::directional([1.0, -1.0, 1.0], [1.0, 1.0, 1.0], 1.0),
        Light::point([-3.0, 2.0, -2.0], 8.0, [1.0, 0.2, 0.2], 2.0),
        Light::point([3.0, 2.0, -2.0], 8.0, [0.2, 0.3, 1.0], 2.0),
        Light::spot(
            [0.0, 5.0, 2.0],
            [0.0, -1.0, 0.0],
            12.0,
            Rad::from(Deg(20.0)).0,
            Rad::from(Deg(35.0)).0,
            [1.0, 0.9, 0.6],
            3.0,
        ),
    ];
    let solid = renderer.solid_pipeline();
    for light in lights {
        if light.kind() != LightKind::Directional {
            let gizmo = scene.add_material(Material::new("light marker", solid.clone(), light.colour));
            add_entity(&mut scene, marker, gizmo, light.position);
        }
        scene.add_light(light);
    }

    let cubemap = match load_cubemap(asset_dir, SKY_FACES, device, queue).await {
        Ok(cubemap) => cubemap,
        Err(e) => {
            log::warn!("Sky box unavailable ({e:#}), generating one.");
            let faces = procedural_sky_faces(64, [0.25, 0.45, 0.85], [0.75, 0.85, 0.95], [0.3, 0.28, 0.25]);
            Texture::create_cubemap(device, queue, &faces, "procedural sky")?
        }
    };
    scene.sky = Some(renderer.create_sky(device, cubemap));

    Ok(scene)
}

async fn add_mesh(
    scene: &mut Scene,
    device: &wgpu::Device,
    asset_dir: &Path,
    file_name: &str,
    name: &str,
    fallback: impl FnOnce() -> MeshData,
) -> MeshId {
    let data = match load_mesh_obj(asset_dir, file_name).await {
        Ok(data) => data,
        Err(e) => {
            log::warn!("{e:#}; generating the {name} mesh instead.");
            fallback()
        }
    };
    scene.add_mesh(Mesh::new(device, name, &data))
}

fn add_entity(scene: &mut Scene, mesh: MeshId, material: MaterialId, position: impl Into<cgmath::Vector3<f32>>) {
    let mut entity = Entity::new(mesh, material);
    entity.transform_mut().set_position(position);
    scene.add_entity(entity);
}

/// Fills the texture slots of `material` from `<name>_albedo.png`,
/// `<name>_normals.png`, `<name>_roughness.png` and `<name>_metal.png`.
/// Missing colour and normal maps are generated; missing roughness and metal
/// maps leave the scalar parameters in charge.
async fn load_surface(
    material: &mut Material,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    asset_dir: &Path,
    name: &str,
    a: [u8; 4],
    b: [u8; 4],
) -> anyhow::Result<()> {
    let maps: [(TextureSlot, &str, Option<RgbaImage>); 4] = [
        (TextureSlot::Albedo, "albedo", Some(checkerboard(128, 8, a, b))),
        (TextureSlot::Normal, "normals", Some(bump_normal_map(128, 8))),
        (TextureSlot::Roughness, "roughness", None),
        (TextureSlot::Metalness, "metal", None),
    ];
    for (slot, suffix, fallback) in maps {
        let file_name = format!("textures/{name}_{suffix}.png");
        match load_texture(asset_dir, &file_name, slot.is_linear(), device, queue).await {
            Ok(texture) => material.add_texture(slot, texture),
            Err(e) => {
                log::debug!("{e:#}");
                if let Some(image) = fallback {
                    let label = format!("generated {name} {suffix}");
                    let texture = Texture::from_image(
                        device,
                        queue,
                        &image::DynamicImage::ImageRgba8(image),
                        Some(&label),
                        slot.is_linear(),
                    )?;
                    material.add_texture(slot, texture);
                }
            }
        }
    }
    Ok(())
}
