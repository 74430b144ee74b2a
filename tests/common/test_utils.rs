use std::time::Duration;

use lumen_ngin::{
    camera::Camera,
    data_structures::{
        entity::Entity,
        material::Material,
        mesh::{Mesh, MeshData},
        scene::Scene,
    },
    render::Renderer,
};

/// Output format of every golden image; linear so pixel values are exact.
pub const TEST_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
/// Keeps rows at the 256 byte copy alignment.
pub const TEST_SIZE: u32 = 64;

pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// A device without a surface, or `None` (with a note on stderr) when the
/// machine has no usable adapter.
pub fn headless() -> Option<Gpu> {
    let _ = env_logger::builder().is_test(true).try_init();
    futures::executor::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                eprintln!("Skipping GPU test: {e}");
                return None;
            }
        };
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("test device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Adapter found but no device could be opened");
        Some(Gpu { device, queue })
    })
}

pub fn renderer(gpu: &Gpu, blur_radius: u32) -> Renderer {
    Renderer::new(
        &gpu.device,
        &gpu.queue,
        TEST_FORMAT,
        TEST_SIZE,
        TEST_SIZE,
        1024,
        blur_radius,
    )
}

/// Adds `data` drawn with a fresh material on `pipeline` at `position`.
pub fn add_object(
    gpu: &Gpu,
    scene: &mut Scene,
    data: &MeshData,
    material: Material,
    position: (f32, f32, f32),
) -> usize {
    let mesh = scene.add_mesh(Mesh::new(&gpu.device, "test mesh", data));
    let material = scene.add_material(material);
    let mut entity = Entity::new(mesh, material);
    entity.transform_mut().set_position(position);
    scene.add_entity(entity)
}

/// Renders one frame of `scene` and reads it back.
pub fn render_scene(
    gpu: &Gpu,
    renderer: &Renderer,
    scene: &mut Scene,
    camera: &Camera,
    clear_colour: wgpu::Color,
) -> image::RgbaImage {
    renderer.prepare_scene(&gpu.device, &gpu.queue, scene);
    render_to_image(gpu, |view| {
        renderer.render(&gpu.device, &gpu.queue, view, scene, camera, clear_colour)
    })
}

/// Creates a `TEST_SIZE` square target, lets `draw` submit work into it and
/// copies the result back to the CPU.
pub fn render_to_image(gpu: &Gpu, draw: impl FnOnce(&wgpu::TextureView)) -> image::RgbaImage {
    let extent = wgpu::Extent3d {
        width: TEST_SIZE,
        height: TEST_SIZE,
        depth_or_array_layers: 1,
    };
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("golden image target"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEST_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    draw(&view);

    let u32_size = std::mem::size_of::<u32>() as u32;
    let output_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        size: (u32_size * TEST_SIZE * TEST_SIZE) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: Some("golden image readback"),
        mapped_at_creation: false,
    });
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(u32_size * TEST_SIZE),
                rows_per_image: Some(TEST_SIZE),
            },
        },
        extent,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    futures::executor::block_on(async {
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        gpu.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .unwrap();
        rx.receive().await.unwrap().unwrap();
        let data = buffer_slice.get_mapped_range().to_vec();
        image::RgbaImage::from_raw(TEST_SIZE, TEST_SIZE, data).unwrap()
    })
}

pub fn to_rgba8(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

/// Looks along +Z from `z` units in front of the origin.
pub fn camera_facing_origin(distance: f32) -> Camera {
    Camera::perspective((0.0, 0.0, -distance), 1.0)
}
