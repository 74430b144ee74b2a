use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{data_structures::texture::Texture, resources::load_binary};

/// `linear` is for data maps (normal, roughness, metalness); colour maps are
/// loaded as sRGB.
pub async fn load_texture(
    asset_dir: &Path,
    file_name: &str,
    linear: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(asset_dir, file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name, None, linear)
}

/// Six face images in +X, -X, +Y, -Y, +Z, -Z order.
pub async fn load_cubemap(
    asset_dir: &Path,
    faces: [&str; 6],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let mut images = Vec::with_capacity(6);
    for face in faces {
        let data = load_binary(asset_dir, face).await?;
        images.push(image::load_from_memory(&data)?.to_rgba8());
    }
    let images: [RgbaImage; 6] = images
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected six cube map faces"))?;
    Texture::create_cubemap(device, queue, &images, faces[0])
}

/// A `size` x `size` checkerboard of `cells` x `cells` squares, starting
/// with `a` in the top left corner.
pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let size = size.max(1);
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba(a)
        } else {
            Rgba(b)
        }
    })
}

/// Tangent-space normal map of rounded bumps, one per cell.
pub fn bump_normal_map(size: u32, cells: u32) -> RgbaImage {
    let size = size.max(1);
    let cell = (size / cells.max(1)).max(1) as f32;
    RgbaImage::from_fn(size, size, |x, y| {
        let u = ((x as f32 + 0.5) % cell) / cell * 2.0 - 1.0;
        let v = ((y as f32 + 0.5) % cell) / cell * 2.0 - 1.0;
        let (nx, ny) = (u * 0.5, v * 0.5);
        let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
        let encode = |c: f32| ((c * 0.5 + 0.5) * 255.0).round() as u8;
        Rgba([encode(nx), encode(ny), encode(nz), 255])
    })
}
