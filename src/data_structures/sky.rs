//! Sky box: a cube mesh textured with a cube map, drawn behind everything.

use image::{Rgba, RgbaImage};

use crate::data_structures::{
    mesh::{Mesh, MeshData},
    texture::{Texture, create_default_sampler},
};

#[derive(Debug)]
pub struct Sky {
    mesh: Mesh,
    cubemap: Texture,
    bind_group: wgpu::BindGroup,
}

impl Sky {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, cubemap: Texture) -> Self {
        let mesh = Mesh::new(device, "sky", &MeshData::cube(1.0));
        let fallback;
        let sampler = match &cubemap.sampler {
            Some(sampler) => sampler,
            None => {
                fallback = create_default_sampler(device);
                &fallback
            }
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("sky_bind_group"),
        });

        Self {
            mesh,
            cubemap,
            bind_group,
        }
    }

    pub fn cubemap(&self) -> &Texture {
        &self.cubemap
    }

    /// Expects the sky pipeline and the frame bind group to be set already.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(render_pass);
    }
}

/// Six faces (+X, -X, +Y, -Y, +Z, -Z) of a vertical gradient: `zenith`
/// straight up, `horizon` at eye level, `ground` straight down.
///
/// Colours are linear RGB in `0..=1`.
pub fn procedural_sky_faces(
    size: u32,
    zenith: [f32; 3],
    horizon: [f32; 3],
    ground: [f32; 3],
) -> [RgbaImage; 6] {
    let size = size.max(1);
    std::array::from_fn(|face| {
        RgbaImage::from_fn(size, size, |x, y| {
            let u = 2.0 * (x as f32 + 0.5) / size as f32 - 1.0;
            let v = 2.0 * (y as f32 + 0.5) / size as f32 - 1.0;
            let dir = face_direction(face, u, v);
            let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
            let height = dir[1] / len;
            let colour = if height >= 0.0 {
                lerp(horizon, zenith, height.sqrt())
            } else {
                lerp(horizon, ground, (-height).sqrt())
            };
            let [r, g, b] = colour.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
            Rgba([r, g, b, 255])
        })
    })
}

/// Direction through texel (u, v) of a cube face, v pointing down the image.
fn face_direction(face: usize, u: f32, v: f32) -> [f32; 3] {
    match face {
        0 => [1.0, -v, -u],
        1 => [-1.0, -v, u],
        2 => [u, 1.0, v],
        3 => [u, -1.0, -v],
        4 => [u, -v, 1.0],
        _ => [-u, -v, -1.0],
    }
}

fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
