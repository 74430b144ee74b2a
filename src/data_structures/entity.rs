//! Drawable objects: a transform plus handles to a mesh and a material.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::scene::{MaterialId, MeshId},
    transform::Transform,
};

#[derive(Debug)]
struct ObjectGpu {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct Entity {
    transform: Transform,
    mesh: MeshId,
    material: MaterialId,
    gpu: Option<ObjectGpu>,
}

impl Entity {
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            transform: Transform::new(),
            mesh,
            material,
            gpu: None,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    /// `None` until the first [`write_to_buffer`](Self::write_to_buffer).
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    /// Uploads the world matrices, creating the buffer on first use.
    pub fn write_to_buffer(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        let uniform = ObjectUniform::from(&self.transform);
        match &self.gpu {
            Some(gpu) => queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&[uniform])),
            None => {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Object Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("object_bind_group"),
                });
                self.gpu = Some(ObjectGpu { buffer, bind_group });
            }
        }
    }
}

/// Per-object data for the vertex shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub world: [[f32; 4]; 4],
    pub world_inverse_transpose: [[f32; 4]; 4],
}

impl From<&Transform> for ObjectUniform {
    fn from(transform: &Transform) -> Self {
        Self {
            world: transform.world_matrix().into(),
            world_inverse_transpose: transform.world_inverse_transpose_matrix().into(),
        }
    }
}
