//! Vertex format, CPU-side geometry and GPU meshes.
//!
//! [`MeshData`] is plain geometry that can be built from primitives or
//! converted from OBJ models; [`Mesh`] is the same geometry uploaded into
//! vertex and index buffers. All geometry is left-handed with clockwise front
//! faces.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector2, Vector3, Zero};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    /// Used for normal mapping, computed from the UV layout.
    pub tangent: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent: [0.0; 3],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Geometry that has not been uploaded yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Moves `other` into this mesh, offsetting its indices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Converts a triangulated, single-index OBJ model.
    ///
    /// OBJ files are right-handed, so Z is negated, V is flipped and the
    /// winding is reversed. Missing normals are generated from the faces.
    pub fn from_obj_model(model: &tobj::Model) -> Self {
        let mesh = &model.mesh;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        let vertices = (0..mesh.positions.len() / 3)
            .map(|i| Vertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    -mesh.positions[i * 3 + 2],
                ],
                uv: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: if has_normals {
                    [
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        -mesh.normals[i * 3 + 2],
                    ]
                } else {
                    [0.0; 3]
                },
                tangent: [0.0; 3],
            })
            .collect::<Vec<_>>();

        let indices = mesh
            .indices
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[2], c[1]])
            .collect();

        let mut data = Self::new(vertices, indices);
        if !has_normals {
            data.calculate_normals();
        }
        data.calculate_tangents();
        data
    }

    /// Smooth normals from the area-weighted face normals around each vertex.
    pub fn calculate_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];
        for c in self.triangles() {
            let [p0, p1, p2] = c.map(|i| Vector3::from(self.vertices[i].position));
            // clockwise winding: (p1 - p0) x (p2 - p0) points outwards in a left-handed space
            let face = (p1 - p0).cross(p2 - p0);
            c.iter().for_each(|&i| normals[i] += face);
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            if normal.magnitude2() > f32::EPSILON {
                vertex.normal = normal.normalize().into();
            }
        }
    }

    /// Per-vertex tangents for normal mapping.
    ///
    /// Each triangle contributes the direction in which U increases; the
    /// contributions are summed per vertex and orthogonalised against the
    /// normal. Triangles with degenerate UVs are skipped.
    pub fn calculate_tangents(&mut self) {
        let mut tangents = vec![Vector3::zero(); self.vertices.len()];
        for c in self.triangles() {
            let [v0, v1, v2] = c.map(|i| self.vertices[i]);

            let pos0: Vector3<f32> = v0.position.into();
            let pos1: Vector3<f32> = v1.position.into();
            let pos2: Vector3<f32> = v2.position.into();

            let uv0: Vector2<f32> = v0.uv.into();
            let uv1: Vector2<f32> = v1.uv.into();
            let uv2: Vector2<f32> = v2.uv.into();

            // Calculate the edges of the triangle
            let delta_pos1 = pos1 - pos0;
            let delta_pos2 = pos2 - pos0;
            let delta_uv1 = uv1 - uv0;
            let delta_uv2 = uv2 - uv0;

            // Solving
            //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
            //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
            // for T.
            let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if det.abs() < f32::EPSILON {
                continue;
            }
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) / det;
            c.iter().for_each(|&i| tangents[i] += tangent);
        }

        for (vertex, tangent) in self.vertices.iter_mut().zip(tangents) {
            let normal = Vector3::from(vertex.normal);
            // Gram-Schmidt
            let tangent = tangent - normal * normal.dot(tangent);
            if tangent.magnitude2() > f32::EPSILON {
                vertex.tangent = tangent.normalize().into();
            }
        }
    }

    /// Index triples, skipping any triangle that references a missing vertex.
    fn triangles(&self) -> Vec<[usize; 3]> {
        let len = self.vertices.len();
        self.indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .filter(|c| c.iter().all(|&i| i < len))
            .collect()
    }

    /// Axis-aligned cube centred on the origin, 4 vertices per face.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (outward normal, up as seen from outside)
        let faces: [([f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, -1.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ];
        let mut data = Self::default();
        for (normal, up) in faces {
            let normal = Vector3::from(normal);
            data.push_quad(normal * h, normal, Vector3::from(up) * h, h);
        }
        data
    }

    /// Square on the XZ plane facing +Y.
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let mut data = Self::default();
        data.push_quad(Vector3::zero(), Vector3::unit_y(), Vector3::unit_z() * h, h);
        data
    }

    /// UV sphere with `segments` rings and twice as many slices.
    pub fn sphere(radius: f32, segments: u32) -> Self {
        let stacks = segments.max(2);
        let slices = stacks * 2;
        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        for i in 0..=stacks {
            let theta = PI * i as f32 / stacks as f32;
            for j in 0..=slices {
                let phi = 2.0 * PI * j as f32 / slices as f32;
                let normal = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
                vertices.push(Vertex {
                    position: normal.map(|n| n * radius),
                    uv: [j as f32 / slices as f32, i as f32 / stacks as f32],
                    normal,
                    tangent: [-phi.sin(), 0.0, phi.cos()],
                });
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for i in 0..stacks {
            for j in 0..slices {
                let top_left = i * row + j;
                let top_right = top_left + 1;
                let bottom_left = top_left + row;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left,
                    top_right,
                    bottom_right,
                    top_left,
                    bottom_right,
                    bottom_left,
                ]);
            }
        }
        Self::new(vertices, indices)
    }

    /// Appends a square face. `up` is the half-extent vector pointing to the
    /// top edge as seen from outside; right is `normal x up`.
    fn push_quad(&mut self, centre: Vector3<f32>, normal: Vector3<f32>, up: Vector3<f32>, half: f32) {
        let right = normal.cross(up.normalize()) * half;
        let base = self.vertices.len() as u32;
        let corners = [
            (centre - right + up, [0.0, 0.0]),
            (centre + right + up, [1.0, 0.0]),
            (centre + right - up, [1.0, 1.0]),
            (centre - right - up, [0.0, 1.0]),
        ];
        for (position, uv) in corners {
            self.vertices.push(Vertex {
                position: position.into(),
                uv,
                normal: normal.into(),
                tangent: right.normalize().into(),
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Geometry living in GPU buffers.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, name: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            vertex_count: data.vertices.len() as u32,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            name: self.name.clone(),
            vertices: self.vertex_count,
            indices: self.index_count,
            triangles: self.triangle_count(),
        }
    }

    /// Binds the buffers at slot 0 and issues the indexed draw.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Counts shown by the inspector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshStats {
    pub name: String,
    pub vertices: u32,
    pub indices: u32,
    pub triangles: u32,
}
