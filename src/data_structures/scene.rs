//! Everything that gets drawn in a frame.
//!
//! Meshes and materials live in flat arenas; entities refer to them through
//! [`MeshId`] and [`MaterialId`] so several entities can share one mesh or
//! one material without reference counting.

use crate::data_structures::{
    entity::Entity,
    light::{Light, LightKind, LightsUniform, MAX_LIGHTS},
    material::Material,
    mesh::{Mesh, MeshStats},
    sky::Sky,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    pub entities: Vec<Entity>,
    lights: Vec<Light>,
    pub ambient: [f32; 3],
    pub sky: Option<Sky>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
            entities: Vec::new(),
            lights: Vec::new(),
            ambient: [0.0; 3],
            sky: None,
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Returns the index of the new entity in [`Scene::entities`].
    pub fn add_entity(&mut self, entity: Entity) -> usize {
        debug_assert!(entity.mesh().0 < self.meshes.len(), "entity refers to an unknown mesh");
        debug_assert!(
            entity.material().0 < self.materials.len(),
            "entity refers to an unknown material"
        );
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        if self.lights.len() >= MAX_LIGHTS {
            log::warn!(
                "Scene already has {MAX_LIGHTS} lights, the {:?} light will not be rendered.",
                light.kind()
            );
        }
        self.lights.push(light);
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub(crate) fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    pub fn lights_uniform(&self) -> LightsUniform {
        LightsUniform::new(&self.lights, self.ambient)
    }

    /// The first directional light among the rendered ones.
    pub fn shadow_caster(&self) -> Option<&Light> {
        self.lights
            .iter()
            .take(MAX_LIGHTS)
            .find(|light| light.kind() == LightKind::Directional)
    }

    pub fn mesh_stats(&self) -> Vec<MeshStats> {
        self.meshes.iter().map(Mesh::stats).collect()
    }
}
