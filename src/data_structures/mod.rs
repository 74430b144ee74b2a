//! Scene data: geometry, textures, materials, entities, lights and the sky.
//!
//! - `mesh` holds vertex data, primitive shapes and GPU vertex/index buffers
//! - `texture` wraps GPU textures (2D, depth, cube maps, render targets)
//! - `material` describes surfaces and owns their bind groups
//! - `entity` pairs a transform with a mesh and a material
//! - `light` defines light sources in their GPU layout
//! - `sky` is the cube-mapped background
//! - `scene` owns all of the above for one frame

pub mod entity;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod sky;
pub mod texture;
