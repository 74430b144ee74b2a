//! lumen-ngin
//!
//! A small forward renderer built around a classic game loop: initialise a
//! scene, update it every frame and draw it with physically based lighting,
//! directional shadows, a sky box and a full-screen post-process. The world
//! is left-handed (+Y up, +Z forward) with clockwise front faces.
//!
//! High-level modules
//! - `config`: demo settings with environment overrides
//! - `context`: window, surface, device and queue
//! - `input`: keyboard and mouse state per frame
//! - `transform`: position / rotation / scale with cached matrices
//! - `camera`: view and projection matrices plus fly controls
//! - `data_structures`: meshes, textures, materials, entities, lights, sky, scene
//! - `pipelines`: bind group layouts, render pipelines, shadow map, post-process
//! - `render`: per-frame composition of all passes
//! - `resources`: loading OBJ meshes, textures and cube maps from disk
//! - `game`: the demo scene and its Initialize / Update / Draw / OnResize loop
//! - `flow`: the winit event loop running the game
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod game;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
pub use winit::event::{MouseButton, WindowEvent};
pub use winit::keyboard::KeyCode;
