//! Light sources and their uniform buffer layout.
//!
//! Every [`Light`] is exactly 64 bytes with 16-byte aligned vectors so the
//! array can be copied into a uniform buffer as-is. The WGSL side mirrors the
//! field order in `pipelines/pbr.wgsl`.

pub const MAX_LIGHTS: usize = 8;
/// Shortest reach a point or spot light is built with.
pub const MIN_LIGHT_RANGE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    /// Direction the light travels in, for directional and spot lights.
    pub direction: [f32; 3],
    kind: i32,
    pub position: [f32; 3],
    /// Maximum reach of point and spot lights.
    pub range: f32,
    pub colour: [f32; 3],
    pub intensity: f32,
    /// Full-brightness cone, radians.
    pub spot_inner_angle: f32,
    /// Falloff ends here, radians.
    pub spot_outer_angle: f32,
    _padding: [f32; 2],
}

impl Light {
    pub fn directional(direction: [f32; 3], colour: [f32; 3], intensity: f32) -> Self {
        Self {
            direction: normalized(direction),
            kind: LightKind::Directional as i32,
            colour,
            intensity,
            ..Self::empty()
        }
    }

    pub fn point(position: [f32; 3], range: f32, colour: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            range: clamp_range(range),
            kind: LightKind::Point as i32,
            colour,
            intensity,
            ..Self::empty()
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn spot(
        position: [f32; 3],
        direction: [f32; 3],
        range: f32,
        inner_angle: f32,
        outer_angle: f32,
        colour: [f32; 3],
        intensity: f32,
    ) -> Self {
        Self {
            direction: normalized(direction),
            kind: LightKind::Spot as i32,
            position,
            range: clamp_range(range),
            colour,
            intensity,
            spot_inner_angle: inner_angle.min(outer_angle),
            spot_outer_angle: outer_angle,
            _padding: [0.0; 2],
        }
    }

    pub fn kind(&self) -> LightKind {
        match self.kind {
            0 => LightKind::Directional,
            1 => LightKind::Point,
            _ => LightKind::Spot,
        }
    }

    fn empty() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

fn clamp_range(range: f32) -> f32 {
    if range.is_nan() || range < MIN_LIGHT_RANGE {
        log::warn!("Light range {range} is too short, using {MIN_LIGHT_RANGE} instead.");
        return MIN_LIGHT_RANGE;
    }
    range
}

fn normalized(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        log::warn!("Light direction {v:?} has no length, pointing it down instead.");
        return [0.0, -1.0, 0.0];
    }
    v.map(|c| c / len)
}

/// All lights of a frame plus the ambient term.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub lights: [Light; MAX_LIGHTS],
    pub ambient: [f32; 3],
    pub count: u32,
}

impl LightsUniform {
    /// Lights past [`MAX_LIGHTS`] are dropped.
    pub fn new(lights: &[Light], ambient: [f32; 3]) -> Self {
        let count = lights.len().min(MAX_LIGHTS);
        let mut uniform = Self {
            lights: [Light::empty(); MAX_LIGHTS],
            ambient,
            count: count as u32,
        };
        uniform.lights[..count].copy_from_slice(&lights[..count]);
        uniform
    }
}
