//! Runtime configuration for the demo.
//!
//! [`DemoConfig`] holds everything that is not part of the scene itself: the
//! window, presentation, where assets live and the quality knobs of the
//! shadow and post-process passes. Values come from [`Default`] and can be
//! overridden through `LUMEN_*` environment variables via
//! [`DemoConfig::from_env`].

use std::{path::PathBuf, str::FromStr};

/// Smallest and largest accepted shadow map edge length in texels.
pub const SHADOW_MAP_SIZE_RANGE: (u32, u32) = (256, 8192);
/// Largest blur radius the post-process pass accepts.
pub const MAX_BLUR_RADIUS: u32 = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub clear_colour: wgpu::Color,
    pub asset_dir: PathBuf,
    pub shadow_map_size: u32,
    pub blur_radius: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            // gray, same as the ambient "sky" complement
            clear_colour: wgpu::Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 1.0,
            },
            asset_dir: PathBuf::from("./assets"),
            shadow_map_size: 2048,
            blur_radius: 0,
        }
    }
}

impl DemoConfig {
    /// Defaults overridden by `LUMEN_ASSET_DIR`, `LUMEN_VSYNC`, `LUMEN_WIDTH`,
    /// `LUMEN_HEIGHT`, `LUMEN_SHADOW_MAP_SIZE` and `LUMEN_BLUR_RADIUS`.
    ///
    /// `LUMEN_VSYNC` takes any spelling [`parse_flag`] understands.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup("LUMEN_ASSET_DIR") {
            config.asset_dir = PathBuf::from(dir);
        }
        override_flag(&lookup, "LUMEN_VSYNC", &mut config.vsync);
        override_with(&lookup, "LUMEN_WIDTH", &mut config.width);
        override_with(&lookup, "LUMEN_HEIGHT", &mut config.height);
        override_with(&lookup, "LUMEN_SHADOW_MAP_SIZE", &mut config.shadow_map_size);
        override_with(&lookup, "LUMEN_BLUR_RADIUS", &mut config.blur_radius);
        config.sanitized()
    }

    /// Clamps every value into the range the renderer supports.
    pub fn sanitized(mut self) -> Self {
        let (min, max) = SHADOW_MAP_SIZE_RANGE;
        self.shadow_map_size = self.shadow_map_size.clamp(min, max);
        self.blur_radius = self.blur_radius.min(MAX_BLUR_RADIUS);
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn override_with<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => log::warn!("Ignoring {key}={raw:?}: value could not be parsed."),
    }
}

/// `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`, ignoring case.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn override_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut bool) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match parse_flag(&raw) {
        Some(value) => *target = value,
        None => log::warn!("Ignoring {key}={raw:?}: expected true/false, 1/0, yes/no or on/off."),
    }
}
