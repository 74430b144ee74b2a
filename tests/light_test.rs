use std::mem::{offset_of, size_of};

use lumen_ngin::data_structures::{
    light::{Light, LightKind, LightsUniform, MAX_LIGHTS, MIN_LIGHT_RANGE},
    scene::Scene,
};

#[test]
fn light_layout_matches_shader() {
    assert_eq!(size_of::<Light>(), 64);
    assert_eq!(offset_of!(Light, direction), 0);
    assert_eq!(offset_of!(Light, position), 16);
    assert_eq!(offset_of!(Light, range), 28);
    assert_eq!(offset_of!(Light, colour), 32);
    assert_eq!(offset_of!(Light, intensity), 44);
    assert_eq!(offset_of!(Light, spot_inner_angle), 48);
    assert_eq!(offset_of!(Light, spot_outer_angle), 52);

    assert_eq!(size_of::<LightsUniform>(), 64 * MAX_LIGHTS + 16);
    assert_eq!(offset_of!(LightsUniform, ambient), 64 * MAX_LIGHTS);
    assert_eq!(offset_of!(LightsUniform, count), 64 * MAX_LIGHTS + 12);
}

#[test]
fn constructors_set_kind_and_normalise_direction() {
    let sun = Light::directional([0.0, -2.0, 0.0], [1.0; 3], 1.0);
    assert_eq!(sun.kind(), LightKind::Directional);
    assert_eq!(sun.direction, [0.0, -1.0, 0.0]);

    let bulb = Light::point([1.0, 2.0, 3.0], 5.0, [1.0, 0.0, 0.0], 2.0);
    assert_eq!(bulb.kind(), LightKind::Point);
    assert_eq!(bulb.position, [1.0, 2.0, 3.0]);
    assert_eq!(bulb.range, 5.0);

    let spot = Light::spot([0.0; 3], [3.0, 0.0, 4.0], 10.0, 0.5, 0.3, [1.0; 3], 1.0);
    assert_eq!(spot.kind(), LightKind::Spot);
    assert!((spot.direction[0] - 0.6).abs() < 1e-6);
    assert!((spot.direction[2] - 0.8).abs() < 1e-6);
    // inner never exceeds outer
    assert_eq!(spot.spot_inner_angle, 0.3);
    assert_eq!(spot.spot_outer_angle, 0.3);
}

#[test]
fn zero_or_negative_range_is_raised_to_minimum() {
    assert_eq!(Light::point([0.0; 3], 0.0, [1.0; 3], 1.0).range, MIN_LIGHT_RANGE);
    assert_eq!(Light::point([0.0; 3], -3.0, [1.0; 3], 1.0).range, MIN_LIGHT_RANGE);
    assert_eq!(Light::point([0.0; 3], f32::NAN, [1.0; 3], 1.0).range, MIN_LIGHT_RANGE);
    let spot = Light::spot([0.0; 3], [0.0, -1.0, 0.0], 0.0, 0.2, 0.4, [1.0; 3], 1.0);
    assert_eq!(spot.range, MIN_LIGHT_RANGE);
}

#[test]
fn zero_direction_falls_back_to_down() {
    let light = Light::directional([0.0; 3], [1.0; 3], 1.0);
    assert_eq!(light.direction, [0.0, -1.0, 0.0]);
}

#[test]
fn uniform_truncates_to_max_lights() {
    let lights: Vec<Light> = (0..MAX_LIGHTS + 3)
        .map(|i| Light::point([i as f32, 0.0, 0.0], 1.0, [1.0; 3], 1.0))
        .collect();
    let uniform = LightsUniform::new(&lights, [0.1, 0.2, 0.3]);
    assert_eq!(uniform.count as usize, MAX_LIGHTS);
    assert_eq!(uniform.ambient, [0.1, 0.2, 0.3]);
    assert_eq!(uniform.lights[MAX_LIGHTS - 1].position[0], (MAX_LIGHTS - 1) as f32);
}

#[test]
fn unused_slots_stay_zeroed() {
    let uniform = LightsUniform::new(&[Light::directional([1.0, -1.0, 0.0], [1.0; 3], 1.0)], [0.0; 3]);
    assert_eq!(uniform.count, 1);
    for light in &uniform.lights[1..] {
        assert_eq!(light.intensity, 0.0);
        assert_eq!(light.colour, [0.0; 3]);
    }
}

#[test]
fn scene_picks_first_directional_light_as_shadow_caster() {
    let mut scene = Scene::new();
    assert!(scene.shadow_caster().is_none());

    scene.add_light(Light::point([0.0; 3], 4.0, [1.0; 3], 1.0));
    assert!(scene.shadow_caster().is_none());

    scene.add_light(Light::directional([1.0, -1.0, 0.0], [1.0; 3], 1.0));
    scene.add_light(Light::directional([0.0, -1.0, 0.0], [1.0; 3], 1.0));
    let caster = scene.shadow_caster().map(|l| l.direction);
    assert_eq!(caster, Some(Light::directional([1.0, -1.0, 0.0], [1.0; 3], 1.0).direction));
}

#[test]
fn lights_beyond_the_limit_never_cast_shadows() {
    let mut scene = Scene::new();
    for _ in 0..MAX_LIGHTS {
        scene.add_light(Light::point([0.0; 3], 1.0, [1.0; 3], 1.0));
    }
    scene.add_light(Light::directional([0.0, -1.0, 0.0], [1.0; 3], 1.0));
    assert_eq!(scene.lights().len(), MAX_LIGHTS + 1);
    assert!(scene.shadow_caster().is_none());
    assert_eq!(scene.lights_uniform().count as usize, MAX_LIGHTS);
}

#[test]
fn scene_ambient_reaches_the_uniform() {
    let mut scene = Scene::new();
    scene.ambient = [0.25; 3];
    scene.add_light(Light::point([0.0; 3], 1.0, [1.0; 3], 1.0));
    scene.lights_mut()[0].intensity = 3.0;
    let uniform = scene.lights_uniform();
    assert_eq!(uniform.ambient, [0.25; 3]);
    assert_eq!(uniform.lights[0].intensity, 3.0);
}
