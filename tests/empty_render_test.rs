#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour() {
    use lumen_ngin::data_structures::scene::Scene;

    use crate::common::test_utils::{camera_facing_origin, headless, render_scene, renderer, to_rgba8};

    let Some(gpu) = headless() else {
        return;
    };
    let renderer = renderer(&gpu, 0);
    let mut scene = Scene::new();
    let image = render_scene(
        &gpu,
        &renderer,
        &mut scene,
        &camera_facing_origin(5.0),
        wgpu::Color::WHITE,
    );

    let desired_pixel = to_rgba8(wgpu::Color::WHITE);
    for pixel in image.pixels() {
        assert_eq!(*pixel, desired_pixel);
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_keep_flat_colour_when_blurred() {
    use lumen_ngin::data_structures::scene::Scene;

    use crate::common::test_utils::{camera_facing_origin, headless, render_scene, renderer, to_rgba8};

    let Some(gpu) = headless() else {
        return;
    };
    let renderer = renderer(&gpu, 8);
    let mut scene = Scene::new();
    let image = render_scene(
        &gpu,
        &renderer,
        &mut scene,
        &camera_facing_origin(5.0),
        wgpu::Color::BLACK,
    );

    let desired_pixel = to_rgba8(wgpu::Color::BLACK);
    for pixel in image.pixels() {
        assert_eq!(*pixel, desired_pixel);
    }
}
