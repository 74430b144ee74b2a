use cgmath::{Deg, InnerSpace, Matrix4, Rad, Vector3, Vector4};
use lumen_ngin::{
    KeyCode,
    camera::{Camera, DEFAULT_FAR, DEFAULT_NEAR, Projection, orthographic_lh, perspective_lh},
    input::Input,
};

const EPS: f32 = 1e-4;

fn project(m: Matrix4<f32>, p: Vector3<f32>) -> Vector3<f32> {
    let clip = m * Vector4::new(p.x, p.y, p.z, 1.0);
    clip.truncate() / clip.w
}

#[test]
fn perspective_maps_near_to_zero_and_far_to_one() {
    let proj = perspective_lh(Rad::from(Deg(60.0)), 16.0 / 9.0, 0.5, 50.0);
    assert!(project(proj, Vector3::new(0.0, 0.0, 0.5)).z.abs() < EPS);
    assert!((project(proj, Vector3::new(0.0, 0.0, 50.0)).z - 1.0).abs() < EPS);
    let mid = project(proj, Vector3::new(0.0, 0.0, 10.0)).z;
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn perspective_respects_field_of_view_and_aspect() {
    let proj = perspective_lh(Rad::from(Deg(90.0)), 2.0, 0.1, 10.0);
    // with a 90 degree fov the top edge is at y == z
    let top = project(proj, Vector3::new(0.0, 4.0, 4.0));
    assert!((top.y - 1.0).abs() < EPS);
    // and the right edge at x == aspect * z
    let right = project(proj, Vector3::new(8.0, 0.0, 4.0));
    assert!((right.x - 1.0).abs() < EPS);
}

#[test]
fn orthographic_maps_extent_to_unit_square() {
    let proj = orthographic_lh(20.0, 10.0, 1.0, 11.0);
    let corner = project(proj, Vector3::new(10.0, 5.0, 1.0));
    assert!((corner.x - 1.0).abs() < EPS);
    assert!((corner.y - 1.0).abs() < EPS);
    assert!(corner.z.abs() < EPS);
    assert!((project(proj, Vector3::new(0.0, 0.0, 11.0)).z - 1.0).abs() < EPS);
}

#[test]
fn view_moves_camera_to_origin_looking_down_z() {
    let mut camera = Camera::perspective((3.0, 2.0, -5.0), 1.0);
    camera.look(0.7, 0.2);
    camera.update_view_matrix();

    let eye = project(camera.view(), camera.transform().position());
    assert!(eye.magnitude() < EPS);

    let ahead = camera.transform().position() + camera.transform().forward() * 4.0;
    let ahead = project(camera.view(), ahead);
    assert!((ahead - Vector3::new(0.0, 0.0, 4.0)).magnitude() < EPS);
}

#[test]
fn point_in_front_of_camera_lands_inside_clip_volume() {
    let camera = Camera::perspective((0.0, 0.0, -10.0), 1.0);
    let ndc = project(camera.projection() * camera.view(), Vector3::new(0.0, 0.0, 0.0));
    assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn pitch_is_clamped() {
    let mut camera = Camera::perspective((0.0, 0.0, 0.0), 1.0);
    camera.look(0.0, 10.0);
    assert!(camera.transform().rotation().x < std::f32::consts::FRAC_PI_2);
    camera.look(0.0, -20.0);
    assert!(camera.transform().rotation().x > -std::f32::consts::FRAC_PI_2);
    // yaw is unbounded
    camera.look(7.0, 0.0);
    assert!((camera.transform().rotation().y - 7.0).abs() < EPS);
}

#[test]
fn resize_updates_projection() {
    let mut camera = Camera::perspective((0.0, 0.0, 0.0), 1.0);
    let before = camera.projection();
    camera.update_projection_matrix(2.0);
    assert_eq!(camera.aspect_ratio(), 2.0);
    assert_ne!(before, camera.projection());
    assert!((camera.projection().x.x * 2.0 - before.x.x).abs() < EPS);
}

#[test]
fn switching_projection_kind_rebuilds_matrix() {
    let mut camera = Camera::new(
        (0.0, 0.0, 0.0),
        2.0,
        Projection::Perspective { fov: Rad::from(Deg(70.0)) },
        DEFAULT_NEAR,
        DEFAULT_FAR,
    );
    camera.set_kind(Projection::Orthographic { width: 10.0 });
    assert_eq!(camera.projection(), orthographic_lh(10.0, 5.0, DEFAULT_NEAR, DEFAULT_FAR));
}

#[test]
fn only_perspective_shows_sky() {
    assert!(Projection::Perspective { fov: Deg(60.0).into() }.shows_sky());
    assert!(!Projection::Orthographic { width: 10.0 }.shows_sky());
}

#[test]
fn update_moves_along_forward_with_w() {
    let mut camera = Camera::perspective((0.0, 0.0, 0.0), 1.0);
    camera.move_speed = 2.0;
    let mut input = Input::new();
    input.press_key(KeyCode::KeyW);
    camera.update(0.5, &input);
    assert!((camera.transform().position() - Vector3::new(0.0, 0.0, 1.0)).magnitude() < EPS);

    input.release_key(KeyCode::KeyW);
    input.press_key(KeyCode::Space);
    camera.update(1.0, &input);
    assert!((camera.transform().position() - Vector3::new(0.0, 2.0, 1.0)).magnitude() < EPS);
}

#[test]
fn mouse_look_needs_left_button() {
    let mut camera = Camera::perspective((0.0, 0.0, 0.0), 1.0);
    let mut input = Input::new();
    input.handle_mouse_motion(100.0, 50.0);
    camera.update(0.016, &input);
    assert_eq!(camera.transform().rotation(), Vector3::new(0.0, 0.0, 0.0));

    input.press_button(lumen_ngin::MouseButton::Left);
    camera.update(0.016, &input);
    let rotation = camera.transform().rotation();
    assert!((rotation.y - 100.0 * camera.look_speed).abs() < EPS);
    assert!((rotation.x - 50.0 * camera.look_speed).abs() < EPS);
}

#[test]
fn uniform_carries_camera_position() {
    let camera = Camera::perspective((1.0, 2.0, 3.0), 1.0);
    let uniform = camera.uniform();
    assert_eq!(uniform.position, [1.0, 2.0, 3.0]);
    assert_eq!(std::mem::size_of_val(&uniform), 144);
}
