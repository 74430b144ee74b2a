use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use lumen_ngin::pipelines::{
    post_process::PostUniform,
    shadow::{SHADOW_DISTANCE, SHADOW_EXTENT, ShadowUniform, light_view_projection},
};

const EPS: f32 = 1e-4;

fn to_ndc(view: Matrix4<f32>, projection: Matrix4<f32>, p: Vector3<f32>) -> Vector3<f32> {
    let clip = projection * view * Vector4::new(p.x, p.y, p.z, 1.0);
    clip.truncate() / clip.w
}

#[test]
fn origin_sits_in_the_middle_of_the_depth_range() {
    for direction in [[1.0, -1.0, 1.0], [0.0, -1.0, 0.0], [0.3, -0.2, -0.9]] {
        let (view, projection) = light_view_projection(direction, SHADOW_DISTANCE, SHADOW_EXTENT);
        let ndc = to_ndc(view, projection, Vector3::new(0.0, 0.0, 0.0));
        assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS);
        assert!((ndc.z - 0.5).abs() < EPS, "{direction:?}: {ndc:?}");
    }
}

#[test]
fn depth_grows_along_the_light_direction() {
    let (view, projection) = light_view_projection([0.0, -1.0, 0.0], 10.0, 20.0);
    let eye = to_ndc(view, projection, Vector3::new(0.0, 10.0, 0.0));
    let far = to_ndc(view, projection, Vector3::new(0.0, -10.0, 0.0));
    assert!(eye.z.abs() < EPS);
    assert!((far.z - 1.0).abs() < EPS);
}

#[test]
fn straight_down_light_still_covers_the_extent() {
    let (view, projection) = light_view_projection([0.0, -1.0, 0.0], 10.0, 20.0);
    let edge_x = to_ndc(view, projection, Vector3::new(10.0, 0.0, 0.0));
    let edge_z = to_ndc(view, projection, Vector3::new(0.0, 0.0, 10.0));
    for v in [edge_x, edge_z] {
        assert!(v.x.is_finite() && v.y.is_finite());
        assert!((v.x.abs().max(v.y.abs()) - 1.0).abs() < EPS, "{v:?}");
    }
}

#[test]
fn identity_shadow_uniform() {
    let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
    let uniform = ShadowUniform::identity();
    assert_eq!(uniform.view, identity);
    assert_eq!(uniform.projection, identity);
}

#[test]
fn post_uniform_clamps_radius_and_inverts_size() {
    let uniform = PostUniform::new(800, 400, 1000);
    assert_eq!(uniform.blur_radius, lumen_ngin::config::MAX_BLUR_RADIUS as i32);
    assert_eq!(uniform.pixel_size, [1.0 / 800.0, 1.0 / 400.0]);
    assert_eq!(std::mem::size_of::<PostUniform>(), 16);

    let empty = PostUniform::new(0, 0, 0);
    assert_eq!(empty.pixel_size, [1.0, 1.0]);
    assert_eq!(empty.blur_radius, 0);
}
