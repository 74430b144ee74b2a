use cgmath::{InnerSpace, Matrix, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3, Vector4};
use lumen_ngin::transform::Transform;

const EPS: f32 = 1e-5;

fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = a.into();
    let b: [[f32; 4]; 4] = b.into();
    for c in 0..4 {
        for r in 0..4 {
            assert!(
                (a[c][r] - b[c][r]).abs() < 1e-4,
                "matrices differ at column {c}, row {r}: {a:?} vs {b:?}"
            );
        }
    }
}

fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
}

fn expected_world(position: Vector3<f32>, pitch_yaw_roll: Vector3<f32>, scale: Vector3<f32>) -> Matrix4<f32> {
    let rotation = Quaternion::from_angle_y(Rad(pitch_yaw_roll.y))
        * Quaternion::from_angle_x(Rad(pitch_yaw_roll.x))
        * Quaternion::from_angle_z(Rad(pitch_yaw_roll.z));
    Matrix4::from_translation(position)
        * Matrix4::from(rotation)
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

#[test]
fn new_transform_is_identity() {
    let transform = Transform::new();
    assert!(transform.is_dirty());
    assert_eq!(transform.position(), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(transform.rotation(), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(transform.scale(), Vector3::new(1.0, 1.0, 1.0));
    assert_matrix_eq(transform.world_matrix(), Matrix4::identity());
    assert!(!transform.is_dirty());
}

#[test]
fn world_matrix_is_translation_rotation_scale() {
    let mut transform = Transform::new();
    transform.set_position((1.0, 2.0, 3.0));
    transform.set_rotation((0.3, -1.2, 0.7));
    transform.set_scale((2.0, 0.5, 3.0));

    let expected = expected_world(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(0.3, -1.2, 0.7),
        Vector3::new(2.0, 0.5, 3.0),
    );
    assert_matrix_eq(transform.world_matrix(), expected);

    // translation lands in the last column
    let origin = transform.world_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert!((origin.truncate() - Vector3::new(1.0, 2.0, 3.0)).magnitude() < EPS);
}

#[test]
fn every_mutation_invalidates_the_cache() {
    let mut transform = Transform::new();
    let _ = transform.world_matrix();
    assert!(!transform.is_dirty());

    transform.move_absolute((1.0, 0.0, 0.0));
    assert!(transform.is_dirty());
    let _ = transform.world_matrix();

    transform.rotate((0.0, 0.5, 0.0));
    assert!(transform.is_dirty());
    let _ = transform.forward();

    transform.scale_by((2.0, 2.0, 2.0));
    assert!(transform.is_dirty());
    let _ = transform.up();

    transform.move_relative((0.0, 0.0, 1.0));
    assert!(transform.is_dirty());
}

#[test]
fn cached_values_match_a_fresh_transform_after_mutations() {
    let mut transform = Transform::new();
    transform.set_position((4.0, -1.0, 2.0));
    let _ = transform.world_matrix();
    transform.rotate((0.1, 0.2, 0.3));
    let _ = transform.right();
    transform.move_relative((1.0, 1.0, 1.0));
    transform.scale_by((1.0, 3.0, 0.5));
    transform.rotate((-0.4, 1.0, 0.0));

    let mut fresh = Transform::new();
    fresh.set_position(transform.position());
    fresh.set_rotation(transform.rotation());
    fresh.set_scale(transform.scale());

    assert_matrix_eq(transform.world_matrix(), fresh.world_matrix());
    assert_matrix_eq(
        transform.world_inverse_transpose_matrix(),
        fresh.world_inverse_transpose_matrix(),
    );
    assert_vec_eq(transform.right(), fresh.right());
    assert_vec_eq(transform.up(), fresh.up());
    assert_vec_eq(transform.forward(), fresh.forward());
}

#[test]
fn inverse_transpose_undoes_the_transposed_world() {
    let mut transform = Transform::new();
    transform.set_position((3.0, 0.0, -2.0));
    transform.set_rotation((0.5, 0.25, -0.75));
    transform.set_scale((1.0, 4.0, 0.25));

    let product = transform.world_inverse_transpose_matrix() * transform.world_matrix().transpose();
    assert_matrix_eq(product, Matrix4::identity());
}

#[test]
fn singular_world_gives_identity_inverse_transpose() {
    let mut transform = Transform::new();
    transform.set_scale((0.0, 1.0, 1.0));
    assert_matrix_eq(transform.world_inverse_transpose_matrix(), Matrix4::identity());
}

#[test]
fn directions_follow_yaw() {
    let mut transform = Transform::new();
    assert_vec_eq(transform.right(), Vector3::unit_x());
    assert_vec_eq(transform.up(), Vector3::unit_y());
    assert_vec_eq(transform.forward(), Vector3::unit_z());

    // a quarter turn to the right points forward along +X
    transform.set_rotation((0.0, std::f32::consts::FRAC_PI_2, 0.0));
    assert_vec_eq(transform.forward(), Vector3::unit_x());
    assert_vec_eq(transform.right(), -Vector3::unit_z());
    assert_vec_eq(transform.up(), Vector3::unit_y());
}

#[test]
fn move_relative_uses_local_axes_and_move_absolute_does_not() {
    let mut relative = Transform::new();
    relative.set_rotation((0.0, std::f32::consts::FRAC_PI_2, 0.0));
    relative.move_relative((0.0, 0.0, 2.0));
    assert_vec_eq(relative.position(), Vector3::new(2.0, 0.0, 0.0));

    let mut absolute = Transform::new();
    absolute.set_rotation((0.0, std::f32::consts::FRAC_PI_2, 0.0));
    absolute.move_absolute((0.0, 0.0, 2.0));
    assert_vec_eq(absolute.position(), Vector3::new(0.0, 0.0, 2.0));
}

#[test]
fn scale_by_multiplies_component_wise() {
    let mut transform = Transform::new();
    transform.set_scale((2.0, 3.0, 4.0));
    transform.scale_by((0.5, 2.0, 0.25));
    assert_eq!(transform.scale(), Vector3::new(1.0, 6.0, 1.0));
}

#[test]
fn directions_stay_orthonormal() {
    let mut transform = Transform::new();
    transform.set_rotation((0.9, -2.1, 0.4));
    let (r, u, f) = (transform.right(), transform.up(), transform.forward());
    for v in [r, u, f] {
        assert!((v.magnitude() - 1.0).abs() < EPS);
    }
    assert!(r.dot(u).abs() < EPS);
    assert!(u.dot(f).abs() < EPS);
    assert!(f.dot(r).abs() < EPS);
}
