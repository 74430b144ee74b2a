//! Fly-through camera: view/projection matrices and their GPU uniform.
//!
//! The camera is driven by its own [`Transform`]. The view matrix is a
//! left-handed "look to" along the transform's forward vector; the projection
//! maps clip depth to `[0, 1]`. Both must be refreshed explicitly:
//! [`Camera::update`] refreshes the view each frame and the run loop calls
//! [`Camera::update_projection_matrix`] whenever the window is resized.

use std::f32::consts::FRAC_PI_2;

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, Vector3};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{input::Input, transform::Transform};

pub const DEFAULT_FOV: Rad<f32> = Rad(FRAC_PI_2);
pub const DEFAULT_NEAR: f32 = 0.01;
pub const DEFAULT_FAR: f32 = 100.0;

// Keeps the view from flipping when looking straight up or down.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective { fov: Rad<f32> },
    /// `width` world units across; the height follows the aspect ratio.
    Orthographic { width: f32 },
}

impl Projection {
    /// The sky cube only surrounds the eye under a perspective projection;
    /// an orthographic one shrinks it to a patch, so the sky is left out.
    pub fn shows_sky(&self) -> bool {
        matches!(self, Projection::Perspective { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    transform: Transform,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    kind: Projection,
    near: f32,
    far: f32,
    aspect_ratio: f32,
    pub move_speed: f32,
    /// Radians per pixel of mouse movement.
    pub look_speed: f32,
}

impl Camera {
    pub fn new(
        position: impl Into<Vector3<f32>>,
        aspect_ratio: f32,
        kind: Projection,
        near: f32,
        far: f32,
    ) -> Self {
        let mut transform = Transform::new();
        transform.set_position(position);
        let mut camera = Self {
            transform,
            view: Matrix4::from_scale(1.0),
            projection: Matrix4::from_scale(1.0),
            kind,
            near,
            far,
            aspect_ratio,
            move_speed: 5.0,
            look_speed: 0.004,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix(aspect_ratio);
        camera
    }

    /// Perspective camera with a 90 degree field of view.
    pub fn perspective(position: impl Into<Vector3<f32>>, aspect_ratio: f32) -> Self {
        Self::new(
            position,
            aspect_ratio,
            Projection::Perspective { fov: DEFAULT_FOV },
            DEFAULT_NEAR,
            DEFAULT_FAR,
        )
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn kind(&self) -> Projection {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Projection) {
        self.kind = kind;
        self.update_projection_matrix(self.aspect_ratio);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Changes made through this reference show up after the next
    /// [`update_view_matrix`](Self::update_view_matrix).
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn update_view_matrix(&mut self) {
        let eye = Point3::from_vec(self.transform.position());
        self.view = Matrix4::look_to_lh(eye, self.transform.forward(), Vector3::unit_y());
    }

    pub fn update_projection_matrix(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection = match self.kind {
            Projection::Perspective { fov } => perspective_lh(fov, aspect_ratio, self.near, self.far),
            Projection::Orthographic { width } => {
                orthographic_lh(width, width / aspect_ratio, self.near, self.far)
            }
        };
    }

    /// Applies fly controls from `input` and refreshes the view matrix.
    ///
    /// W/S move forward/back, A/D strafe, Space/X move along world up/down.
    /// Shift speeds up, Ctrl slows down. Holding the left mouse button turns
    /// mouse motion into yaw and pitch.
    pub fn update(&mut self, dt: f32, input: &Input) {
        let mut speed = self.move_speed * dt;
        if input.key_down(KeyCode::ShiftLeft) || input.key_down(KeyCode::ShiftRight) {
            speed *= 3.0;
        }
        if input.key_down(KeyCode::ControlLeft) || input.key_down(KeyCode::ControlRight) {
            speed *= 0.25;
        }

        let axis = |positive: KeyCode, negative: KeyCode| {
            (input.key_down(positive) as i8 - input.key_down(negative) as i8) as f32
        };
        let local = Vector3::new(
            axis(KeyCode::KeyD, KeyCode::KeyA),
            0.0,
            axis(KeyCode::KeyW, KeyCode::KeyS),
        );
        if local != Vector3::new(0.0, 0.0, 0.0) {
            self.transform.move_relative(local * speed);
        }
        let vertical = axis(KeyCode::Space, KeyCode::KeyX);
        if vertical != 0.0 {
            self.transform.move_absolute((0.0, vertical * speed, 0.0));
        }

        if input.mouse_down(MouseButton::Left) {
            let (dx, dy) = input.mouse_delta();
            self.look(dx as f32 * self.look_speed, dy as f32 * self.look_speed);
        }

        self.update_view_matrix();
    }

    /// Turns the camera by `yaw` and `pitch` radians, clamping the pitch.
    pub fn look(&mut self, yaw: f32, pitch: f32) {
        let current = self.transform.rotation();
        let pitch = (current.x + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.transform
            .set_rotation((pitch, current.y + yaw, current.z));
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view.into(),
            projection: self.projection.into(),
            position: self.transform.position().into(),
            _padding: 0.0,
        }
    }
}

/// Left-handed perspective projection with clip depth in `[0, 1]`.
pub fn perspective_lh(fov: Rad<f32>, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
    let h = 1.0 / (fov.0 * 0.5).tan();
    let w = h / aspect_ratio;
    let range = far / (far - near);
    #[rustfmt::skip]
    let projection = Matrix4::new(
        w,   0.0, 0.0,            0.0,
        0.0, h,   0.0,            0.0,
        0.0, 0.0, range,          1.0,
        0.0, 0.0, -range * near,  0.0,
    );
    projection
}

/// Left-handed orthographic projection centred on the view axis, clip depth in `[0, 1]`.
pub fn orthographic_lh(width: f32, height: f32, near: f32, far: f32) -> Matrix4<f32> {
    let range = 1.0 / (far - near);
    #[rustfmt::skip]
    let projection = Matrix4::new(
        2.0 / width, 0.0,          0.0,            0.0,
        0.0,         2.0 / height, 0.0,            0.0,
        0.0,         0.0,          range,          0.0,
        0.0,         0.0,          -range * near,  1.0,
    );
    projection
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: f32,
}
