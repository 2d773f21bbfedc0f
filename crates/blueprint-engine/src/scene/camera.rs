use glam::{Mat4, Quat, Vec3};

use super::Layers;

/// Perspective camera with an explicit orientation.
///
/// `look_at` fixes the orientation once; moving `position` afterwards does
/// not re-aim the camera. The resize framing rule relies on this: the camera
/// dollies along Z while keeping its original tilt.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub layers: Layers,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            layers: Layers::default(),
        }
    }

    /// Rotates the camera to face `target` from its current position, +Y up.
    ///
    /// A target at the camera position leaves the orientation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() < 1e-12 {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.orientation = rotation.normalize();
    }

    /// Camera-to-world matrix.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Right-handed projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Whether a node on `layers` is visible to this camera.
    #[inline]
    pub fn sees(&self, layers: Layers) -> bool {
        self.layers.test(layers)
    }
}
