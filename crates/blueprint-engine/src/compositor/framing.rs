use glam::Vec3;

use crate::scene::PerspectiveCamera;

/// Camera setup shared by every view, plus the rule that pulls the camera
/// back as the surface narrows.
#[derive(Debug, Clone, PartialEq)]
pub struct FramingConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Aimed at once when a camera is created.
    pub target: Vec3,
    /// Width of the screen the window lives on, in logical pixels.
    pub screen_width: f32,
    /// Physical pixels per logical pixel of the surface.
    pub scale_factor: f32,
    pub distance_divisor: f32,
    pub min_distance: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 2000.0,
            position: Vec3::new(0.0, 0.0, 180.0),
            target: Vec3::new(0.0, 5.0, 0.0),
            screen_width: 1920.0,
            scale_factor: 1.0,
            distance_divisor: 3.0,
            min_distance: 180.0,
        }
    }
}

impl FramingConfig {
    /// Camera Z for a surface `width` physical pixels wide:
    /// `max((screen_width - logical width) / divisor, min_distance)`.
    ///
    /// The divisor and minimum are world units tuned for logical pixels, so
    /// the width is scaled down first.
    pub fn camera_distance(&self, width: u32) -> f32 {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        let width = width as f32 / scale;
        ((self.screen_width - width) / self.distance_divisor).max(self.min_distance)
    }

    /// A camera on `layer` only, aimed at the framing target.
    pub fn camera(&self, aspect: f32, layer: u8) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(self.fov_y_degrees, aspect, self.near, self.far);
        camera.position = self.position;
        camera.layers.disable_all();
        camera.layers.enable(layer);
        camera.look_at(self.target);
        camera
    }
}
