use glam::Vec3;

use crate::paint::Color;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// The lighting rig: one point light plus ambient fill.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lights {
    pub point: PointLight,
    pub ambient: AmbientLight,
}
