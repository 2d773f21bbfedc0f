use crate::paint::Color;

/// Flat-shaded Blinn-Phong surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
        }
    }
}

/// Unlit line material.
///
/// With `depth_test` off the lines draw over everything already in the view,
/// which is what keeps the blueprint wireframe readable through the hull.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMaterial {
    pub color: Color,
    pub opacity: f32,
    pub depth_test: bool,
}

impl LineMaterial {
    /// Final premultiplied color uploaded to the shader.
    #[inline]
    pub fn resolved_color(&self) -> Color {
        self.color.faded(self.opacity)
    }
}

impl Default for LineMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            depth_test: true,
        }
    }
}
