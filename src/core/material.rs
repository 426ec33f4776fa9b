use crate::core::texture::Texture;
use crate::core::Color;
use glam::Vec2;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Which faces of a mesh are rendered. `Back` is used for enclosing shells
/// (starfield, atmosphere) that are viewed from the inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// Base color, multiplied with the texture sample.
    pub base_color: Color,
    pub texture: Option<Arc<Texture>>,
    /// Whether the material reacts to scene lights at all.
    pub lit: bool,
    /// Specular exponent; 0 disables the specular term.
    pub shininess: f32,
    /// 1.0 is fully opaque; anything lower is alpha-blended.
    pub opacity: f32,
    pub side: Side,
}

impl Material {
    /// A light-reactive material (diffuse + optional specular).
    pub fn phong(name: &str, texture: Option<Arc<Texture>>, shininess: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color: Color::WHITE,
            texture,
            lit: true,
            shininess,
            opacity: 1.0,
            side: Side::Front,
        }
    }

    /// An unlit material: the sampled color is the final color.
    pub fn basic(name: &str, base_color: Color, texture: Option<Arc<Texture>>) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            texture,
            lit: false,
            shininess: 0.0,
            opacity: 1.0,
            side: Side::Front,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Surface color at the given UV before lighting.
    pub fn albedo(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(tex) => self.base_color * tex.sample(uv),
            None => self.base_color,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Material '{}' (lit: {}, opacity: {})",
            self.name, self.lit, self.opacity
        )
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::phong("default", None, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn albedo_multiplies_texture_and_base() {
        let tex = Arc::new(Texture::flat(Color::new(0.5, 0.5, 0.5), "half"));
        let mut mat = Material::basic("tinted", Color::new(1.0, 0.5, 0.0), Some(tex));
        let c = mat.albedo(Vec2::new(0.5, 0.5));
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.g - 0.25).abs() < 1e-6);
        assert!(c.b.abs() < 1e-6);

        mat.texture = None;
        assert_eq!(mat.albedo(Vec2::ZERO), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn transparency_threshold() {
        let solid = Material::default();
        assert!(!solid.is_transparent());
        let glassy = Material::basic("shell", Color::BLUE, None).with_opacity(0.2);
        assert!(glassy.is_transparent());
        assert_eq!(glassy.opacity, 0.2);
    }
}
