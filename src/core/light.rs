use crate::core::material::Material;
use crate::core::Color;
use glam::Vec3;

/// The two kinds of lights the scene uses.
#[derive(Clone, Debug)]
pub enum Light {
    /// A directional light has a constant direction and does not attenuate with distance.
    Directional {
        /// The direction the light travels along.
        /// (For example, (0, -1, 0) for light coming from above.)
        direction: Vec3,
        /// The light's color.
        color: Color,
        /// A scalar multiplier for the light's strength.
        intensity: f32,
    },
    /// A hemisphere light blends a sky and a ground color based on how far
    /// the surface normal points up, giving soft ambient fill.
    Hemisphere {
        /// Color contributed to upward-facing surfaces.
        sky: Color,
        /// Color contributed to downward-facing surfaces.
        ground: Color,
        /// A scalar multiplier for the light's strength.
        intensity: f32,
    },
}

impl Light {
    /// A directional light placed at `position` shining toward the origin.
    pub fn directional_from(position: Vec3, color: Color, intensity: f32) -> Self {
        Light::Directional {
            direction: (-position).normalize(),
            color,
            intensity,
        }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Light::Hemisphere {
            sky,
            ground,
            intensity,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional { intensity, .. } => *intensity,
            Light::Hemisphere { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Light::Directional { intensity, .. } => *intensity = value,
            Light::Hemisphere { intensity, .. } => *intensity = value,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Light::Directional {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

pub trait LightingModel {
    /// Computes the final color for a fragment given the scene's lighting.
    ///
    /// - `frag_pos`: the world-space position of the fragment.
    /// - `normal`: the surface normal (should be normalized).
    /// - `view_dir`: the normalized direction from the fragment to the camera.
    /// - `lights`: a slice of lights in the scene.
    /// - `material`: the material properties of the fragment.
    /// - `albedo`: the already-sampled surface color at the fragment.
    fn shade(
        &self,
        frag_pos: Vec3,
        normal: Vec3,
        view_dir: Vec3,
        lights: &[Light],
        material: &Material,
        albedo: Color,
    ) -> Color;
}

/// Phong shading: lambertian diffuse plus an optional specular highlight,
/// with hemisphere lights acting as the ambient term.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhongShading;

impl LightingModel for PhongShading {
    fn shade(
        &self,
        _frag_pos: Vec3,
        normal: Vec3,
        view_dir: Vec3,
        lights: &[Light],
        material: &Material,
        albedo: Color,
    ) -> Color {
        let mut final_color = Color::new(0.0, 0.0, 0.0);

        for light in lights {
            match light {
                Light::Directional {
                    direction,
                    color,
                    intensity,
                } => {
                    // Diffuse
                    let light_dir = -direction.normalize();
                    let diff = normal.dot(light_dir).max(0.0);
                    final_color = final_color + albedo * *color * (diff * intensity);

                    // Specular, skipped entirely for matte materials
                    if material.shininess > 0.0 {
                        let halfway = (light_dir + view_dir).normalize();
                        let spec = normal.dot(halfway).max(0.0).powf(material.shininess);
                        final_color = final_color + *color * (spec * intensity);
                    }
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    // Blend sky/ground by how far the normal points up.
                    let w = normal.y * 0.5 + 0.5;
                    let hemi = ground.lerp(sky, w) * *intensity;
                    final_color = final_color + albedo * hemi;
                }
            }
        }

        final_color.clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;

    fn matte() -> Material {
        Material::phong("matte", None, 0.0)
    }

    #[test]
    fn directional_is_lambertian() {
        let lights = [Light::Directional {
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Color::WHITE,
            intensity: 1.0,
        }];
        let shade = |normal: Vec3| {
            PhongShading.shade(
                Vec3::ZERO,
                normal,
                Vec3::Z,
                &lights,
                &matte(),
                Color::WHITE,
            )
        };

        // Facing the light head on: full intensity.
        let lit = shade(Vec3::Z);
        assert!((lit.r - 1.0).abs() < 1e-6);
        // Facing away: dark.
        let dark = shade(-Vec3::Z);
        assert!(dark.r.abs() < 1e-6);
        // Grazing 60 degrees: cos factor.
        let grazing = shade(Vec3::new(0.0, 3f32.sqrt() / 2.0, 0.5).normalize());
        assert!((grazing.r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn directional_scales_with_intensity() {
        let mut light = Light::Directional {
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Color::WHITE,
            intensity: 1.0,
        };
        light.set_intensity(0.25);
        let out = PhongShading.shade(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Z,
            std::slice::from_ref(&light),
            &matte(),
            Color::WHITE,
        );
        assert!((out.r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn hemisphere_blends_sky_and_ground() {
        let lights = [Light::hemisphere(Color::BLUE, Color::RED, 1.0)];
        let shade = |normal: Vec3| {
            PhongShading.shade(
                Vec3::ZERO,
                normal,
                Vec3::Z,
                &lights,
                &matte(),
                Color::WHITE,
            )
        };

        let up = shade(Vec3::Y);
        assert!((up.b - 1.0).abs() < 1e-6 && up.r.abs() < 1e-6);
        let down = shade(-Vec3::Y);
        assert!((down.r - 1.0).abs() < 1e-6 && down.b.abs() < 1e-6);
        let side = shade(Vec3::X);
        assert!((side.r - 0.5).abs() < 1e-6 && (side.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn output_is_clamped() {
        let lights = [
            Light::Directional {
                direction: -Vec3::Z,
                color: Color::WHITE,
                intensity: 2.0,
            },
            Light::hemisphere(Color::WHITE, Color::WHITE, 1.0),
        ];
        let out = PhongShading.shade(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Z,
            &lights,
            &matte(),
            Color::WHITE,
        );
        assert!(out.r <= 1.0 && out.g <= 1.0 && out.b <= 1.0);
    }
}
