use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Vec3,    // Position in model space
    pub normal: Vec3, // Unit surface normal in model space
    pub uv: Vec2,     // Texture coordinates
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
        }
    }
}
