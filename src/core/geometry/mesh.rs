use super::{process, Tri, Vertex};
use crate::core::texture::Texture;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>, // Vertex buffer
    pub tris: Vec<Tri>,        // Triangles
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tris: Vec::new(),
        }
    }

    /// Generate a UV sphere around the origin with the y axis as the pole.
    ///
    /// `sectors` divides the sphere around the equator, `stacks` from pole to
    /// pole. Each stack shares a seam column so the texture wraps cleanly,
    /// hence (sectors + 1) vertices per ring. Winding is chosen so face
    /// normals point outward.
    pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Self {
        assert!(sectors >= 3 && stacks >= 2, "degenerate sphere");

        let mut mesh = Mesh::new();
        mesh.vertices
            .reserve(((stacks + 1) * (sectors + 1)) as usize);

        for i in 0..=stacks {
            // From +pi/2 (north pole) down to -pi/2.
            let polar = PI / 2.0 - PI * i as f32 / stacks as f32;
            let y = radius * polar.sin();
            let ring = radius * polar.cos();

            for j in 0..=sectors {
                let theta = 2.0 * PI * j as f32 / sectors as f32;
                let pos = Vec3::new(ring * theta.cos(), y, ring * theta.sin());

                mesh.vertices.push(Vertex {
                    pos,
                    normal: pos.normalize_or(Vec3::Y),
                    uv: Vec2::new(
                        j as f32 / sectors as f32,
                        1.0 - i as f32 / stacks as f32,
                    ),
                });
            }
        }

        mesh.tris
            .reserve(((2 * stacks - 2) * sectors) as usize);
        for i in 0..stacks {
            let k1 = i * (sectors + 1);
            let k2 = k1 + sectors + 1;

            for j in 0..sectors {
                let a = k1 + j;
                let b = k2 + j;
                let c = k1 + j + 1;
                let d = k2 + j + 1;

                // Top stack collapses the first corner, bottom stack the last.
                if i != 0 {
                    mesh.tris.push(Tri::new([a, c, b]));
                }
                if i != stacks - 1 {
                    mesh.tris.push(Tri::new([c, d, b]));
                }
            }
        }

        mesh
    }

    /// Push every vertex along its normal by the sampled height times
    /// `scale`, then rebuild smooth normals. This is how the moon's relief
    /// map becomes actual geometry.
    pub fn displace(&mut self, heightmap: &Texture, scale: f32) {
        for vertex in &mut self.vertices {
            let height = heightmap.sample_scalar(vertex.uv);
            vertex.pos += vertex.normal * (height * scale);
        }
        process::compute_normals(self);
    }
}
