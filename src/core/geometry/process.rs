use glam::Vec3;

use crate::core::geometry::Mesh;

pub fn compute_normal(tri: &super::Tri, mesh: &Mesh) -> Vec3 {
    let v0 = mesh.vertices[tri.indices[0] as usize].pos;
    let v1 = mesh.vertices[tri.indices[1] as usize].pos;
    let v2 = mesh.vertices[tri.indices[2] as usize].pos;

    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Rebuild smooth per-vertex normals by averaging the face normals of every
/// triangle touching each vertex.
pub fn compute_normals(mesh: &mut Mesh) {
    let mut accum = vec![Vec3::ZERO; mesh.vertices.len()];

    for tri in &mesh.tris {
        let normal = compute_normal(tri, mesh);

        for i in 0..3 {
            accum[tri.indices[i] as usize] += normal;
        }
    }

    for (vertex, normal) in mesh.vertices.iter_mut().zip(accum) {
        vertex.normal = normal.normalize_or(vertex.normal);
    }
}
