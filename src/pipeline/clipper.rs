use glam::{Vec2, Vec3, Vec4};

#[derive(Clone, Debug)]
pub struct ClipVertex {
    /// Homogeneous clip-space position.
    pub position: Vec4,
    /// World-space position, carried through for shading.
    pub world: Vec3,
    /// World-space surface normal.
    pub normal: Vec3,
    pub uv: Vec2,
}

impl ClipVertex {
    pub fn lerp(&self, other: &ClipVertex, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

#[derive(Clone)]
pub struct ClipTriangle {
    pub vertices: [ClipVertex; 3],
}

/// Clips triangles against the canonical clip volume
/// (-w <= x <= w, -w <= y <= w, 0 <= z <= w for our [0,1]-depth projection).
/// The planes are constant in clip space, so nothing here depends on the
/// camera.
pub struct Clipper {
    frustum_planes: [Vec4; 6],
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            frustum_planes: [
                Vec4::new(1.0, 0.0, 0.0, 1.0),  // left:   x >= -w
                Vec4::new(-1.0, 0.0, 0.0, 1.0), // right:  x <= w
                Vec4::new(0.0, 1.0, 0.0, 1.0),  // bottom: y >= -w
                Vec4::new(0.0, -1.0, 0.0, 1.0), // top:    y <= w
                Vec4::new(0.0, 0.0, 1.0, 0.0),  // near:   z >= 0
                Vec4::new(0.0, 0.0, -1.0, 1.0), // far:    z <= w
            ],
        }
    }

    pub fn clip_triangle(&self, triangle: &ClipTriangle) -> Vec<ClipTriangle> {
        if self.is_degenerate(triangle) {
            return Vec::new();
        }

        let mut triangles = vec![triangle.clone()];

        // Clip against each frustum plane
        for plane in &self.frustum_planes {
            triangles = self.clip_against_plane(triangles, *plane);
            if triangles.is_empty() {
                break;
            }
        }

        triangles
    }

    fn is_degenerate(&self, triangle: &ClipTriangle) -> bool {
        // Check if any two vertices are effectively the same point
        let epsilon = 1e-12;
        for i in 0..3 {
            let j = (i + 1) % 3;
            let diff = triangle.vertices[i].position - triangle.vertices[j].position;
            if diff.length_squared() < epsilon {
                return true;
            }
        }
        false
    }

    fn clip_against_plane(&self, triangles: Vec<ClipTriangle>, plane: Vec4) -> Vec<ClipTriangle> {
        let mut result = Vec::new();

        for triangle in triangles {
            let distances = [
                self.distance_to_plane(&triangle.vertices[0], plane),
                self.distance_to_plane(&triangle.vertices[1], plane),
                self.distance_to_plane(&triangle.vertices[2], plane),
            ];

            let inside = [
                distances[0] >= 0.0,
                distances[1] >= 0.0,
                distances[2] >= 0.0,
            ];
            let inside_count = inside.iter().filter(|&&x| x).count();

            match inside_count {
                0 => continue,              // Triangle is completely outside
                3 => result.push(triangle), // Triangle is completely inside
                1 | 2 => {
                    let clipped = self.clip_triangle_against_plane(triangle, distances);
                    result.extend(clipped);
                }
                _ => unreachable!(),
            }
        }

        result
    }

    fn distance_to_plane(&self, vertex: &ClipVertex, plane: Vec4) -> f32 {
        plane.dot(vertex.position)
    }

    fn clip_triangle_against_plane(
        &self,
        triangle: ClipTriangle,
        distances: [f32; 3],
    ) -> Vec<ClipTriangle> {
        let mut result = Vec::new();
        let mut new_verts = Vec::new();

        // Walk each edge; keep inside vertices, insert the crossing point on
        // edges that straddle the plane.
        for i in 0..3 {
            let j = (i + 1) % 3;

            let v0 = &triangle.vertices[i];
            let v1 = &triangle.vertices[j];
            let d0 = distances[i];
            let d1 = distances[j];

            if d0 >= 0.0 {
                new_verts.push(v0.clone());
            }

            if (d0 < 0.0) != (d1 < 0.0) {
                let t = d0 / (d0 - d1);
                new_verts.push(v0.lerp(v1, t));
            }
        }

        // Fan the clipped polygon back into triangles
        for i in 1..new_verts.len().saturating_sub(1) {
            result.push(ClipTriangle {
                vertices: [
                    new_verts[0].clone(),
                    new_verts[i].clone(),
                    new_verts[i + 1].clone(),
                ],
            });
        }

        result
    }
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vert(position: Vec4, uv: Vec2) -> ClipVertex {
        ClipVertex {
            position,
            world: position.truncate(),
            normal: Vec3::Z,
            uv,
        }
    }

    fn tri(positions: [Vec4; 3]) -> ClipTriangle {
        ClipTriangle {
            vertices: [
                vert(positions[0], Vec2::new(0.0, 0.0)),
                vert(positions[1], Vec2::new(1.0, 0.0)),
                vert(positions[2], Vec2::new(0.0, 1.0)),
            ],
        }
    }

    #[test]
    fn fully_inside_triangle_passes_through() {
        let clipper = Clipper::new();
        let t = tri([
            Vec4::new(-0.5, -0.5, 0.5, 1.0),
            Vec4::new(0.5, -0.5, 0.5, 1.0),
            Vec4::new(0.0, 0.5, 0.5, 1.0),
        ]);
        let out = clipper.clip_triangle(&t);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn fully_behind_near_plane_is_culled() {
        let clipper = Clipper::new();
        let t = tri([
            Vec4::new(-0.5, -0.5, -0.5, 1.0),
            Vec4::new(0.5, -0.5, -0.5, 1.0),
            Vec4::new(0.0, 0.5, -1.0, 1.0),
        ]);
        assert!(clipper.clip_triangle(&t).is_empty());
    }

    #[test]
    fn straddling_near_plane_splits_into_two() {
        let clipper = Clipper::new();
        // One vertex behind z=0, two in front: clipping yields a quad, fanned
        // into two triangles.
        let t = tri([
            Vec4::new(0.0, 0.0, -0.5, 1.0),
            Vec4::new(0.5, 0.0, 0.5, 1.0),
            Vec4::new(0.0, 0.5, 0.5, 1.0),
        ]);
        let out = clipper.clip_triangle(&t);
        assert_eq!(out.len(), 2);
        for t in &out {
            for v in &t.vertices {
                assert!(v.position.z >= -1e-6);
            }
        }
    }

    #[test]
    fn clip_interpolates_attributes() {
        let clipper = Clipper::new();
        // Edge from z=-1 to z=1 crosses the near plane exactly halfway, so
        // the inserted vertex carries the averaged uv.
        let t = tri([
            Vec4::new(0.0, 0.0, -1.0, 1.0),
            Vec4::new(1.0, 0.0, 1.0, 1.0),
            Vec4::new(0.0, 1.0, 1.0, 1.0),
        ]);
        let out = clipper.clip_triangle(&t);
        assert!(!out.is_empty());
        let mut found_midpoint = false;
        for t in &out {
            for v in &t.vertices {
                if (v.uv - Vec2::new(0.5, 0.0)).length() < 1e-5 {
                    found_midpoint = true;
                }
            }
        }
        assert!(found_midpoint, "expected an interpolated seam vertex");
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let clipper = Clipper::new();
        let p = Vec4::new(0.1, 0.1, 0.5, 1.0);
        let t = tri([p, p, Vec4::new(0.3, 0.1, 0.5, 1.0)]);
        assert!(clipper.clip_triangle(&t).is_empty());
    }
}
