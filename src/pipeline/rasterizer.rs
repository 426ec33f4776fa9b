use crate::core::{Light, LightingModel, Material, PhongShading};
use crate::pipeline::clipper::ClipTriangle;
use crate::pipeline::Fragment;
use glam::{Vec2, Vec3};

/// Everything fragment shading needs besides the triangle itself.
pub struct ShadeContext<'a> {
    pub material: &'a Material,
    pub lights: &'a [Light],
    pub camera_pos: Vec3,
}

pub struct Rasterizer {
    width: usize,
    height: usize,
    shading: PhongShading,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shading: PhongShading,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Rasterize one clipped triangle into shaded fragments.
    ///
    /// Depth interpolates in screen space; the surface attributes (uv,
    /// normal, world position) interpolate perspective-correctly via 1/w.
    pub fn rasterize_triangle(&self, tri: &ClipTriangle, ctx: &ShadeContext) -> Vec<Fragment> {
        let mut fragments = Vec::new();

        let mut inv_w = [0.0f32; 3];
        let mut ndc = [Vec3::ZERO; 3];
        let mut screen = [Vec2::ZERO; 3];
        for i in 0..3 {
            let p = tri.vertices[i].position;
            if p.w <= 1e-6 {
                // Clipping guarantees w > 0 for visible geometry; anything
                // left at the axis is unrenderable.
                return fragments;
            }
            inv_w[i] = 1.0 / p.w;
            ndc[i] = Vec3::new(p.x, p.y, p.z) * inv_w[i];
            screen[i] = Vec2::new(
                (ndc[i].x + 1.0) * 0.5 * self.width as f32,
                (1.0 - ndc[i].y) * 0.5 * self.height as f32,
            );
        }

        // Compute bounding box, clamped to screen
        let mut bbox_min = Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0);
        let mut bbox_max = Vec2::new(0.0, 0.0);
        for v in &screen {
            bbox_min.x = bbox_min.x.min(v.x);
            bbox_min.y = bbox_min.y.min(v.y);
            bbox_max.x = bbox_max.x.max(v.x);
            bbox_max.y = bbox_max.y.max(v.y);
        }
        bbox_min.x = bbox_min.x.max(0.0);
        bbox_min.y = bbox_min.y.max(0.0);
        bbox_max.x = bbox_max.x.min((self.width - 1) as f32);
        bbox_max.y = bbox_max.y.min((self.height - 1) as f32);

        let (v0, v1, v2) = (screen[0], screen[1], screen[2]);
        for y in bbox_min.y as i32..=bbox_max.y as i32 {
            for x in bbox_min.x as i32..=bbox_max.x as i32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric(p, v0, v1, v2) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * ndc[0].z + w1 * ndc[1].z + w2 * ndc[2].z;

                // Perspective-correct weights
                let pw = [w0 * inv_w[0], w1 * inv_w[1], w2 * inv_w[2]];
                let pw_sum = pw[0] + pw[1] + pw[2];
                if pw_sum <= 0.0 {
                    continue;
                }
                let pw = [pw[0] / pw_sum, pw[1] / pw_sum, pw[2] / pw_sum];

                let uv = tri.vertices[0].uv * pw[0]
                    + tri.vertices[1].uv * pw[1]
                    + tri.vertices[2].uv * pw[2];
                let albedo = ctx.material.albedo(uv);

                let color = if ctx.material.lit {
                    let world = tri.vertices[0].world * pw[0]
                        + tri.vertices[1].world * pw[1]
                        + tri.vertices[2].world * pw[2];
                    let normal = (tri.vertices[0].normal * pw[0]
                        + tri.vertices[1].normal * pw[1]
                        + tri.vertices[2].normal * pw[2])
                        .normalize_or(Vec3::Y);
                    let view_dir = (ctx.camera_pos - world).normalize_or(Vec3::Z);
                    self.shading
                        .shade(world, normal, view_dir, ctx.lights, ctx.material, albedo)
                } else {
                    albedo
                };

                fragments.push(Fragment {
                    screen_pos: Vec2::new(x as f32, y as f32),
                    depth,
                    color,
                    alpha: ctx.material.opacity,
                });
            }
        }

        fragments
    }
}

pub fn barycentric(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom.abs() < 1e-10 {
        // Degenerate triangle
        return None;
    }
    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some((w0, w1, w2))
}
