use crate::core::{Color, Scene, Side};
use crate::debug_print;
use crate::Metrics;
use glam::{Mat3, Vec2, Vec4};
use minifb::Window;
use rayon::prelude::*;
use std::cell::RefCell;
use std::io;

pub mod buffer;
pub mod clipper;
pub mod rasterizer;

pub use buffer::{Buffer, FrameBuffer, TermBuffer};
pub use clipper::{ClipTriangle, ClipVertex, Clipper};
pub use rasterizer::{Rasterizer, ShadeContext};

#[derive(Clone)]
pub struct Fragment {
    pub screen_pos: Vec2,
    pub depth: f32,
    pub color: Color,
    pub alpha: f32,
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            screen_pos: Vec2::ZERO,
            depth: f32::INFINITY,
            color: Color::WHITE,
            alpha: 1.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Opaque,
    Transparent,
}

/// A graphics rendering pipeline that processes 3D geometry into 2D screen output
///
/// The pipeline handles:
/// - Vertex transformation to clip space and triangle clipping
/// - Rasterization of triangles to shaded fragments
/// - Fragment writes into a depth-tested framebuffer, opaque pass first and
///   translucent entities blended on top
/// - Presentation to a minifb window or the terminal
pub struct Pipeline<B: Buffer> {
    pub width: usize,                  // Screen width in pixels
    pub height: usize,                 // Screen height in pixels
    front_buffer: RefCell<B>,          // Currently displayed buffer
    back_buffer: RefCell<B>,           // Buffer being rendered to
    clipper: Clipper,                  // Clips triangles against the view frustum
    rasterizer: Rasterizer,            // Converts triangles to shaded fragments
    fragments: RefCell<Vec<Fragment>>, // Scratch output from rasterization
    metrics: Metrics,                  // Performance metrics
}

impl<B: Buffer> Pipeline<B> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            front_buffer: RefCell::new(B::new(width, height)),
            back_buffer: RefCell::new(B::new(width, height)),
            clipper: Clipper::new(),
            rasterizer: Rasterizer::new(width, height),
            fragments: RefCell::new(Vec::with_capacity(1024)),
            metrics: Metrics::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.rasterizer.resize(width, height);
        self.front_buffer.borrow_mut().resize(width, height);
        self.back_buffer.borrow_mut().resize(width, height);
    }

    /// Render one frame of the scene plus the overlay text, then present.
    pub fn render_frame(
        &self,
        scene: &Scene,
        overlay: &[String],
        window: Option<&mut Window>,
    ) -> io::Result<()> {
        self.draw(scene, overlay);

        {
            let mut back = self.back_buffer.borrow_mut();
            if let Some(window) = window {
                back.present_window(window)?;
            } else {
                back.present()?;
            }
        }

        self.swap_buffers();
        Ok(())
    }

    /// Draw the scene and overlay into the back buffer without presenting.
    pub fn draw(&self, scene: &Scene, overlay: &[String]) {
        self.back_buffer.borrow_mut().clear();

        self.draw_pass(scene, Pass::Opaque);
        self.draw_pass(scene, Pass::Transparent);

        let mut back = self.back_buffer.borrow_mut();
        for (i, line) in overlay.iter().enumerate() {
            back.draw_text(line, 10, 10 + (i as i32) * 18, Color::WHITE);
        }
    }

    fn draw_pass(&self, scene: &Scene, pass: Pass) {
        let camera = &scene.camera;
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let camera_pos = camera.pos;

        for entity in &scene.entities {
            let wanted = if entity.material.is_transparent() {
                Pass::Transparent
            } else {
                Pass::Opaque
            };
            if wanted != pass {
                continue;
            }

            let model = entity.transform.matrix();
            let mvp = view_proj * model;
            let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
            let ctx = ShadeContext {
                material: &entity.material,
                lights: &scene.lights,
                camera_pos,
            };

            let mesh = &entity.mesh;
            let clipper = &self.clipper;
            let rasterizer = &self.rasterizer;
            let flip_facing = entity.material.side == Side::Back;

            let mut fragments = self.fragments.borrow_mut();
            *fragments = mesh
                .tris
                .par_iter()
                .flat_map(|tri| {
                    // Backface culling in world space: a front face's
                    // geometric normal points away from the camera ray.
                    let face_normal = tri.face_normal(&mesh.vertices);
                    let world_normal = normal_matrix * face_normal;
                    let centroid = model.transform_point3(tri.centroid(&mesh.vertices));
                    let facing_camera = world_normal.dot(centroid - camera_pos) < 0.0;
                    if facing_camera == flip_facing {
                        return Vec::new();
                    }

                    let clip_tri = ClipTriangle {
                        vertices: tri.indices.map(|idx| {
                            let v = &mesh.vertices[idx as usize];
                            ClipVertex {
                                position: mvp * Vec4::from((v.pos, 1.0)),
                                world: model.transform_point3(v.pos),
                                normal: (normal_matrix * v.normal).normalize_or(v.normal),
                                uv: v.uv,
                            }
                        }),
                    };

                    clipper
                        .clip_triangle(&clip_tri)
                        .iter()
                        .flat_map(|t| rasterizer.rasterize_triangle(t, &ctx))
                        .collect::<Vec<_>>()
                })
                .collect();

            debug_print!(
                "entity '{}': {} fragments",
                entity.name,
                fragments.len()
            );

            let mut back = self.back_buffer.borrow_mut();
            let transparent = pass == Pass::Transparent;
            for fragment in fragments.iter() {
                let pos = (
                    fragment.screen_pos.x as usize,
                    fragment.screen_pos.y as usize,
                );
                if transparent {
                    back.blend_pixel(pos, fragment.depth, fragment.color, fragment.alpha);
                } else {
                    back.set_pixel(pos, fragment.depth, fragment.color);
                }
            }
        }
    }

    pub fn swap_buffers(&self) {
        std::mem::swap(
            &mut *self.front_buffer.borrow_mut(),
            &mut *self.back_buffer.borrow_mut(),
        );
    }

    pub fn update_metrics(&mut self, frame_delta: std::time::Duration) {
        self.metrics.update(frame_delta);
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn front_buffer(&self) -> &RefCell<B> {
        &self.front_buffer
    }

    pub fn back_buffer(&self) -> &RefCell<B> {
        &self.back_buffer
    }
}
