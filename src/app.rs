//! Application state and event dispatch: everything the front-ends poke at.
//!
//! The front-ends (window or terminal) own the event source and the frame
//! pacing; `App` owns the scene and answers to a fixed set of callbacks:
//! `tick`, `on_pointer_*`, `on_resize`, the slider setters and the live
//! phase action. Keeping the logic here, behind plain method calls, is what
//! lets the tests below drive a full drag gesture without any window.

use glam::{EulerRot, Quat, Vec2, Vec3};
use log::{error, info};
use std::f32::consts::PI;
use std::path::PathBuf;

use crate::core::{
    Camera, Color, Entity, Light, Material, OrbitControls, Scene, Side, Texture, TextureManager,
};
use crate::core::geometry::Mesh;
use crate::phase;

// Per-frame auto-rotation increments, in radians.
const MOON_SPIN_Y: f32 = 0.002;
const MOON_SPIN_X: f32 = 0.0001;
const BACKDROP_SPIN_Y: f32 = 0.0001;
const BACKDROP_SPIN_X: f32 = 0.0005;

const MOON_RADIUS: f32 = 2.0;
const MOON_SEGMENTS: u32 = 128;
const MOON_DISPLACEMENT_SCALE: f32 = 0.1;
const BACKDROP_RADIUS: f32 = 1000.0;
const ATMOSPHERE_RADIUS: f32 = 2.05;
const SHELL_SEGMENTS: u32 = 60;

/// Where the scene's image resources come from.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub assets: PathBuf,
    pub surface: String,
    pub displacement: String,
    pub backdrop: String,
    pub aspect: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    dragging: bool,
    last: Vec2,
}

pub struct App {
    pub scene: Scene,
    pub moon: usize,
    pub backdrop: usize,
    pub atmosphere: usize,
    /// Index of the directional light.
    pub sun: usize,
    /// Index of the hemisphere fill light.
    pub fill: usize,
    pub orbit: Option<OrbitControls>,
    drag: DragState,
}

impl App {
    /// Build the whole scene: camera, the three spheres, both lights.
    /// Missing textures degrade to defaults; a missing orbit capability is
    /// logged and the app runs without camera orbit.
    pub fn assemble(cfg: &SceneConfig, orbit: Option<OrbitControls>) -> Self {
        if orbit.is_none() {
            error!("orbit controls are unavailable; continuing without camera orbit");
        }

        let mut textures = TextureManager::with_base_path(&cfg.assets.to_string_lossy());
        let surface = textures.get_or(&cfg.surface, Texture::flat(Color::GRAY, "flat_surface"));
        let displacement = textures.get_or(
            &cfg.displacement,
            Texture::flat(Color::new(0.5, 0.5, 0.5), "flat_relief"),
        );
        let backdrop_tex = textures.get_or(
            &cfg.backdrop,
            Texture::star_speckle(1024, 512, 4000, 0x5EED),
        );

        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, cfg.aspect);
        let mut scene = Scene::new(camera);

        let mut moon_mesh = Mesh::uv_sphere(MOON_RADIUS, MOON_SEGMENTS, MOON_SEGMENTS);
        moon_mesh.displace(&displacement, MOON_DISPLACEMENT_SCALE);
        let mut moon_entity = Entity::new(
            "moon",
            moon_mesh,
            Material::phong("lunar surface", Some(surface), 0.0),
        );
        moon_entity.transform.rot = Quat::from_euler(EulerRot::XYZ, PI * 0.02, PI * 1.54, 0.0);
        let moon = scene.add_entity(moon_entity);

        let backdrop = scene.add_entity(Entity::new(
            "starfield",
            Mesh::uv_sphere(BACKDROP_RADIUS, SHELL_SEGMENTS, SHELL_SEGMENTS),
            Material::basic("star backdrop", Color::WHITE, Some(backdrop_tex))
                .with_side(Side::Back),
        ));

        let atmosphere = scene.add_entity(Entity::new(
            "atmosphere",
            Mesh::uv_sphere(ATMOSPHERE_RADIUS, SHELL_SEGMENTS, SHELL_SEGMENTS),
            Material::basic("atmosphere glow", Color::hex("4444ff"), None)
                .with_opacity(0.2)
                .with_side(Side::Back),
        ));

        let sun = scene.add_light(Light::directional_from(
            Vec3::new(-100.0, 10.0, 50.0),
            Color::WHITE,
            1.0,
        ));
        let fill = scene.add_light(Light::hemisphere(
            Color::from_hsl(0.6, 1.0, 0.6),
            Color::from_hsl(0.095, 1.0, 0.75),
            0.1,
        ));

        info!(
            "scene assembled: {} entities, {} lights",
            scene.entities.len(),
            scene.lights.len()
        );

        Self {
            scene,
            moon,
            backdrop,
            atmosphere,
            sun,
            fill,
            orbit,
            drag: DragState::default(),
        }
    }

    /// One frame of simulation: auto-rotation plus the orbit update.
    pub fn tick(&mut self) {
        self.scene.entities[self.moon]
            .transform
            .rotate_local(Quat::from_euler(EulerRot::XYZ, MOON_SPIN_X, MOON_SPIN_Y, 0.0));
        self.scene.entities[self.backdrop]
            .transform
            .rotate_local(Quat::from_euler(
                EulerRot::XYZ,
                BACKDROP_SPIN_X,
                BACKDROP_SPIN_Y,
                0.0,
            ));

        if let Some(orbit) = &mut self.orbit {
            orbit.update(&mut self.scene.camera);
        }
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.drag.dragging = true;
        self.drag.last = Vec2::new(x, y);
    }

    /// Pointer motion. While dragging, the pixel delta maps 1:1 through
    /// degrees into radians and composes onto the moon's orientation in
    /// world space; the same delta feeds the camera orbit when present.
    /// Idle motion still tracks the last position.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        if self.drag.dragging {
            let delta = pos - self.drag.last;
            let delta_rot = Quat::from_euler(
                EulerRot::XYZ,
                delta.y.to_radians(),
                delta.x.to_radians(),
                0.0,
            );
            self.scene.entities[self.moon].transform.rotate_world(delta_rot);

            if let Some(orbit) = &mut self.orbit {
                orbit.rotate(delta.x, delta.y);
            }
        }
        self.drag.last = pos;
    }

    pub fn on_pointer_up(&mut self) {
        self.drag.dragging = false;
    }

    pub fn on_pointer_leave(&mut self) {
        self.drag.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn on_secondary_drag(&mut self, dx: f32, dy: f32) {
        if let Some(orbit) = &mut self.orbit {
            orbit.pan(dx, dy);
        }
    }

    pub fn on_scroll(&mut self, notches: f32) {
        if let Some(orbit) = &mut self.orbit {
            orbit.zoom(notches);
        }
    }

    pub fn on_resize(&mut self, width: usize, height: usize) {
        self.scene
            .camera
            .set_aspect(width as f32 / height.max(1) as f32);
    }

    /// Light-intensity slider: the value lands on the directional light as is.
    pub fn set_light_intensity(&mut self, value: f32) {
        self.scene.lights[self.sun].set_intensity(value);
    }

    /// Phase slider: hemisphere fill fades in as the sun fades out.
    pub fn set_phase(&mut self, phase: f32) {
        self.scene.lights[self.fill].set_intensity(1.0 - phase);
        self.scene.lights[self.sun].set_intensity(phase);
    }

    /// The "simulate real-time lunar phase" action.
    pub fn apply_live_phase(&mut self) -> f32 {
        let phase = phase::phase_now();
        self.set_phase(phase);
        info!("applied live lunar phase {phase:.3}");
        phase
    }
}
