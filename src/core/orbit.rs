use crate::core::Camera;
use glam::{Vec2, Vec3};

use super::MAX_PITCH;

/// Orbit the camera around its target with pointer input: drag to rotate,
/// scroll to zoom, secondary-drag to pan. Input accumulates between frames
/// and is applied once per frame by `update`, which is a no-op when nothing
/// is pending. The capability is optional; callers hold an
/// `Option<OrbitControls>` and skip the update when it is absent.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,

    /// Radians of orbit per pixel of drag.
    pub rotate_speed: f32,
    /// Fraction of the orbit radius removed per scroll notch.
    pub zoom_speed: f32,
    /// Fraction of the orbit radius panned per pixel.
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,

    yaw_delta: f32,
    pitch_delta: f32,
    pan_delta: Vec2,
    zoom_notches: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.002,
            min_distance: 0.5,
            max_distance: 700.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            pan_delta: Vec2::ZERO,
            zoom_notches: 0.0,
        }
    }

    /// Queue an orbit from a pointer drag of (dx, dy) pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if self.enable_rotate {
            self.yaw_delta += dx * self.rotate_speed;
            self.pitch_delta += dy * self.rotate_speed;
        }
    }

    /// Queue a pan from a secondary drag of (dx, dy) pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.enable_pan {
            self.pan_delta += Vec2::new(dx, dy);
        }
    }

    /// Queue a zoom; positive notches move the camera closer.
    pub fn zoom(&mut self, notches: f32) {
        if self.enable_zoom {
            self.zoom_notches += notches;
        }
    }

    /// Apply accumulated input to the camera. Returns whether anything moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.yaw_delta == 0.0
            && self.pitch_delta == 0.0
            && self.pan_delta == Vec2::ZERO
            && self.zoom_notches == 0.0
        {
            return false;
        }

        let offset = camera.pos - camera.target;
        let radius = offset.length().max(1e-4);

        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = (offset.y / radius).asin();
        yaw -= self.yaw_delta;
        pitch = (pitch + self.pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);

        let radius = (radius * (1.0 - self.zoom_notches * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);

        if self.pan_delta != Vec2::ZERO {
            let forward = camera.forward();
            let right = forward.cross(camera.up).normalize_or(Vec3::X);
            let up = right.cross(forward);
            let shift = (right * -self.pan_delta.x + up * self.pan_delta.y)
                * (radius * self.pan_speed);
            camera.target += shift;
        }

        camera.pos = camera.target
            + Vec3::new(
                radius * pitch.cos() * yaw.sin(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.cos(),
            );

        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        self.pan_delta = Vec2::ZERO;
        self.zoom_notches = 0.0;
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0)
    }

    #[test]
    fn idle_update_is_a_noop() {
        let mut cam = camera();
        let before = cam.pos;
        let mut orbit = OrbitControls::new();
        assert!(!orbit.update(&mut cam));
        assert_eq!(cam.pos, before);
    }

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut cam = camera();
        let mut orbit = OrbitControls::new();
        orbit.rotate(120.0, -45.0);
        assert!(orbit.update(&mut cam));
        assert!((cam.distance() - 5.0).abs() < 1e-4);
        assert_ne!(cam.pos, Vec3::new(0.0, 0.0, 5.0));
        // Deltas were consumed.
        assert!(!orbit.update(&mut cam));
    }

    #[test]
    fn zoom_clamps_to_distance_limits() {
        let mut cam = camera();
        let mut orbit = OrbitControls::new();
        for _ in 0..200 {
            orbit.zoom(5.0);
            orbit.update(&mut cam);
        }
        assert!((cam.distance() - orbit.min_distance).abs() < 1e-4);

        for _ in 0..500 {
            orbit.zoom(-5.0);
            orbit.update(&mut cam);
        }
        assert!((cam.distance() - orbit.max_distance).abs() < 1e-3);
    }

    #[test]
    fn pitch_never_crosses_the_pole() {
        let mut cam = camera();
        let mut orbit = OrbitControls::new();
        orbit.rotate(0.0, 10_000.0);
        orbit.update(&mut cam);
        let pitch = (cam.pos.y / cam.distance()).asin();
        assert!(pitch <= MAX_PITCH + 1e-4);
    }

    #[test]
    fn pan_moves_the_target() {
        let mut cam = camera();
        let mut orbit = OrbitControls::new();
        orbit.pan(50.0, 0.0);
        orbit.update(&mut cam);
        assert!(cam.target != Vec3::ZERO);
        assert!((cam.distance() - 5.0).abs() < 1e-4);
    }
}
