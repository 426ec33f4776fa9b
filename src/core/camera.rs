use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEG: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
// The backdrop shell sits at radius 1000; the far plane must clear it.
pub const DEFAULT_FAR: f32 = 1500.0;

#[derive(Debug, Clone)]
pub struct Camera {
    /// The world-space position of the camera
    pub pos: Vec3,
    /// The point the camera looks at
    pub target: Vec3,
    /// World up used to build the view basis
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// The aspect ratio (width / height) of the viewport
    pub aspect: f32,
    /// The near plane of the camera, anything closer than this will not be rendered
    pub near: f32,
    /// The far plane of the camera, anything beyond this will not be rendered
    pub far: f32,
}

impl Camera {
    pub fn new(pos: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            pos,
            target,
            up: Vec3::Y,
            fov_deg: DEFAULT_FOV_DEG,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pos, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.pos).normalize_or(-Vec3::Z)
    }

    pub fn distance(&self) -> f32 {
        (self.pos - self.target).length()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let eye = cam.view_matrix() * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert!(eye.truncate().length() < 1e-5);

        // The target lands on the negative z axis in view space.
        let target = cam.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5);
        assert!((target.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn set_aspect_changes_projection() {
        let mut cam = Camera::default();
        let before = cam.projection_matrix();
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
        assert_ne!(before, cam.projection_matrix());
    }

    #[test]
    fn projection_maps_near_and_far_to_depth_range() {
        let cam = Camera::new(Vec3::ZERO, -Vec3::Z, 1.0);
        let proj = cam.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -cam.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -cam.far, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}
