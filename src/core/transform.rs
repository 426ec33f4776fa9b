use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone)]
pub struct Transform {
    pub pos: Vec3,
    pub rot: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Transform {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rot, self.pos)
    }

    /// Translate the model by a given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.pos += offset;
    }

    /// Compose a rotation in world space (delta before current).
    pub fn rotate_world(&mut self, rotation: Quat) {
        self.rot = rotation * self.rot;
    }

    /// Compose a rotation about the model's own axes (current before delta).
    pub fn rotate_local(&mut self, rotation: Quat) {
        self.rot = self.rot * rotation;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::EulerRot;

    #[test]
    fn matrix_applies_rotation_then_translation() {
        let mut t = Transform::new();
        t.translate(Vec3::new(0.0, 0.0, 3.0));
        t.rot = Quat::from_euler(EulerRot::XYZ, 0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let p = t.matrix().transform_point3(Vec3::X);
        // Rotating +x by 90 degrees about y lands on -z, then translate.
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn world_and_local_composition_differ() {
        let base = Quat::from_euler(EulerRot::XYZ, 0.3, 0.7, 0.0);
        let delta = Quat::from_euler(EulerRot::XYZ, 0.1, 0.0, 0.0);

        let mut a = Transform::new();
        a.rot = base;
        a.rotate_world(delta);
        assert!(a.rot.abs_diff_eq(delta * base, 1e-6));

        let mut b = Transform::new();
        b.rot = base;
        b.rotate_local(delta);
        assert!(b.rot.abs_diff_eq(base * delta, 1e-6));
    }
}
