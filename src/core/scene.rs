use std::fmt::{self, Display, Formatter};

use crate::core::camera::Camera;
use crate::core::geometry::Mesh;
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::transform::Transform;

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity '{}' ({} tris, {})",
            self.name,
            self.mesh.tris.len(),
            self.material
        )
    }
}

impl Entity {
    pub fn new(name: &str, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            material,
            transform: Transform::new(),
        }
    }
}

/// The full renderable scene. Built once at startup; afterwards only
/// transforms and light intensities mutate, never the member set.
#[derive(Clone)]
pub struct Scene {
    pub camera: Camera,
    pub entities: Vec<Entity>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            entities: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_entity(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}
