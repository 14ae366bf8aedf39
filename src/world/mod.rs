pub mod material;
pub mod surface;
pub mod texture;

use crate::camera::Camera;
use crate::Ray;
use material::Material;
use surface::{HitRecord, Surface};

pub struct Object {
    pub surface: Surface,
    pub material: Material,
}

/// Camera plus surface list. `update` resolves all animated parameters
/// for a frame; after it returns the world is read-only and can be
/// traversed from any number of sampling workers.
pub struct World {
    pub camera: Camera,
    objects: Vec<Object>,
}

impl World {
    pub fn new(camera: Camera, objects: Vec<Object>) -> Self {
        Self { camera, objects }
    }

    pub fn update(&mut self, t: f32) {
        self.camera.update(t);
        for object in &mut self.objects {
            object.surface.update(t);
        }
    }

    pub fn traverse(&self, r: &Ray, t_min: f32) -> Option<(HitRecord, &Material)> {
        let mut nearest_hit = None;
        let mut nearest_t = f32::INFINITY;

        for Object { surface, material } in self.objects.iter() {
            if let Some(hit) = surface.hit(r, t_min..nearest_t) {
                nearest_t = hit.t;
                nearest_hit = Some((hit, material));
            }
        }

        nearest_hit
    }
}
