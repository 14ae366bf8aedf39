use crate::animation::{AnimatedValue, AnimatedVector};
use crate::Ray;
use std::ops::Range;
use ultraviolet::Vec3;

pub struct HitRecord {
    pub position: Vec3,
    pub normal: Vec3,
    pub t: f32,
    pub front_facing: bool,
}

impl HitRecord {
    pub fn new(position: Vec3, outward_normal: Vec3, t: f32, r: &Ray) -> Self {
        let front_facing = r.direction().dot(outward_normal) < 0.;
        Self {
            position,
            normal: if front_facing {
                outward_normal
            } else {
                -outward_normal
            },
            t,
            front_facing,
        }
    }
}

/// A surface whose shape parameters may be animated. `update` resolves
/// them for the frame; `hit` then reads the resolved values only, so the
/// surface is immutable while sampling workers run.
pub trait Hit: Send + Sync {
    fn update(&mut self, t: f32);
    fn hit(&self, r: &Ray, t_range: Range<f32>) -> Option<HitRecord>;
}

pub type Surface = Box<dyn Hit>;

pub struct Sphere {
    center: AnimatedVector,
    radius: AnimatedValue,
}

impl Sphere {
    pub fn new(center: AnimatedVector, radius: AnimatedValue) -> Self {
        Self { center, radius }
    }
}

impl Hit for Sphere {
    fn update(&mut self, t: f32) {
        self.center.update(t);
        self.radius.update(t);
    }

    fn hit(&self, r: &Ray, t_range: Range<f32>) -> Option<HitRecord> {
        let center = self.center.get();
        let radius = self.radius.get();

        let oc = r.origin() - center;
        let a = r.direction().mag_sq();
        let half_b = oc.dot(r.direction());
        let c = oc.mag_sq() - radius.powi(2);

        let discriminant = half_b.powi(2) - a * c;
        if discriminant <= 0. {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root <= t_range.start || t_range.end <= root {
            root = (-half_b + sqrtd) / a;
            if root <= t_range.start || t_range.end <= root {
                return None;
            }
        }

        let position = r.at(root);
        // Dividing by the radius normalizes while preserving orientation
        let outward_normal = (position - center) / radius;
        Some(HitRecord::new(position, outward_normal, root, r))
    }
}
