use super::surface::HitRecord;
use super::texture::TextureRef;
use crate::Ray;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::sync::Arc;
use ultraviolet::Vec3;

/// Scattering behavior of a surface. Returns the attenuation and the
/// scattered ray, or `None` when the ray is absorbed. The caller owns
/// the random source, one per sampling worker.
pub trait Scatter: Send + Sync {
    fn scatter(&self, rng: &mut XorShiftRng, r: &Ray, hit: &HitRecord) -> Option<(Vec3, Ray)>;
}

/// One named material definition can be bound to many objects.
pub type Material = Arc<dyn Scatter>;

fn random_in_sphere(rng: &mut XorShiftRng) -> Vec3 {
    loop {
        let v = Vec3::from(rng.gen::<[f32; 3]>()) * 2. - Vec3::one();
        if v.mag_sq() < 1. {
            return v;
        }
    }
}

fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2. * v.dot(normal) * normal
}

fn refract(v: Vec3, normal: Vec3, refraction_ratio: f32) -> Vec3 {
    let cos_theta = (-v).dot(normal);
    let perpendicular = refraction_ratio * (v + cos_theta * normal);
    let parallel = -(1. - perpendicular.mag_sq()).abs().sqrt() * normal;
    perpendicular + parallel
}

fn reflectance(cos_theta: f32, refraction_ratio: f32) -> f32 {
    // Schlick's approximation
    let r0 = ((1. - refraction_ratio) / (1. + refraction_ratio)).powi(2);
    r0 + (1. - r0) * (1. - cos_theta).powi(5)
}

pub struct Lambertian {
    albedo: TextureRef,
}

impl Lambertian {
    pub fn new(albedo: TextureRef) -> Self {
        Self { albedo }
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, rng: &mut XorShiftRng, _: &Ray, hit: &HitRecord) -> Option<(Vec3, Ray)> {
        let mut direction = hit.normal + random_in_sphere(rng);
        if direction.mag_sq() < 1e-6 {
            direction = hit.normal;
        }
        Some((
            self.albedo.color(hit.position),
            Ray::new(hit.position, direction),
        ))
    }
}

pub struct Metal {
    albedo: Vec3,
    fuzz: f32,
}

impl Metal {
    pub fn new(albedo: Vec3, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.),
        }
    }
}

impl Scatter for Metal {
    fn scatter(&self, rng: &mut XorShiftRng, r: &Ray, hit: &HitRecord) -> Option<(Vec3, Ray)> {
        let reflected = reflect(r.direction().normalized(), hit.normal);
        let scattered = reflected + self.fuzz * random_in_sphere(rng);
        if scattered.dot(hit.normal) > 0. {
            Some((self.albedo, Ray::new(hit.position, scattered)))
        } else {
            // Fuzz pushed the reflection under the surface
            None
        }
    }
}

pub struct Dielectric {
    refraction: f32,
}

impl Dielectric {
    pub fn new(refraction: f32) -> Self {
        Self { refraction }
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, rng: &mut XorShiftRng, r: &Ray, hit: &HitRecord) -> Option<(Vec3, Ray)> {
        let refraction_ratio = if hit.front_facing {
            1. / self.refraction
        } else {
            self.refraction
        };

        let direction = r.direction().normalized();
        let cos_theta = (-direction).dot(hit.normal);
        let sin_theta = (1. - cos_theta.powi(2)).sqrt();

        let direction = if refraction_ratio * sin_theta > 1.
            || rng.gen::<f32>() < reflectance(cos_theta, refraction_ratio)
        {
            reflect(direction, hit.normal)
        } else {
            refract(direction, hit.normal, refraction_ratio)
        };

        Some((Vec3::one(), Ray::new(hit.position, direction)))
    }
}
