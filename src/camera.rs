use crate::animation::{AnimatedValue, AnimatedVector};
use crate::Ray;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use ultraviolet::{Vec2, Vec3};

fn random_in_disc(rng: &mut XorShiftRng) -> Vec2 {
    loop {
        let v = Vec2::from(rng.gen::<[f32; 2]>()) * 2. - Vec2::one();
        if v.mag_sq() < 1. {
            return v;
        }
    }
}

/// Derived per-frame state, recomputed by [`Camera::update`]. A ray must
/// never be generated from a frame older than the last parameter change.
struct Frame {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    cu: Vec3,
    cv: Vec3,
    lens_radius: f32,
}

/// Thin-lens camera. The animated parameters are the source of truth;
/// `update(t)` advances them and recomputes the cached viewport frame,
/// which `get_ray` then reads. With aperture 0 the lens degenerates to a
/// pinhole and ray generation becomes deterministic per viewport point.
pub struct Camera {
    position: AnimatedVector,
    look_at: AnimatedVector,
    up: AnimatedVector,
    fov: AnimatedValue,
    aperture: AnimatedValue,
    aspect_ratio: f32,
    frame: Frame,
}

impl Camera {
    pub fn new(
        position: AnimatedVector,
        look_at: AnimatedVector,
        up: AnimatedVector,
        fov: AnimatedValue,
        aperture: AnimatedValue,
        aspect_ratio: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            look_at,
            up,
            fov,
            aperture,
            aspect_ratio,
            frame: Frame {
                origin: Vec3::zero(),
                lower_left_corner: Vec3::zero(),
                horizontal: Vec3::zero(),
                vertical: Vec3::zero(),
                cu: Vec3::zero(),
                cv: Vec3::zero(),
                lens_radius: 0.,
            },
        };
        camera.update(0.);
        camera
    }

    /// Advance the animated parameters to frame time `t` and rebuild the
    /// viewport frame. Call once per frame before generating rays.
    pub fn update(&mut self, t: f32) {
        self.position.update(t);
        self.look_at.update(t);
        self.up.update(t);
        self.fov.update(t);
        self.aperture.update(t);
        self.frame = self.derive_frame();
    }

    fn derive_frame(&self) -> Frame {
        let position = self.position.get();
        let look_at = self.look_at.get();
        let up = self.up.get();

        // The focal plane passes through the look-at point
        let theta = self.fov.get().to_radians();
        let focus_distance = (position - look_at).mag();
        let half_height = (theta / 2.).tan() * focus_distance;
        let half_width = self.aspect_ratio * half_height;

        // Establish a basis for the viewport
        let cw = (position - look_at).normalized();
        let cu = up.cross(cw).normalized();
        let cv = cw.cross(cu);

        Frame {
            origin: position,
            lower_left_corner: position
                - cu * half_width // Half viewport in x direction
                - cv * half_height // Half viewport in y direction
                - cw * focus_distance, // Forward to viewport surface
            horizontal: cu * (2. * half_width),
            vertical: cv * (2. * half_height),
            cu,
            cv,
            lens_radius: self.aperture.get() / 2.,
        }
    }

    pub fn get_ray(&self, rng: &mut XorShiftRng, uv: Vec2) -> Ray {
        let rd = random_in_disc(rng) * self.frame.lens_radius;
        let offset = self.frame.cu * rd.x + self.frame.cv * rd.y;
        Ray::new(
            self.frame.origin + offset,
            self.frame.lower_left_corner
                + uv.x * self.frame.horizontal
                + uv.y * self.frame.vertical
                - self.frame.origin
                - offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera(aperture: f32) -> Camera {
        Camera::new(
            AnimatedVector::fixed(Vec3::new(0., 0., 2.)),
            AnimatedVector::fixed(Vec3::new(0., 0., -1.)),
            AnimatedVector::fixed(Vec3::unit_y()),
            AnimatedValue::fixed(90.),
            AnimatedValue::fixed(aperture),
            2.,
        )
    }

    #[test]
    fn pinhole_rays_are_deterministic() {
        let camera = test_camera(0.);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let uv = Vec2::new(0.3, 0.7);
        let a = camera.get_ray(&mut rng, uv);
        let b = camera.get_ray(&mut rng, uv);
        assert_eq!(a.origin(), b.origin());
        assert_eq!(a.direction(), b.direction());
    }

    #[test]
    fn lens_jitters_ray_origins() {
        let camera = test_camera(0.5);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let uv = Vec2::new(0.5, 0.5);
        let a = camera.get_ray(&mut rng, uv);
        let b = camera.get_ray(&mut rng, uv);
        assert!((a.origin() - b.origin()).mag() > 0.);
    }

    #[test]
    fn center_ray_points_at_look_at() {
        let camera = test_camera(0.);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let ray = camera.get_ray(&mut rng, Vec2::new(0.5, 0.5));
        let dir = ray.direction().normalized();
        assert!((dir - Vec3::new(0., 0., -1.)).mag() < 1e-5);
    }

    #[test]
    fn update_rebuilds_frame_from_animated_position() {
        let mut camera = Camera::new(
            AnimatedVector::orbit(Vec3::zero(), 3., 100.),
            AnimatedVector::fixed(Vec3::zero()),
            AnimatedVector::fixed(Vec3::unit_y()),
            AnimatedValue::fixed(90.),
            AnimatedValue::fixed(0.),
            1.,
        );
        let mut rng = XorShiftRng::seed_from_u64(1);
        let before = camera.get_ray(&mut rng, Vec2::new(0.5, 0.5));
        camera.update(std::f32::consts::PI); // quarter orbit at speed 100
        let after = camera.get_ray(&mut rng, Vec2::new(0.5, 0.5));
        assert!((before.origin() - after.origin()).mag() > 1.);
    }
}
