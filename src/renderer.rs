use crate::color::Color;
use crate::world::World;
use crate::Ray;
use parking_lot::Mutex;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::io::Write;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};
use ultraviolet::{Lerp, Vec2, Vec3};

/// Recursion cap for scattered rays; reaching it returns black,
/// matching physical extinction.
const MAX_DEPTH: u32 = 50;
/// Intersection epsilon, rejects re-hits of the originating surface.
const T_MIN: f32 = 1e-3;
/// Result channel capacity.
const CHANNEL_BOUND: usize = 100;
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

enum PixelMessage {
    Pixel { x: usize, y: usize, color: Color },
    RowDone,
}

/// Renders one image row per worker task, workers bounded by the core
/// count. Pixel results flow through a bounded channel to the single
/// consumer that owns the framebuffer.
pub struct Renderer {
    width: usize,
    height: usize,
    samples_per_pixel: u32,
}

impl Renderer {
    pub fn new(width: usize, height: usize, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
        }
    }

    fn background(ray: &Ray) -> Vec3 {
        let unit_direction = ray.direction().normalized();
        // From 0 to 1 when down to up
        let t = 0.5 * (unit_direction.y + 1.);
        // White to sky blue gradient
        Vec3::one().lerp(Vec3::new(0.5, 0.7, 1.), t)
    }

    /// Radiance along `ray`: attenuation of the nearest hit times the
    /// radiance of its scattered ray, the background gradient on a miss,
    /// black on absorption or at the recursion cap.
    pub fn radiance(rng: &mut XorShiftRng, ray: &Ray, world: &World, depth: u32) -> Vec3 {
        if let Some((hit, material)) = world.traverse(ray, T_MIN) {
            if depth < MAX_DEPTH {
                if let Some((attenuation, scattered)) = material.scatter(rng, ray, &hit) {
                    return attenuation * Self::radiance(rng, &scattered, world, depth + 1);
                }
            }
            Vec3::zero()
        } else {
            Self::background(ray)
        }
    }

    fn render_row(
        &self,
        rng: &mut XorShiftRng,
        world: &World,
        row: usize,
        results: &mpsc::SyncSender<PixelMessage>,
    ) {
        let wh = Vec2::new(self.width as f32, self.height as f32);
        for x in 0..self.width {
            let mut color = Vec3::zero();
            for _ in 0..self.samples_per_pixel {
                let jitter = Vec2::from(rng.gen::<[f32; 2]>());
                let uv = (Vec2::new(x as f32, row as f32) + jitter) / wh;
                let ray = world.camera.get_ray(rng, uv);
                color += Self::radiance(rng, &ray, world, 0);
            }
            let color = Color::from(color)
                .average(self.samples_per_pixel)
                .gamma_corrected();
            results
                .send(PixelMessage::Pixel {
                    x,
                    // Flip to top-down raster order
                    y: self.height - 1 - row,
                    color,
                })
                .ok();
        }
        results.send(PixelMessage::RowDone).ok();
    }

    /// Render the world at frame time `time` into a row-major grid of
    /// gamma-corrected colors.
    pub fn render(&self, world: &mut World, time: f32) -> Vec<Color> {
        world.update(time);
        let world: &World = world;

        let mut pixels = vec![Color::black(); self.width * self.height];
        let rows: Mutex<Vec<usize>> = Mutex::new((0..self.height).collect());
        let (results, aggregate) = mpsc::sync_channel(CHANNEL_BOUND);

        let nthreads = num_cpus::get();
        let base_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        crossbeam_utils::thread::scope(|s| {
            for worker in 0..nthreads {
                let results = results.clone();
                let rows = &rows;
                // Distinct stream per worker, generators are never shared
                let seed = base_seed.wrapping_add(SEED_STRIDE.wrapping_mul(worker as u64 + 1));
                s.spawn(move |_| {
                    let mut rng = XorShiftRng::seed_from_u64(seed);

                    while let Some(row) = {
                        let tmp = rows.lock().pop();
                        tmp // Drop mutex guard
                    } {
                        self.render_row(&mut rng, world, row, &results);
                    }
                });
            }
            drop(results);

            // Single consumer, the only writer of the framebuffer
            let mut pending_rows = self.height;
            while pending_rows > 0 {
                match aggregate.recv() {
                    Ok(PixelMessage::Pixel { x, y, color }) => {
                        pixels[y * self.width + x] = color;
                    }
                    Ok(PixelMessage::RowDone) => {
                        pending_rows -= 1;
                        let done = self.height - pending_rows;
                        eprint!("\r{:.1}%", 100. * done as f32 / self.height as f32);
                        std::io::stderr().flush().ok();
                    }
                    Err(_) => break,
                }
            }
            eprint!("\r      \r");
        })
        .unwrap();

        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimatedValue, AnimatedVector};
    use crate::camera::Camera;
    use crate::world::material::Lambertian;
    use crate::world::surface::Sphere;
    use crate::world::texture::SolidColor;
    use crate::world::Object;
    use std::sync::Arc;

    fn one_sphere_world(aspect_ratio: f32) -> World {
        let camera = Camera::new(
            AnimatedVector::fixed(Vec3::new(0., 0., 2.)),
            AnimatedVector::fixed(Vec3::new(0., 0., -1.)),
            AnimatedVector::fixed(Vec3::unit_y()),
            AnimatedValue::fixed(60.),
            AnimatedValue::fixed(0.),
            aspect_ratio,
        );
        let objects = vec![Object {
            surface: Box::new(Sphere::new(
                AnimatedVector::fixed(Vec3::new(0., 0., -1.)),
                AnimatedValue::fixed(1.),
            )),
            material: Arc::new(Lambertian::new(Arc::new(SolidColor::new(Vec3::broadcast(
                0.5,
            ))))),
        }];
        World::new(camera, objects)
    }

    #[test]
    fn miss_returns_the_exact_background_gradient() {
        let mut world = one_sphere_world(2.);
        world.update(0.);
        let mut rng = XorShiftRng::seed_from_u64(3);
        // Straight up: gradient t = 1, the pure sky color
        let up = Ray::new(Vec3::new(0., 0., 2.), Vec3::unit_y());
        let radiance = Renderer::radiance(&mut rng, &up, &world, 0);
        assert_eq!(radiance, Vec3::new(0.5, 0.7, 1.));
        // And an arbitrary miss matches the gradient formula
        let oblique = Ray::new(Vec3::new(0., 0., 2.), Vec3::new(0., 1., 1.));
        let radiance = Renderer::radiance(&mut rng, &oblique, &world, 0);
        assert!((radiance - Renderer::background(&oblique)).mag() < 1e-6);
    }

    #[test]
    fn recursion_cap_returns_black() {
        let mut world = one_sphere_world(2.);
        world.update(0.);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let into_sphere = Ray::new(Vec3::new(0., 0., 2.), Vec3::new(0., 0., -1.));
        let radiance = Renderer::radiance(&mut rng, &into_sphere, &world, MAX_DEPTH);
        assert_eq!(radiance, Vec3::zero());
    }

    #[test]
    fn scattered_rays_never_rehit_at_the_surface() {
        let mut world = one_sphere_world(2.);
        world.update(0.);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let into_sphere = Ray::new(Vec3::new(0., 0., 2.), Vec3::new(0., 0., -1.));
        let (hit, material) = world.traverse(&into_sphere, T_MIN).unwrap();
        for _ in 0..100 {
            let (_, scattered) = material.scatter(&mut rng, &into_sphere, &hit).unwrap();
            if let Some((rehit, _)) = world.traverse(&scattered, T_MIN) {
                assert!(rehit.t > T_MIN);
            }
        }
    }

    #[test]
    fn diffuse_bounce_darkens_below_the_background() {
        let mut world = one_sphere_world(2.);
        world.update(0.);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let into_sphere = Ray::new(Vec3::new(0., 0., 2.), Vec3::new(0., 0., -1.));
        let background = Renderer::background(&into_sphere);
        let mut sum = Vec3::zero();
        let samples = 64;
        for _ in 0..samples {
            sum += Renderer::radiance(&mut rng, &into_sphere, &world, 0);
        }
        let mean = sum / samples as f32;
        // Albedo 0.5 halves the sky contribution at every bounce
        assert!(mean.x < background.x);
        assert!(mean.y < background.y);
        assert!(mean.z < background.z);
    }

    #[test]
    fn rendered_center_pixel_is_darker_than_the_background() {
        let (width, height) = (16, 8);
        let mut world = one_sphere_world(width as f32 / height as f32);
        let renderer = Renderer::new(width, height, 16);
        let pixels = renderer.render(&mut world, 0.);
        assert_eq!(pixels.len(), width * height);

        let center = Vec3::from(pixels[(height / 2) * width + width / 2]);
        // Background at the image center, gamma corrected like the output
        let center_ray = Ray::new(Vec3::new(0., 0., 2.), Vec3::new(0., 0., -1.));
        let background = Vec3::from(
            Color::from(Renderer::background(&center_ray)).gamma_corrected(),
        );
        assert!(center.x < background.x);
        assert!(center.y < background.y);
        assert!(center.z < background.z);

        // Every channel is a valid display value
        for &pixel in &pixels {
            let v = Vec3::from(pixel);
            assert!(v.x >= 0. && v.x.is_finite());
        }
    }
}
