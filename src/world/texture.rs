use std::sync::Arc;
use ultraviolet::Vec3;

/// Albedo looked up at the hit position. Textures are shared by name
/// across materials, hence the `Arc` alias.
pub trait Texture: Send + Sync {
    fn color(&self, point: Vec3) -> Vec3;
}

pub type TextureRef = Arc<dyn Texture>;

pub struct SolidColor {
    color: Vec3,
}

impl SolidColor {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn color(&self, _: Vec3) -> Vec3 {
        self.color
    }
}

/// 3D checker pattern from the sign of a sine product, `size` sets the
/// grid frequency.
pub struct Checker {
    size: f32,
    even: TextureRef,
    odd: TextureRef,
}

impl Checker {
    pub fn new(size: f32, even: TextureRef, odd: TextureRef) -> Self {
        Self { size, even, odd }
    }
}

impl Texture for Checker {
    fn color(&self, point: Vec3) -> Vec3 {
        let s = (self.size * point.x).sin() * (self.size * point.y).sin() * (self.size * point.z).sin();
        if s < 0. {
            self.odd.color(point)
        } else {
            self.even.color(point)
        }
    }
}
