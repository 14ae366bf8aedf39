use std::ops::{AddAssign, Div};
use ultraviolet::Vec3;

/// Linear RGB radiance. Accumulates sample contributions, averages them
/// and maps to perceptual space with gamma 2. Channels live in [0, ∞)
/// until the output conversion clamps them.
#[derive(Clone, Copy, Default)]
pub struct Color(Vec3);

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Div<f32> for Color {
    type Output = Self;

    fn div(self, divisor: f32) -> Self {
        Self(self.0 / divisor)
    }
}

impl Color {
    pub fn black() -> Self {
        Self(Vec3::zero())
    }

    pub fn average(self, samples: u32) -> Self {
        self / samples as f32
    }

    /// Gamma-2 correction, linear to perceptual.
    pub fn gamma_corrected(self) -> Self {
        Self(Vec3::new(self.0.x.sqrt(), self.0.y.sqrt(), self.0.z.sqrt()))
    }

    fn clamp(self, min: f32, max: f32) -> Self {
        Self(self.0.clamped(Vec3::broadcast(min), Vec3::broadcast(max)))
    }
}

pub const COLOR_CHANNELS: usize = 3;
pub type OutputColor = [u16; COLOR_CHANNELS];

impl From<Color> for OutputColor {
    fn from(color: Color) -> Self {
        let c = Vec3::from(color.clamp(0., 1.)) * 65535.;
        [c.x as u16, c.y as u16, c.z as u16]
    }
}
