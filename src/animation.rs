use ultraviolet::Vec3;

/// Scalar parameter re-evaluated at frame time `t`.
///
/// Cloning yields an independent binding: two clones of one sinusoid
/// definition can be updated to different times without affecting each
/// other. Before the first `update` the motion variants report zero.
#[derive(Clone, Debug)]
pub enum AnimatedValue {
    Fixed(f32),
    /// `scale * sin(speed * t / 100)`
    Sinusoid { value: f32, scale: f32, speed: f32 },
}

impl AnimatedValue {
    pub fn fixed(value: f32) -> Self {
        Self::Fixed(value)
    }

    pub fn sinusoid(scale: f32, speed: f32) -> Self {
        Self::Sinusoid {
            value: 0.,
            scale,
            speed,
        }
    }

    pub fn update(&mut self, t: f32) {
        match self {
            Self::Fixed(_) => {}
            Self::Sinusoid {
                value,
                scale,
                speed,
            } => *value = *scale * (*speed * t / 100.).sin(),
        }
    }

    pub fn get(&self) -> f32 {
        match self {
            Self::Fixed(value) => *value,
            Self::Sinusoid { value, .. } => *value,
        }
    }
}

/// Vector parameter re-evaluated at frame time `t`.
#[derive(Clone, Debug)]
pub enum AnimatedVector {
    Fixed(Vec3),
    /// Orbit around `center` in the horizontal (xz) plane.
    Orbit {
        value: Vec3,
        center: Vec3,
        radius: f32,
        speed: f32,
    },
}

impl AnimatedVector {
    pub fn fixed(value: Vec3) -> Self {
        Self::Fixed(value)
    }

    pub fn orbit(center: Vec3, radius: f32, speed: f32) -> Self {
        Self::Orbit {
            value: Vec3::zero(),
            center,
            radius,
            speed,
        }
    }

    pub fn update(&mut self, t: f32) {
        match self {
            Self::Fixed(_) => {}
            Self::Orbit {
                value,
                center,
                radius,
                speed,
            } => {
                let angle = *speed * t / 100.;
                *value = Vec3::new(
                    center.x + angle.cos() * *radius,
                    center.y,
                    center.z + angle.sin() * *radius,
                );
            }
        }
    }

    pub fn get(&self) -> Vec3 {
        match self {
            Self::Fixed(value) => *value,
            Self::Orbit { value, .. } => *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_variants_start_at_zero() {
        assert_eq!(AnimatedValue::sinusoid(2., 3.).get(), 0.);
        assert_eq!(AnimatedVector::orbit(Vec3::one(), 5., 1.).get(), Vec3::zero());
    }

    #[test]
    fn sinusoid_oscillates_with_scale() {
        let mut v = AnimatedValue::sinusoid(2., 100.);
        // speed * t / 100 = t, so t = pi/2 is the crest
        v.update(std::f32::consts::FRAC_PI_2);
        assert!((v.get() - 2.).abs() < 1e-5);
        v.update(std::f32::consts::PI);
        assert!(v.get().abs() < 1e-5);
    }

    #[test]
    fn orbit_stays_on_circle_at_center_height() {
        let mut v = AnimatedVector::orbit(Vec3::zero(), 5., 100.);
        for t in [0., 1., 17.3, 250.] {
            v.update(t);
            let p = v.get();
            assert_eq!(p.y, 0.);
            assert!((p.x.powi(2) + p.z.powi(2) - 25.).abs() < 1e-3);
        }
    }

    #[test]
    fn orbit_keeps_center_offset() {
        let mut v = AnimatedVector::orbit(Vec3::new(1., 2., 3.), 1., 100.);
        v.update(0.);
        assert_eq!(v.get(), Vec3::new(2., 2., 3.));
    }

    #[test]
    fn clones_animate_independently() {
        let a = AnimatedValue::sinusoid(1., 100.);
        let mut b = a.clone();
        b.update(std::f32::consts::FRAC_PI_2);
        assert_eq!(a.get(), 0.);
        assert!((b.get() - 1.).abs() < 1e-5);
    }

    #[test]
    fn fixed_values_ignore_time() {
        let mut v = AnimatedValue::fixed(4.2);
        v.update(1000.);
        assert_eq!(v.get(), 4.2);
    }
}
