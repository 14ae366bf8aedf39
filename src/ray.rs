use ultraviolet::Vec3;

/// Half-line from `origin` along `direction`. The direction is not
/// required to be unit length.
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_along_ray() {
        let r = Ray::new(Vec3::new(1., 0., 0.), Vec3::new(0., 2., 0.));
        let p = r.at(1.5);
        assert_eq!(p, Vec3::new(1., 3., 0.));
    }
}
