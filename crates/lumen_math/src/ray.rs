use crate::{Float, Vec3d};

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Intersection math assumes `direction` is normalized. Callers building rays
/// from arbitrary vectors should go through [`Ray::towards`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3d,
    pub direction: Vec3d,
}

impl Ray {
    /// Create a ray from an already normalized direction.
    #[inline]
    pub fn new(origin: Vec3d, direction: Vec3d) -> Self {
        debug_assert!(
            (direction.length_squared() - 1.0).abs() < 1e-6,
            "ray direction must be unit length, got {direction:?}"
        );
        Self { origin, direction }
    }

    /// Create a ray pointing along `direction`, normalizing it first.
    ///
    /// A zero-length direction is a caller error and yields NaN components.
    #[inline]
    pub fn towards(origin: Vec3d, direction: Vec3d) -> Self {
        Self::new(origin, direction.normalize())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3d {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3d {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: Float) -> Vec3d {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3d::ZERO, Vec3d::X);

        assert_eq!(ray.at(0.0), Vec3d::ZERO);
        assert_eq!(ray.at(1.0), Vec3d::X);
        assert_eq!(ray.at(2.0), Vec3d::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3d::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_towards_normalizes() {
        let ray = Ray::towards(Vec3d::new(1.0, 2.0, 3.0), Vec3d::new(0.0, 3.0, 4.0));

        assert!((ray.direction().length() - 1.0).abs() < 1e-12);
        assert_eq!(ray.direction(), Vec3d::new(0.0, 0.6, 0.8));
        assert_eq!(ray.origin(), Vec3d::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Vec3d::ZERO, Vec3d::Y);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1, ray2);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
