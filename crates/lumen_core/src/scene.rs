//! Scene container and nearest-hit queries.
//!
//! A scene is an ordered, immutable list of spheres. It is shared read-only
//! by every render worker, so it holds no interior mutability.

use lumen_math::{Float, Interval, Ray};

use crate::sphere::{Sphere, EPSILON};

/// Nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray, always greater than [`EPSILON`] and finite
    pub t: Float,
    /// Index of the intersected sphere in the scene
    pub index: usize,
}

/// An ordered collection of spheres.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a scene from a list of spheres.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Get all spheres in scene order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Get a sphere by index.
    ///
    /// Panics if `index` is out of range; indices from [`Scene::intersect`]
    /// are always valid.
    pub fn sphere(&self, index: usize) -> &Sphere {
        &self.spheres[index]
    }

    /// Number of spheres with non-zero emission.
    pub fn emitter_count(&self) -> usize {
        self.spheres.iter().filter(|s| s.is_emissive()).count()
    }

    /// Find the closest sphere the ray hits beyond [`EPSILON`].
    ///
    /// Linear scan over every sphere. On an exact tie the earlier sphere wins.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut closest = Interval::beyond(EPSILON);
        let mut nearest = None;

        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some(t) = sphere.hit(ray, closest) {
                closest.max = t;
                nearest = Some(Hit { t, index });
            }
        }

        nearest
    }
}

impl FromIterator<Sphere> for Scene {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
