//! Sphere primitive and surface materials.

use lumen_math::{Float, Interval, Ray, Vec3d};
use serde::{Deserialize, Serialize};

/// Linear RGB radiance or reflectance.
pub type Color = Vec3d;

/// Minimum accepted hit distance.
///
/// Rays leaving a surface start exactly on it, so any root closer than this
/// is the surface the ray just left.
pub const EPSILON: Float = 1e-4;

/// Largest emitted radiance per channel a sphere may carry.
///
/// Far enough below `f64::MAX` that summing emission over any realistic
/// path length stays finite.
pub const MAX_EMISSION: Float = 1e12;

/// How a surface scatters light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Ideal Lambertian reflector
    Diffuse,
    /// Perfect mirror
    Specular,
    /// Smooth glass with index of refraction 1.5
    Refractive,
}

/// An immutable sphere with its material and emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    radius: Float,
    center: Vec3d,
    albedo: Color,
    material: Material,
    emission: Color,
}

impl Sphere {
    /// Create a non-emissive sphere.
    ///
    /// Out-of-contract values are sanitized rather than rejected: a negative
    /// or NaN radius becomes 0 (the sphere is never hit), albedo channels are
    /// clamped to [0, 1] with NaN mapped to 0.
    pub fn new(radius: Float, center: Vec3d, albedo: Color, material: Material) -> Self {
        let sanitized_radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
        if sanitized_radius != radius {
            log::warn!("Sphere radius {} clamped to {}", radius, sanitized_radius);
        }

        Self {
            radius: sanitized_radius,
            center,
            albedo: sanitize(albedo, Interval::UNIT),
            material,
            emission: Color::ZERO,
        }
    }

    /// Set the emitted radiance.
    ///
    /// Negative or non-finite channels become 0 and bright ones are capped
    /// at [`MAX_EMISSION`].
    pub fn with_emission(mut self, emission: Color) -> Self {
        let finite = Color::from_array(emission.to_array().map(|c| if c.is_finite() { c } else { 0.0 }));
        if finite != emission {
            log::warn!("Non-finite emission {:?} zeroed", emission);
        }
        self.emission = sanitize(finite, Interval::new(0.0, MAX_EMISSION));
        self
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    pub fn center(&self) -> Vec3d {
        self.center
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    /// True if the sphere emits any light.
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    /// Nearest root of the ray/sphere quadratic strictly inside `ray_t`.
    ///
    /// Assumes a unit-length ray direction.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Float> {
        if self.radius <= 0.0 {
            return None;
        }

        let op = self.center - ray.origin();
        let b = op.dot(ray.direction());
        let det = b * b - op.length_squared() + self.radius * self.radius;
        if det < 0.0 {
            return None;
        }

        let det = det.sqrt();
        [b - det, b + det]
            .into_iter()
            .find(|&t| t > ray_t.min)
            .filter(|&t| ray_t.surrounds(t))
    }

    /// Distance to the first surface crossing beyond [`EPSILON`].
    pub fn intersect(&self, ray: &Ray) -> Option<Float> {
        self.hit(ray, Interval::beyond(EPSILON))
    }

    /// Outward unit normal at a point on the surface.
    ///
    /// Normalized explicitly: for small, distant spheres the rounding error in
    /// `p` is large relative to the radius.
    #[inline]
    pub fn normal_at(&self, p: Vec3d) -> Vec3d {
        (p - self.center).normalize()
    }
}

fn sanitize(color: Color, range: Interval) -> Color {
    let sanitized = Color::new(
        range.clamp(color.x),
        range.clamp(color.y),
        range.clamp(color.z),
    );
    if sanitized != color {
        log::warn!("Color {:?} clamped to {:?}", color, sanitized);
    }
    sanitized
}
