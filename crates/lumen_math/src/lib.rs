// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod onb;
mod ray;

pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// Scalar type used for all geometry.
///
/// Scenes model walls as spheres of radius 1e5, which leaves `f32` without
/// enough precision to resolve the self-intersection epsilon.
pub type Float = f64;

/// Three-component vector in scene precision.
pub type Vec3d = DVec3;
