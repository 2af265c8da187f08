//! Camera for primary ray generation.

use lumen_core::CameraSettings;
use lumen_math::{Float, Ray, Vec3d};

use crate::sampler::Sampler;

/// Pinhole camera mapping pixels to primary rays.
///
/// Rows are indexed top-down: row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    origin: Vec3d,
    forward: Vec3d,
    // View-plane axes at unit distance, already scaled by field of view
    right: Vec3d,
    up: Vec3d,
    near_offset: Float,
}

impl Camera {
    /// Build a camera for the given settings and resolution.
    pub fn new(settings: &CameraSettings, image_width: u32, image_height: u32) -> Self {
        let forward = settings.forward.normalize();
        let world_up = if forward.cross(Vec3d::Y).length_squared() > 1e-12 {
            Vec3d::Y
        } else {
            Vec3d::Z
        };

        let aspect = image_width as Float / image_height.max(1) as Float;
        let right = forward.cross(world_up).normalize() * aspect * settings.fov_scale;
        let up = right.cross(forward).normalize() * settings.fov_scale;

        Self {
            image_width,
            image_height,
            origin: settings.origin,
            forward,
            right,
            up,
            near_offset: settings.near_offset,
        }
    }

    /// Generate a jittered ray through pixel `(x, y)`.
    ///
    /// Consumes two draws, horizontal then vertical, each shaped by a tent
    /// filter that spans the pixel.
    pub fn get_ray(&self, x: u32, y: u32, sampler: &mut dyn Sampler) -> Ray {
        let (r1, r2) = sampler.next_2d();
        let dx = tent(r1);
        let dy = tent(r2);

        let sx = (x as Float + 0.5 + 0.5 * dx) / self.image_width as Float - 0.5;
        let sy = 0.5 - (y as Float + 0.5 + 0.5 * dy) / self.image_height as Float;

        let d = self.right * sx + self.up * sy + self.forward;
        Ray::towards(self.origin + d * self.near_offset, d)
    }

    /// Unjittered ray through the center of pixel `(x, y)`.
    pub fn center_ray(&self, x: u32, y: u32) -> Ray {
        let sx = (x as Float + 0.5) / self.image_width as Float - 0.5;
        let sy = 0.5 - (y as Float + 0.5) / self.image_height as Float;

        let d = self.right * sx + self.up * sy + self.forward;
        Ray::towards(self.origin + d * self.near_offset, d)
    }
}

/// Map a uniform draw to the triangle distribution on [-1, 1].
#[inline]
fn tent(r: Float) -> Float {
    let r = 2.0 * r;
    if r < 1.0 {
        r.sqrt() - 1.0
    } else {
        1.0 - (2.0 - r).sqrt()
    }
}
