//! Built-in scenes.

use glam::DVec3;

use crate::loader::{CameraSettings, SceneDescription, SceneError};
use crate::scene::Scene;
use crate::sphere::{Color, Material, Sphere};

/// Names accepted by [`by_name`].
pub const PRESET_NAMES: &[&str] = &["cornell", "single-light"];

/// Look up a preset by name.
pub fn by_name(name: &str) -> Result<SceneDescription, SceneError> {
    match name {
        "cornell" => Ok(cornell_box()),
        "single-light" => Ok(single_light()),
        _ => Err(SceneError::UnknownPreset(name.to_string())),
    }
}

/// The classic Cornell box built from nine spheres.
///
/// Walls are spheres of radius 1e5 so their visible faces are nearly flat.
/// A mirror ball and a glass ball sit on the floor under a large spherical
/// ceiling light that pokes through the top wall.
pub fn cornell_box() -> SceneDescription {
    let wall = |center: DVec3, albedo: Color| Sphere::new(1e5, center, albedo, Material::Diffuse);

    let scene = Scene::new(vec![
        wall(DVec3::new(1e5 + 1.0, 40.8, 81.6), Color::new(0.75, 0.25, 0.25)), // Left
        wall(DVec3::new(-1e5 + 99.0, 40.8, 81.6), Color::new(0.25, 0.25, 0.75)), // Right
        wall(DVec3::new(50.0, 40.8, 1e5), Color::splat(0.75)),                 // Back
        wall(DVec3::new(50.0, 40.8, -1e5 + 170.0), Color::ZERO),               // Front
        wall(DVec3::new(50.0, 1e5, 81.6), Color::splat(0.75)),                 // Bottom
        wall(DVec3::new(50.0, -1e5 + 81.6, 81.6), Color::splat(0.75)),         // Top
        Sphere::new(16.5, DVec3::new(27.0, 16.5, 47.0), Color::splat(0.999), Material::Specular),
        Sphere::new(16.5, DVec3::new(73.0, 16.5, 78.0), Color::splat(0.999), Material::Refractive),
        Sphere::new(600.0, DVec3::new(50.0, 681.6 - 0.27, 81.6), Color::ZERO, Material::Diffuse)
            .with_emission(Color::splat(12.0)),
    ]);

    let camera = CameraSettings {
        origin: DVec3::new(50.0, 52.0, 295.6),
        forward: DVec3::new(0.0, -0.042612, -1.0).normalize(),
        fov_scale: 0.5135,
        near_offset: 140.0,
    };

    SceneDescription { scene, camera }
}

/// A single white emitter straight ahead of a camera at the origin.
pub fn single_light() -> SceneDescription {
    let scene = Scene::new(vec![Sphere::new(
        1.0,
        DVec3::new(0.0, 0.0, -5.0),
        Color::ZERO,
        Material::Diffuse,
    )
    .with_emission(Color::ONE)]);

    SceneDescription {
        scene,
        camera: CameraSettings::default(),
    }
}
