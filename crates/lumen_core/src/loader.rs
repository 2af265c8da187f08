//! JSON scene files.
//!
//! A scene file lists spheres in order and may carry a camera:
//!
//! ```json
//! {
//!   "camera": { "origin": [50, 52, 295.6], "forward": [0, -0.042612, -1] },
//!   "spheres": [
//!     { "radius": 600, "center": [50, 681.33, 81.6], "albedo": [0, 0, 0],
//!       "material": "diffuse", "emission": [12, 12, 12] }
//!   ]
//! }
//! ```
//!
//! Unlike [`Sphere::new`], which sanitizes silently, loading rejects the first
//! malformed record so mistakes in hand-written files surface early.

use std::path::Path;

use glam::DVec3;
use lumen_math::Float;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::Scene;
use crate::sphere::{Color, Material, Sphere};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sphere at index {index}: {reason}")]
    InvalidSphere { index: usize, reason: String },

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Scene contains no spheres")]
    Empty,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Camera placement for primary ray generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Eye position
    pub origin: DVec3,
    /// Viewing direction (normalized on use)
    pub forward: DVec3,
    /// Half-width of the view plane at unit distance, scaled by aspect ratio
    #[serde(default = "default_fov_scale")]
    pub fov_scale: Float,
    /// Distance along each primary direction at which rays start
    #[serde(default)]
    pub near_offset: Float,
}

fn default_fov_scale() -> Float {
    0.5135
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            forward: DVec3::NEG_Z,
            fov_scale: default_fov_scale(),
            near_offset: 0.0,
        }
    }
}

/// A loaded scene together with the camera it was authored for.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub scene: Scene,
    pub camera: CameraSettings,
}

#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    #[serde(default)]
    camera: Option<CameraSettings>,
    spheres: Vec<SphereRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SphereRecord {
    radius: Float,
    center: DVec3,
    albedo: DVec3,
    material: Material,
    #[serde(default)]
    emission: DVec3,
}

impl SphereRecord {
    fn validate(&self, index: usize) -> Result<(), SceneError> {
        let invalid = |reason: &str| SceneError::InvalidSphere {
            index,
            reason: reason.to_string(),
        };

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid("radius must be positive and finite"));
        }
        if !self.center.is_finite() {
            return Err(invalid("center must be finite"));
        }
        if !self.albedo.is_finite() || self.albedo.min_element() < 0.0 || self.albedo.max_element() > 1.0 {
            return Err(invalid("albedo components must lie in [0, 1]"));
        }
        if !self.emission.is_finite() || self.emission.min_element() < 0.0 {
            return Err(invalid("emission must be non-negative and finite"));
        }
        Ok(())
    }

    fn into_sphere(self) -> Sphere {
        Sphere::new(self.radius, self.center, self.albedo, self.material).with_emission(self.emission)
    }
}

impl From<&Sphere> for SphereRecord {
    fn from(sphere: &Sphere) -> Self {
        Self {
            radius: sphere.radius(),
            center: sphere.center(),
            albedo: sphere.albedo(),
            material: sphere.material(),
            emission: sphere.emission(),
        }
    }
}

/// Load a scene file from disk.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneError> {
    let path = path.as_ref();
    log::info!("Loading scene from: {:?}", path);
    let contents = std::fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Parse a scene from JSON text.
pub fn load_scene_from_str(contents: &str) -> Result<SceneDescription, SceneError> {
    let file: SceneFile = serde_json::from_str(contents)?;

    if file.spheres.is_empty() {
        return Err(SceneError::Empty);
    }
    for (index, record) in file.spheres.iter().enumerate() {
        record.validate(index)?;
    }

    let camera = file.camera.unwrap_or_default();
    if !camera.origin.is_finite() || !camera.forward.is_finite() || camera.forward.length_squared() == 0.0 {
        return Err(SceneError::InvalidCamera(
            "origin and forward must be finite and forward non-zero".to_string(),
        ));
    }
    if !(camera.fov_scale.is_finite() && camera.fov_scale > 0.0) {
        return Err(SceneError::InvalidCamera("fov_scale must be positive".to_string()));
    }

    let scene: Scene = file.spheres.into_iter().map(SphereRecord::into_sphere).collect();
    log::info!(
        "Loaded {} spheres ({} emissive)",
        scene.len(),
        scene.emitter_count()
    );

    Ok(SceneDescription { scene, camera })
}

/// Serialize a scene and camera to pretty-printed JSON.
pub fn scene_to_string(description: &SceneDescription) -> Result<String, SceneError> {
    let file = SceneFile {
        camera: Some(description.camera),
        spheres: description.scene.spheres().iter().map(SphereRecord::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const TWO_SPHERES: &str = r#"{
        "camera": { "origin": [0, 0, 5], "forward": [0, 0, -1], "fov_scale": 0.6 },
        "spheres": [
            { "radius": 1.0, "center": [0, 0, 0], "albedo": [0.8, 0.2, 0.2], "material": "diffuse" },
            { "radius": 0.5, "center": [0, 3, 0], "albedo": [0, 0, 0], "material": "diffuse",
              "emission": [10, 10, 10] }
        ]
    }"#;

    #[test]
    fn test_load_scene_from_str() {
        init_logging();
        let description = load_scene_from_str(TWO_SPHERES).unwrap();

        assert_eq!(description.scene.len(), 2);
        assert_eq!(description.scene.emitter_count(), 1);
        assert_eq!(description.scene.sphere(0).emission(), Color::ZERO);
        assert_eq!(description.scene.sphere(1).emission(), Color::splat(10.0));
        assert_eq!(description.camera.origin, DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(description.camera.fov_scale, 0.6);
        assert_eq!(description.camera.near_offset, 0.0);
    }

    #[test]
    fn test_missing_camera_uses_default() {
        let description = load_scene_from_str(
            r#"{ "spheres": [ { "radius": 1, "center": [0,0,-3], "albedo": [1,1,1], "material": "specular" } ] }"#,
        )
        .unwrap();

        assert_eq!(description.camera, CameraSettings::default());
        assert_eq!(description.scene.sphere(0).material(), Material::Specular);
    }

    #[test]
    fn test_rejects_invalid_spheres() {
        init_logging();
        let cases = [
            r#"{ "radius": -1, "center": [0,0,0], "albedo": [0.5,0.5,0.5], "material": "diffuse" }"#,
            r#"{ "radius": 1, "center": [0,0,0], "albedo": [1.5,0.5,0.5], "material": "diffuse" }"#,
            r#"{ "radius": 1, "center": [0,0,0], "albedo": [0.5,0.5,0.5], "material": "diffuse", "emission": [-1,0,0] }"#,
        ];

        for record in cases {
            let json = format!(
                r#"{{ "spheres": [ {{ "radius": 1, "center": [0,0,0], "albedo": [0,0,0], "material": "diffuse" }}, {} ] }}"#,
                record
            );
            match load_scene_from_str(&json) {
                Err(SceneError::InvalidSphere { index, .. }) => assert_eq!(index, 1),
                other => panic!("expected InvalidSphere, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_empty_and_unknown_material() {
        assert!(matches!(
            load_scene_from_str(r#"{ "spheres": [] }"#),
            Err(SceneError::Empty)
        ));
        assert!(matches!(
            load_scene_from_str(
                r#"{ "spheres": [ { "radius": 1, "center": [0,0,0], "albedo": [0,0,0], "material": "velvet" } ] }"#
            ),
            Err(SceneError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_degenerate_camera() {
        let json = r#"{
            "camera": { "origin": [0, 0, 0], "forward": [0, 0, 0] },
            "spheres": [ { "radius": 1, "center": [0,0,-3], "albedo": [1,1,1], "material": "diffuse" } ]
        }"#;
        assert!(matches!(load_scene_from_str(json), Err(SceneError::InvalidCamera(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_scene("/nonexistent/lumen/scene.json");
        assert!(matches!(result, Err(SceneError::Io(_))));
    }

    #[test]
    fn test_scene_to_string_reloads() {
        let original = load_scene_from_str(TWO_SPHERES).unwrap();
        let json = scene_to_string(&original).unwrap();
        let reloaded = load_scene_from_str(&json).unwrap();

        assert_eq!(reloaded, original);
    }
}
