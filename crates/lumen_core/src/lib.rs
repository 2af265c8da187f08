//! Lumen Core - Sphere scenes for the progressive path tracer.
//!
//! This crate provides:
//!
//! - **Scene model**: `Sphere`, `Material`, `Scene`
//! - **Intersection**: nearest-hit queries returning `Hit`
//! - **Scene files**: JSON scene descriptions and built-in presets
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::presets;
//!
//! let description = presets::cornell_box();
//! println!("Loaded {} spheres", description.scene.len());
//! ```

pub mod loader;
pub mod presets;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use loader::{
    load_scene, load_scene_from_str, scene_to_string, CameraSettings, SceneDescription, SceneError,
};
pub use scene::{Hit, Scene};
pub use sphere::{Color, Material, Sphere, EPSILON, MAX_EMISSION};
