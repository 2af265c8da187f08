//! Lumen Tracer - progressive CPU path tracing over sphere scenes.
//!
//! A Monte Carlo estimator with cosine-weighted diffuse sampling, Russian
//! roulette termination and importance-sampled Fresnel splitting. Frames are
//! rendered row-parallel and merged into a running per-pixel mean.

mod accumulator;
mod camera;
mod integrator;
mod output;
mod renderer;
mod sampler;

pub use accumulator::{Accumulator, AccumulatorError};
pub use camera::Camera;
pub use integrator::{
    radiance, scatter, trace_path, IntegratorConfig, Lobe, PathSample, Scatter, Termination,
    DEFAULT_ROULETTE_DEPTH, GLASS_IOR,
};
pub use output::{color_to_rgba, rgba32f_bytes, to_rgba8, write_png, OutputError};
pub use renderer::{render_frame, render_pixel, ProgressiveRenderer, RenderConfig};
pub use sampler::{stream_seed, SampleStream, Sampler, SequenceSampler};

/// Re-export scene types from lumen_core
pub use lumen_core::{Color, Hit, Material, Scene, Sphere};
/// Re-export math types from lumen_math
pub use lumen_math::{Ray, Vec3d};
