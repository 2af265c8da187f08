//! Frame rendering and progressive refinement.
//!
//! [`render_frame`] produces one frame of batch means with rows rendered in
//! parallel; every row draws from its own `(row, frame)` stream, so a frame
//! is bit-identical no matter how rayon schedules the rows.
//! [`ProgressiveRenderer`] owns the accumulation state across frames.

use std::time::Instant;

use lumen_core::{CameraSettings, Color, Scene};
use rayon::prelude::*;

use crate::accumulator::{Accumulator, AccumulatorError};
use crate::camera::Camera;
use crate::integrator::{radiance, IntegratorConfig};
use crate::sampler::{SampleStream, Sampler};

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel per frame
    pub samples_per_pixel: u32,
    /// Path integrator settings
    pub integrator: IntegratorConfig,
}

impl RenderConfig {
    /// Samples actually taken per pixel per frame; zero is treated as one.
    pub fn effective_samples(&self) -> u32 {
        self.samples_per_pixel.max(1)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 192,
            samples_per_pixel: 1,
            integrator: IntegratorConfig::default(),
        }
    }
}

/// Average of `config.effective_samples()` radiance estimates through pixel (x, y).
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    sampler: &mut dyn Sampler,
) -> Color {
    let samples = config.effective_samples();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, sampler);
        pixel_color += radiance(scene, ray, sampler, &config.integrator);
    }

    pixel_color / samples as f64
}

/// Render one frame of per-pixel batch means at the camera's resolution.
///
/// Returns pixels in row-major order, top row first.
pub fn render_frame(scene: &Scene, camera: &Camera, config: &RenderConfig, frame_index: u32) -> Vec<Color> {
    let width = camera.image_width as usize;
    let mut pixels = vec![Color::ZERO; width * camera.image_height as usize];
    if width == 0 {
        return pixels;
    }

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, line)| {
            let y = row as u32;
            let mut sampler = SampleStream::for_row(y, frame_index);
            for (x, pixel) in line.iter_mut().enumerate() {
                *pixel = render_pixel(scene, camera, x as u32, y, config, &mut sampler);
            }
        });

    pixels
}

/// Renders frame after frame into a running average.
///
/// The owner decides when history is stale: changing the camera or the
/// integrator resets automatically, anything else calls [`reset`].
///
/// [`reset`]: ProgressiveRenderer::reset
pub struct ProgressiveRenderer {
    scene: Scene,
    camera: Camera,
    config: RenderConfig,
    accumulator: Accumulator,
    next_frame: u32,
}

impl ProgressiveRenderer {
    /// Create a renderer with an empty accumulator.
    pub fn new(scene: Scene, camera: &CameraSettings, config: RenderConfig) -> Self {
        if let Some(max_depth) = config.integrator.max_depth {
            log::warn!("Path depth capped at {}; long paths will be truncated", max_depth);
        }
        log::info!(
            "Progressive renderer: {}x{}, {} spp per frame, {} spheres",
            config.width,
            config.height,
            config.effective_samples(),
            scene.len()
        );

        Self {
            camera: Camera::new(camera, config.width, config.height),
            accumulator: Accumulator::new(config.width, config.height),
            scene,
            config,
            next_frame: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one more frame and merge it into the running mean.
    ///
    /// Returns the number of frames merged since the last reset. A frame the
    /// accumulator rejects is discarded and the frame index does not advance.
    pub fn render_next_frame(&mut self) -> Result<u32, AccumulatorError> {
        let start = Instant::now();
        let frame = render_frame(&self.scene, &self.camera, &self.config, self.next_frame);
        self.accumulator
            .merge_frame(&frame, self.config.effective_samples())?;

        log::debug!(
            "Frame {} merged in {:.1?} ({} spp total)",
            self.next_frame,
            start.elapsed(),
            self.accumulator.sample_count()
        );
        self.next_frame += 1;
        Ok(self.accumulator.frame_count())
    }

    /// Discard all accumulated frames and restart the seed sequence.
    pub fn reset(&mut self) {
        log::info!(
            "Resetting accumulation after {} frames",
            self.accumulator.frame_count()
        );
        self.accumulator.reset();
        self.next_frame = 0;
    }

    /// Move the camera. History is discarded.
    pub fn set_camera(&mut self, camera: &CameraSettings) {
        self.camera = Camera::new(camera, self.config.width, self.config.height);
        self.reset();
    }

    /// Change the integrator settings. History is discarded.
    pub fn set_integrator(&mut self, integrator: IntegratorConfig) {
        self.config.integrator = integrator;
        self.reset();
    }

    /// Read-only view of the accumulation buffer.
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Current running mean, row-major, top row first.
    pub fn image(&self) -> &[Color] {
        self.accumulator.pixels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::presets;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 16,
            height: 12,
            samples_per_pixel: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_frame_is_reproducible() {
        let description = presets::cornell_box();
        let config = small_config();
        let camera = Camera::new(&description.camera, config.width, config.height);

        let a = render_frame(&description.scene, &camera, &config, 3);
        let b = render_frame(&description.scene, &camera, &config, 3);
        assert_eq!(a, b);

        let c = render_frame(&description.scene, &camera, &config, 4);
        assert_ne!(a, c);
    }

    #[test]
    fn test_render_frame_output_is_finite() {
        let description = presets::cornell_box();
        let config = small_config();
        let camera = Camera::new(&description.camera, config.width, config.height);

        let frame = render_frame(&description.scene, &camera, &config, 0);
        assert_eq!(frame.len(), 16 * 12);
        assert!(frame.iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
        // Something in the box is lit
        assert!(frame.iter().any(|c| c.max_element() > 0.0));
    }

    #[test]
    fn test_render_pixel_uses_row_stream_in_order() {
        // A row rendered pixel by pixel from one stream matches the frame row
        let description = presets::single_light();
        let config = small_config();
        let camera = Camera::new(&description.camera, config.width, config.height);
        let frame = render_frame(&description.scene, &camera, &config, 9);

        let row = 5;
        let mut sampler = SampleStream::for_row(row, 9);
        for x in 0..config.width {
            let color = render_pixel(&description.scene, &camera, x, row, &config, &mut sampler);
            assert_eq!(color, frame[(row * config.width + x) as usize]);
        }
    }

    #[test]
    fn test_zero_samples_treated_as_one() {
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..small_config()
        };
        assert_eq!(config.effective_samples(), 1);
    }

    #[test]
    fn test_progressive_reset_restarts_sequence() {
        let description = presets::cornell_box();
        let mut renderer = ProgressiveRenderer::new(description.scene, &description.camera, small_config());

        assert_eq!(renderer.render_next_frame(), Ok(1));
        let first = renderer.image().to_vec();
        assert_eq!(renderer.render_next_frame(), Ok(2));
        assert_eq!(renderer.accumulator().sample_count(), 4);

        renderer.reset();
        assert_eq!(renderer.accumulator().frame_count(), 0);
        assert!(renderer.image().iter().all(|&c| c == Color::ZERO));

        renderer.render_next_frame().unwrap();
        assert_eq!(renderer.image(), first.as_slice());
    }

    #[test]
    fn test_rejected_frame_is_reported() {
        let description = presets::single_light();
        let mut renderer = ProgressiveRenderer::new(description.scene, &description.camera, small_config());
        renderer.accumulator = Accumulator::new(4, 4);

        assert_eq!(
            renderer.render_next_frame(),
            Err(AccumulatorError::SizeMismatch {
                expected: 16,
                actual: 16 * 12
            })
        );
        assert_eq!(renderer.next_frame, 0);
        assert_eq!(renderer.accumulator().frame_count(), 0);
    }
}
