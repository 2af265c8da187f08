//! Cross-frame accumulation buffer.
//!
//! Holds the running mean radiance of every pixel since the last reset.
//! Each frame contributes a batch mean over `batch_samples` samples per
//! pixel, and merging weights it against everything merged before:
//!
//! `mean' = (mean · n + batch · m) / (n + m)`
//!
//! so after any sequence of merges the buffer equals the plain average of
//! every individual sample, whatever the batch sizes were.

use lumen_core::Color;
use rayon::prelude::*;
use thiserror::Error;

/// Errors from merging a frame.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccumulatorError {
    #[error("Frame has {actual} pixels, accumulator expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Frame was merged with zero samples per pixel")]
    EmptyBatch,
}

/// Running per-pixel mean over all frames since the last reset.
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    mean: Vec<Color>,
    sample_count: u64,
    frame_count: u32,
}

impl Accumulator {
    /// Create a zeroed accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mean: vec![Color::ZERO; (width as usize) * (height as usize)],
            sample_count: 0,
            frame_count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel merged since the last reset.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Frames merged since the last reset.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Running mean of every pixel in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.mean
    }

    /// Get the running mean at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.mean[(y * self.width + x) as usize]
    }

    /// Merge a frame of per-pixel batch means, each over `batch_samples`
    /// samples.
    ///
    /// Pixels are merged in parallel; each worker owns its own slot.
    pub fn merge_frame(&mut self, batch: &[Color], batch_samples: u32) -> Result<(), AccumulatorError> {
        if batch.len() != self.mean.len() {
            return Err(AccumulatorError::SizeMismatch {
                expected: self.mean.len(),
                actual: batch.len(),
            });
        }
        if batch_samples == 0 {
            return Err(AccumulatorError::EmptyBatch);
        }

        let prior = self.sample_count as f64;
        let added = batch_samples as f64;
        let total = prior + added;

        self.mean
            .par_iter_mut()
            .zip(batch.par_iter())
            .for_each(|(mean, &sample)| {
                *mean = (*mean * prior + sample * added) / total;
            });

        self.sample_count += batch_samples as u64;
        self.frame_count += 1;
        Ok(())
    }

    /// Clear every pixel and the sample count.
    pub fn reset(&mut self) {
        self.mean.par_iter_mut().for_each(|m| *m = Color::ZERO);
        self.sample_count = 0;
        self.frame_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: f64, len: usize) -> Vec<Color> {
        vec![Color::splat(value); len]
    }

    fn assert_close(a: Color, b: Color) {
        assert!((a - b).abs().max_element() < 1e-12, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_new_is_zeroed() {
        let acc = Accumulator::new(4, 3);
        assert_eq!(acc.pixels().len(), 12);
        assert!(acc.pixels().iter().all(|&c| c == Color::ZERO));
        assert_eq!(acc.sample_count(), 0);
        assert_eq!(acc.frame_count(), 0);
    }

    #[test]
    fn test_equal_batches_average() {
        let mut acc = Accumulator::new(2, 2);
        let batches = [0.5, 2.0, 1.25, 4.0, 0.0];
        for &b in &batches {
            acc.merge_frame(&frame(b, 4), 1).unwrap();
        }

        let expected = batches.iter().sum::<f64>() / batches.len() as f64;
        for &p in acc.pixels() {
            assert_close(p, Color::splat(expected));
        }
        assert_eq!(acc.frame_count(), 5);
        assert_eq!(acc.sample_count(), 5);
    }

    #[test]
    fn test_unequal_batches_weighted_average() {
        let mut acc = Accumulator::new(1, 1);
        acc.merge_frame(&[Color::new(1.0, 2.0, 3.0)], 4).unwrap();
        acc.merge_frame(&[Color::new(3.0, 0.0, 1.0)], 12).unwrap();
        acc.merge_frame(&[Color::new(0.5, 0.5, 0.5)], 1).unwrap();

        let expected = (Color::new(1.0, 2.0, 3.0) * 4.0
            + Color::new(3.0, 0.0, 1.0) * 12.0
            + Color::new(0.5, 0.5, 0.5) * 1.0)
            / 17.0;
        assert_close(acc.get(0, 0), expected);
        assert_eq!(acc.sample_count(), 17);
    }

    #[test]
    fn test_matches_mean_of_individual_samples() {
        // Batches of different sizes built from a known list of samples
        let samples: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64 * 0.3).collect();
        let mut acc = Accumulator::new(1, 1);
        for chunk in [&samples[0..1], &samples[1..9], &samples[9..12], &samples[12..30]] {
            let batch_mean = chunk.iter().sum::<f64>() / chunk.len() as f64;
            acc.merge_frame(&[Color::splat(batch_mean)], chunk.len() as u32).unwrap();
        }

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert_close(acc.get(0, 0), Color::splat(mean));
    }

    #[test]
    fn test_pixels_merge_independently() {
        let mut acc = Accumulator::new(3, 1);
        acc.merge_frame(&[Color::ZERO, Color::ONE, Color::splat(2.0)], 1).unwrap();
        acc.merge_frame(&[Color::splat(2.0), Color::ONE, Color::ZERO], 1).unwrap();

        assert_close(acc.get(0, 0), Color::ONE);
        assert_close(acc.get(1, 0), Color::ONE);
        assert_close(acc.get(2, 0), Color::ONE);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut acc = Accumulator::new(2, 1);
        acc.merge_frame(&frame(10.0, 2), 8).unwrap();
        acc.reset();

        assert!(acc.pixels().iter().all(|&c| c == Color::ZERO));
        assert_eq!(acc.sample_count(), 0);
        assert_eq!(acc.frame_count(), 0);

        // History before the reset no longer counts
        acc.merge_frame(&frame(1.0, 2), 1).unwrap();
        assert_close(acc.get(1, 0), Color::ONE);
    }

    #[test]
    fn test_rejects_bad_frames() {
        let mut acc = Accumulator::new(2, 2);
        assert_eq!(
            acc.merge_frame(&frame(1.0, 3), 1),
            Err(AccumulatorError::SizeMismatch { expected: 4, actual: 3 })
        );
        assert_eq!(acc.merge_frame(&frame(1.0, 4), 0), Err(AccumulatorError::EmptyBatch));
        assert_eq!(acc.sample_count(), 0);
    }
}
