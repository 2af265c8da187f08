//! Deterministic random streams for the estimator.
//!
//! Every image row of every frame draws from its own stream, seeded from the
//! `(row, frame)` pair by [`stream_seed`]. Within a row, draws are consumed in
//! a fixed order so two implementations of the estimator can be compared
//! sample for sample:
//!
//! 1. per pixel sub-sample, two draws for the tent-filtered jitter
//!    (horizontal, then vertical);
//! 2. per surface hit beyond the roulette depth, one draw for Russian
//!    roulette;
//! 3. per diffuse bounce, two draws (azimuth, then radius);
//! 4. per dielectric hit without total internal reflection, one draw for the
//!    reflect/transmit choice.
//!
//! Pixels are visited left to right and sub-samples in order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniform numbers in `[0, 1)`.
pub trait Sampler {
    /// Next uniform number in `[0, 1)`.
    fn next_1d(&mut self) -> f64;

    /// Two consecutive uniform numbers.
    fn next_2d(&mut self) -> (f64, f64) {
        let a = self.next_1d();
        let b = self.next_1d();
        (a, b)
    }
}

/// Mix a row index and frame index into a 64-bit stream seed.
///
/// Both integers pass through the SplitMix64 finalizer, so neighbouring rows
/// and frames land on unrelated seeds.
pub fn stream_seed(row: u32, frame: u32) -> u64 {
    let row_key = splitmix64(row as u64);
    splitmix64(row_key ^ (frame as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Portable seeded stream backed by ChaCha8.
///
/// ChaCha output is specified independently of platform and crate version,
/// which keeps renders bit-reproducible.
#[derive(Debug, Clone)]
pub struct SampleStream {
    rng: ChaCha8Rng,
}

impl SampleStream {
    /// Create a stream from a raw seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The stream for one row of one frame.
    pub fn for_row(row: u32, frame: u32) -> Self {
        Self::new(stream_seed(row, frame))
    }
}

impl Sampler for SampleStream {
    #[inline]
    fn next_1d(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one.
///
/// Used to force specific branches of the estimator.
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    values: Vec<f64>,
    consumed: usize,
}

impl SequenceSampler {
    /// Create a sampler replaying `values`. An empty list yields 0.5 forever.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            consumed: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl Sampler for SequenceSampler {
    fn next_1d(&mut self) -> f64 {
        let value = self
            .values
            .get(self.consumed)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0.5);
        self.consumed += 1;
        value
    }
}
