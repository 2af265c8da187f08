use crate::Float;

/// A closed range of ray parameters or channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: Float) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// NaN maps to `min` so downstream conversions never see it.
    pub fn clamp(&self, x: Float) -> Float {
        if x.is_nan() {
            self.min
        } else {
            x.clamp(self.min, self.max)
        }
    }

    /// The unit interval [0, 1].
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// All positive parameters beyond `min`, open-ended.
    pub const fn beyond(min: Float) -> Interval {
        Interval {
            min,
            max: Float::INFINITY,
        }
    }
}
