//! Running mean, deviation and extremes of a stream of samples.

/// Single-pass accumulator over `f64` samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    sum: f64,
    sum2: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl Statistics {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    pub fn accum(&mut self, v: f64) {
        self.sum += v;
        self.sum2 += v * v;
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.count += 1;
    }

    /// Number of samples.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or 0 with no samples.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population standard deviation, or 0 with no samples.
    pub fn std(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        // Rounding can push the variance slightly below zero.
        ((self.sum2 - self.sum * self.sum / n) / n).max(0.0).sqrt()
    }

    /// Smallest sample, or 0 with no samples.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample, or 0 with no samples.
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl FromIterator<f64> for Statistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut s = Self::new();
        for v in iter {
            s.accum(v);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_is_zero() {
        let s = Statistics::new();
        assert_eq!(s.count(), 0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.std(), 0.0);
    }

    #[test]
    fn known_values() {
        let s: Statistics = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert_eq!(s.count(), 8);
        assert_eq!(s.mean(), 5.0);
        assert!((s.std() - 2.0).abs() < 1e-12);
        assert_eq!(s.min(), 2.0);
        assert_eq!(s.max(), 9.0);
    }

    proptest! {
        #[test]
        fn mean_within_extremes(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let s: Statistics = values.iter().copied().collect();
            prop_assert!(s.mean() >= s.min() - 1e-6);
            prop_assert!(s.mean() <= s.max() + 1e-6);
            prop_assert!(s.std() >= 0.0);
        }

        #[test]
        fn constant_stream_has_no_spread(v in -1e3f64..1e3, n in 1usize..50) {
            let s: Statistics = std::iter::repeat(v).take(n).collect();
            prop_assert!((s.mean() - v).abs() < 1e-9);
            prop_assert!(s.std() <= 1e-4 * v.abs().max(1.0));
        }
    }
}
