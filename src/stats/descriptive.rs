//! Running accumulators.
//!
//! [`NeumaierSum`] is the accumulator behind numeric summation and
//! quadrature. Test builds also get a Welford accumulator for checking the
//! draws of [`sample`](super::sample) against analytic moments.
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier's improvement of Kahan compensated summation, so the
//!   error stays O(ε) even when a term is larger than the running total.
//! - **Variance** (tests only): Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

/// Streaming compensated sum.
///
/// # Examples
/// ```
/// use hall::stats::descriptive::NeumaierSum;
/// let mut acc = NeumaierSum::new();
/// for x in [1.0, 1e100, 1.0, -1e100] {
///     acc.add(x);
/// }
/// assert_eq!(acc.total(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one term.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// The compensated total of every term added so far.
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Streaming mean and variance of sampled values.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

#[cfg(test)]
impl WelfordAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            // M₂ stays zero
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// n − 1 denominator.
    pub(crate) fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub(crate) fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub(crate) fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neumaier_recovers_cancelled_terms() {
        let mut acc = NeumaierSum::new();
        for x in [1.0, 1e100, 1.0, -1e100] {
            acc.add(x);
        }
        assert_eq!(acc.total(), 2.0);
    }

    #[test]
    fn test_neumaier_many_small_terms() {
        let mut acc = NeumaierSum::new();
        for _ in 0..10_000_000 {
            acc.add(0.1);
        }
        assert!((acc.total() - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(NeumaierSum::new().total(), 0.0);
    }

    #[test]
    fn test_accumulator_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.sample_variance(), None);
        assert_eq!(acc.population_variance(), None);
    }

    #[test]
    fn test_accumulator_moments() {
        let mut acc = WelfordAccumulator::new();
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            acc.update(x);
        }
        assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
        assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
        assert!((acc.sample_variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_large_offset() {
        let mut acc = WelfordAccumulator::new();
        for x in [1e9 + 4.0, 1e9 + 7.0, 1e9 + 13.0, 1e9 + 16.0] {
            acc.update(x);
        }
        assert!((acc.sample_variance().unwrap() - 30.0).abs() < 1e-6);
    }
}
