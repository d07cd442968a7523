//! Bootstrap estimation of run times from successful and censored runs.
//!
//! A run that never reached its target only tells us that its run time exceeds
//! the effort it spent. The estimators in this module turn a mix of successful
//! run lengths and such censored lengths into a resample of run times an
//! algorithm would need if it were restarted until success.

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::percentiles;

/// Result of a bootstrap draw.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resample {
    /// Resampled run-time values, in draw order.
    pub values: Vec<f64>,
    /// The requested percentile of `values`, `None` when `values` is empty.
    pub percentile: Option<f64>,
}

impl Resample {
    /// Builds a resample and computes the requested percentile of its values.
    #[must_use]
    pub fn new(values: Vec<f64>, percentile: f64) -> Self {
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let percentile = percentiles::compute_percentile(&sorted, percentile);
        Self { values, percentile }
    }

    /// Returns `true` if no value was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Draws resampled run-time estimates from successful and unsuccessful run lengths.
///
/// Implementations must be deterministic for a fixed seed, and must return
/// exactly `sample_count` values whenever `successful` is non-empty.
pub trait RunTimeEstimator {
    /// Draws `sample_count` run-time estimates.
    ///
    /// * `successful` - run lengths of trials that reached the target
    /// * `unsuccessful` - effort spent by trials that never reached it
    /// * `percentile` - percentile (fraction in `[0, 1]`) reported in [`Resample::percentile`]
    fn draw_samples(
        &mut self,
        successful: &[f64],
        unsuccessful: &[f64],
        percentile: f64,
        sample_count: usize,
    ) -> Resample;
}

impl<E> RunTimeEstimator for &mut E
where
    E: RunTimeEstimator + ?Sized,
{
    fn draw_samples(
        &mut self,
        successful: &[f64],
        unsuccessful: &[f64],
        percentile: f64,
        sample_count: usize,
    ) -> Resample {
        (**self).draw_samples(successful, unsuccessful, percentile, sample_count)
    }
}

/// Bootstrap estimator simulating independent restarts.
///
/// Each draw picks runs uniformly at random (with replacement) from the pooled
/// successful and unsuccessful runs and adds up their lengths until a
/// successful run is picked. The sum is the run time of one simulated
/// restart sequence.
///
/// Without any successful run no finite estimate exists and the draw is
/// empty; the caller still counts the trial in its denominator.
///
/// # Examples
///
/// ```
/// use rld_stats::bootstrap::{RunTimeEstimator, SimulatedRestarts};
///
/// let mut estimator = SimulatedRestarts::new(42);
/// let resample = estimator.draw_samples(&[100.0], &[], 0.5, 10);
/// assert_eq!(resample.values, vec![100.0; 10]);
/// assert_eq!(resample.percentile, Some(100.0));
///
/// assert!(estimator.draw_samples(&[], &[500.0], 0.5, 10).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedRestarts {
    rng: Pcg32,
}

impl SimulatedRestarts {
    /// Creates an estimator whose draws are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn draw_one(&mut self, successful: &[f64], unsuccessful: &[f64]) -> f64 {
        let pool = successful.len() + unsuccessful.len();
        let mut total = 0.0;
        loop {
            let idx = self.rng.random_range(0..pool);
            if let Some(&run_length) = successful.get(idx) {
                return total + run_length;
            }
            total += unsuccessful[idx - successful.len()];
        }
    }
}

impl RunTimeEstimator for SimulatedRestarts {
    fn draw_samples(
        &mut self,
        successful: &[f64],
        unsuccessful: &[f64],
        percentile: f64,
        sample_count: usize,
    ) -> Resample {
        if successful.is_empty() {
            return Resample::default();
        }
        let values = (0..sample_count)
            .map(|_| self.draw_one(successful, unsuccessful))
            .collect();
        Resample::new(values, percentile)
    }
}
