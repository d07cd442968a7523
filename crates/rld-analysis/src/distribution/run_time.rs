//! Estimated run-time distributions
//!
//! A censored trial does not give a run length, but it tells how much effort
//! was wasted before giving up. The estimated run time blends both: the runs
//! of one algorithm on one function are pooled, and a bootstrap estimator
//! simulates restarting the algorithm from that pool until it succeeds,
//! returning a fixed-size resample of the resulting run times.
//!
//! Every pool adds exactly `sample_size` to the denominator, whatever the
//! number of runs behind it, so functions stay comparable.

use std::collections::BTreeMap;

use rld_data::{FunctionId, Target, TrialCollection};
use rld_stats::{bootstrap::RunTimeEstimator, ecdf::Ecdf};

use super::{AggregateError, ensure_single_dimension};

/// Number of bootstrap draws per (algorithm, function) pool.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Percentile reported by the estimator. It does not affect the draws.
pub const DEFAULT_PERCENTILE: f64 = 0.5;

/// Bootstrap run-time estimates of a collection.
#[derive(Debug, Clone)]
pub struct RunTimeDistribution {
    /// Concatenated resampled run times, in evaluations.
    pub sample: Vec<f64>,
    /// `sample_size` times the number of (algorithm, function) pools examined.
    pub n: usize,
}

impl RunTimeDistribution {
    #[must_use]
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::new(&self.sample, Some(self.n))
    }
}

/// Successful run lengths and censored efforts of the runs of one pool.
#[derive(Debug, Default)]
struct RunPool {
    successful: Vec<f64>,
    unsuccessful: Vec<f64>,
}

/// Collects bootstrap run-time estimates for `target` over `collection`.
///
/// Runs are pooled per algorithm and function: solved runs give their run
/// length, failed runs their `max_evals`. Pools are visited ordered by
/// algorithm and function, runs within a pool by instance, so a seeded
/// estimator produces the same sample whatever the order of the collection.
/// A pool without any solved run draws nothing but still counts in `n`.
///
/// # Errors
///
/// - [`AggregateError::DimensionMismatch`] if the collection spans several dimensions
/// - [`AggregateError::TargetLookup`] if a per-function target misses a function of the collection
///
/// Both are detected before the estimator is called.
///
/// # Examples
///
/// ```
/// use rld_analysis::distribution::run_time_distribution;
/// use rld_data::{Observation, Target, TrialCollection, TrialRecord};
/// use rld_stats::bootstrap::SimulatedRestarts;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
/// let records = (1..=3)
///     .map(|instance| {
///         TrialRecord::new("alg", 1, 2, instance, 100, vec![Observation::new(30, 1e-9)])
///     })
///     .collect::<Result<TrialCollection, _>>()?;
///
/// // The three runs of f1 form one pool.
/// let mut estimator = SimulatedRestarts::new(0);
/// let dist = run_time_distribution(&records, &Target::Scalar(1e-8), &mut estimator, 1000, 0.5)?;
/// assert_eq!(dist.n, 1000);
/// assert_eq!(dist.sample, vec![30.0; 1000]);
/// # Ok(())
/// # }
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn run_time_distribution<E>(
    collection: &TrialCollection,
    target: &Target,
    estimator: &mut E,
    sample_size: usize,
    percentile: f64,
) -> Result<RunTimeDistribution, AggregateError>
where
    E: RunTimeEstimator + ?Sized,
{
    ensure_single_dimension(collection)?;

    let mut records = collection
        .iter()
        .map(|record| Ok((record, target.resolve(record.function_id())?)))
        .collect::<Result<Vec<_>, AggregateError>>()?;
    records.sort_by(|(a, _), (b, _)| a.sort_key().cmp(&b.sort_key()));

    let mut pools: BTreeMap<(&str, FunctionId), RunPool> = BTreeMap::new();
    for (record, precision) in records {
        let pool = pools
            .entry((record.algorithm(), record.function_id()))
            .or_default();
        match record.run_length(precision) {
            Some(evals) => pool.successful.push(evals as f64),
            None => pool.unsuccessful.push(record.max_evals() as f64),
        }
    }

    let mut sample = vec![];
    let mut n = 0;
    for pool in pools.values() {
        let resample =
            estimator.draw_samples(&pool.successful, &pool.unsuccessful, percentile, sample_size);
        sample.extend(resample.values);
        n += sample_size;
    }

    tracing::debug!(
        draws = sample.len(),
        n,
        pools = pools.len(),
        records = collection.len(),
        "run-time distribution collected"
    );

    Ok(RunTimeDistribution { sample, n })
}
