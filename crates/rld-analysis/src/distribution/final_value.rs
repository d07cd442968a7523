//! Distributions of the precision reached at a fixed budget
//!
//! Instead of asking "how long until the target", this distribution asks "how
//! close to the target after `budget_factor * dimension` evaluations". Values
//! are divided by the target so that 1 means "target just reached".
//!
//! Precisions below the target can yield non-positive ratios, which a
//! logarithmic axis cannot show. Those entries are clipped to the smallest
//! positive ratio of the batch (or to their own target when the batch has no
//! positive ratio); the sample keeps its length and the positive entries keep
//! their order.

use rld_data::{Target, TrialCollection};
use rld_stats::ecdf::Ecdf;

use super::{AggregateError, ensure_single_dimension};

/// Ratios of reached precision over target at a fixed evaluation budget.
#[derive(Debug, Clone)]
pub struct FinalValueDistribution {
    /// `precision / target` of every record that logged a value within budget.
    pub sample: Vec<f64>,
    /// Number of records examined.
    pub n: usize,
    /// Budget in evaluations per dimension.
    pub budget_factor: f64,
}

impl FinalValueDistribution {
    #[must_use]
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::new(&self.sample, Some(self.n))
    }
}

/// Replaces non-positive ratios with the smallest positive one.
///
/// `entries` holds `(ratio, target)` pairs; when no ratio is positive each
/// non-positive ratio falls back to its own target.
fn clip_non_positive(entries: Vec<(f64, f64)>) -> Vec<f64> {
    let floor = entries
        .iter()
        .map(|&(ratio, _)| ratio)
        .filter(|&ratio| ratio > 0.0)
        .min_by(f64::total_cmp);
    entries
        .into_iter()
        .map(|(ratio, target)| {
            if ratio <= 0.0 {
                floor.unwrap_or(target)
            } else {
                ratio
            }
        })
        .collect()
}

/// Collects the target-normalized precisions reached after
/// `budget_factor * dimension` evaluations.
///
/// For each record, the last observation within budget is used. Records
/// without any observation within budget add nothing to the sample but count
/// in the denominator, like unsolved trials.
///
/// # Errors
///
/// - [`AggregateError::DimensionMismatch`] if the collection spans several dimensions
/// - [`AggregateError::TargetLookup`] if a per-function target misses a function of the collection
///
/// # Examples
///
/// ```
/// use rld_analysis::distribution::final_value_distribution;
/// use rld_data::{Observation, Target, TrialCollection, TrialRecord};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
/// let records = [-0.5, 2.0]
///     .into_iter()
///     .map(|fvalue| TrialRecord::new("alg", 1, 2, 1, 100, vec![Observation::new(10, fvalue)]))
///     .collect::<Result<TrialCollection, _>>()?;
///
/// let dist = final_value_distribution(&records, &Target::Scalar(1.0), 10.0)?;
/// assert_eq!(dist.sample, vec![2.0, 2.0]);
/// assert_eq!(dist.n, 2);
/// # Ok(())
/// # }
/// ```
pub fn final_value_distribution(
    collection: &TrialCollection,
    target: &Target,
    budget_factor: f64,
) -> Result<FinalValueDistribution, AggregateError> {
    ensure_single_dimension(collection)?;

    let mut entries = vec![];
    let mut n = 0;
    for record in collection {
        let precision = target.resolve(record.function_id())?;
        let budget = budget_factor * f64::from(record.dimension());
        if let Some(fvalue) = record.fvalue_at_budget(budget) {
            entries.push((fvalue / precision, precision));
        }
        n += 1;
    }

    let sample = clip_non_positive(entries);
    tracing::debug!(
        values = sample.len(),
        n,
        budget_factor,
        "final-value distribution collected"
    );

    Ok(FinalValueDistribution {
        sample,
        n,
        budget_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_util::record;

    #[test]
    fn test_clip_uses_smallest_positive_ratio() {
        let clipped = clip_non_positive(vec![(5.0, 1.0), (-1.0, 1.0), (0.0, 1.0), (0.5, 1.0)]);
        assert_eq!(clipped, vec![5.0, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_clip_falls_back_to_target() {
        let clipped = clip_non_positive(vec![(-1.0, 1e-3), (0.0, 1e-5)]);
        assert_eq!(clipped, vec![1e-3, 1e-5]);
    }

    #[test]
    fn test_clip_keeps_positive_entries() {
        let input = vec![(3.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
        assert_eq!(clip_non_positive(input), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_negative_value_clipped_to_positive_floor() {
        let collection: TrialCollection = [
            record(1, 2, 100, &[(10, -0.5)]),
            record(1, 2, 100, &[(10, 2.0)]),
        ]
        .into_iter()
        .collect();
        let dist = final_value_distribution(&collection, &Target::Scalar(1.0), 10.0).unwrap();
        assert_eq!(dist.sample, vec![2.0, 2.0]);
        assert_eq!(dist.n, 2);
    }

    #[test]
    fn test_budget_selects_last_observation_within_budget() {
        let collection: TrialCollection = [record(
            1,
            2,
            1000,
            &[(1, 100.0), (10, 10.0), (100, 1.0), (400, 0.01)],
        )]
        .into_iter()
        .collect();
        let target = Target::Scalar(0.1);

        let dist = final_value_distribution(&collection, &target, 5.0).unwrap();
        assert_eq!(dist.sample, vec![100.0]);

        let dist = final_value_distribution(&collection, &target, 50.0).unwrap();
        assert_eq!(dist.sample, vec![10.0]);

        let dist = final_value_distribution(&collection, &target, 1e4).unwrap();
        assert!((dist.sample[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_record_without_observation_in_budget_counts_in_denominator() {
        let collection: TrialCollection = [
            record(1, 2, 1000, &[(50, 10.0)]),
            record(1, 2, 1000, &[(1, 10.0)]),
        ]
        .into_iter()
        .collect();
        let dist = final_value_distribution(&collection, &Target::Scalar(1.0), 1.0).unwrap();
        assert_eq!(dist.sample, vec![10.0]);
        assert_eq!(dist.n, 2);
        assert_eq!(dist.ecdf().curve().final_fraction(), Some(0.5));
    }

    #[test]
    fn test_agrees_with_run_length_past_max_evals() {
        let collection: TrialCollection = [record(1, 1, 100, &[(1, 10.0), (500, 1e-9)])]
            .into_iter()
            .collect();
        let target = Target::Scalar(1e-8);

        let rld = crate::distribution::run_length_distribution(&collection, &target).unwrap();
        assert!(rld.sample.is_empty());

        let dist = final_value_distribution(&collection, &target, 1000.0).unwrap();
        assert_eq!(dist.sample.len(), 1);
        assert!((dist.sample[0] - 1e9).abs() < 1.0);
        assert_eq!(dist.n, 1);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let collection: TrialCollection = [
            record(1, 2, 1000, &[(1, -3.0)]),
            record(2, 2, 1000, &[(1, 0.3)]),
            record(3, 2, 1000, &[(1, 7.0)]),
        ]
        .into_iter()
        .collect();
        let target = Target::per_function([(1, 0.1), (2, 0.1), (3, 0.1)]);
        let a = final_value_distribution(&collection, &target, 1.0).unwrap();
        let b = final_value_distribution(&collection, &target, 1.0).unwrap();
        assert_eq!(a.sample, b.sample);
        assert_eq!(a.ecdf().curve(), b.ecdf().curve());
    }
}
