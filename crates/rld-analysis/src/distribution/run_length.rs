//! Run-length distributions for a target precision
//!
//! The run length of a trial is the number of evaluations it needed to reach
//! the target, divided by the problem dimension so distributions from
//! different dimensions share a scale. Trials that never reached the target
//! are right-censored: they add nothing to the sample but still count in the
//! denominator, which turns the final ECDF value into the fraction of solved
//! trials.

use std::collections::BTreeSet;

use rld_data::{FunctionId, Target, TrialCollection};
use rld_stats::ecdf::Ecdf;

use super::{AggregateError, ensure_single_dimension};

/// Run lengths of the trials that reached a target.
#[derive(Debug, Clone)]
pub struct RunLengthDistribution {
    /// `evaluations / dimension` of every successful trial.
    pub sample: Vec<f64>,
    /// Number of trials examined, including unsuccessful ones.
    pub n: usize,
    /// Functions present in the collection.
    pub functions: BTreeSet<FunctionId>,
    /// Functions solved by at least one trial.
    pub solved: BTreeSet<FunctionId>,
    /// The shared target precision, if the target was a scalar.
    pub target: Option<f64>,
}

impl RunLengthDistribution {
    /// Returns the ECDF of the run lengths over all trials.
    #[must_use]
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::new(&self.sample, Some(self.n))
    }

    /// Legend caption: `log10` of the target and the solved/present function counts.
    ///
    /// A scalar target `1e-8` with 3 of 5 functions solved gives `"-8:3/5"`;
    /// per-function targets only give `"3/5"`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn label(&self) -> String {
        let counts = format!("{}/{}", self.solved.len(), self.functions.len());
        match self.target {
            Some(target) if target > 0.0 => {
                let exponent = target.log10().round() as i64;
                format!("{exponent:+}:{counts}")
            }
            _ => counts,
        }
    }
}

/// Collects the dimension-normalized run lengths to `target` over `collection`.
///
/// For every record, the target is resolved for its function and the smallest
/// evaluation count reaching it (within the record's budget) contributes
/// `evals / dimension`. Every record adds one to the denominator.
///
/// # Errors
///
/// - [`AggregateError::DimensionMismatch`] if the collection spans several dimensions
/// - [`AggregateError::TargetLookup`] if a per-function target misses a function of the collection
///
/// # Examples
///
/// ```
/// use rld_analysis::distribution::run_length_distribution;
/// use rld_data::{Observation, Target, TrialCollection, TrialRecord};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
/// let records = [Some(40), None, Some(20), None]
///     .into_iter()
///     .map(|hit| {
///         let mut observations = vec![Observation::new(1, 10.0)];
///         if let Some(evals) = hit {
///             observations.push(Observation::new(evals, 1e-9));
///         }
///         TrialRecord::new("alg", 1, 2, 1, 100, observations)
///     })
///     .collect::<Result<TrialCollection, _>>()?;
///
/// let dist = run_length_distribution(&records, &Target::Scalar(1e-8))?;
/// assert_eq!(dist.sample, vec![20.0, 10.0]);
/// assert_eq!(dist.n, 4);
/// assert_eq!(dist.ecdf().curve().final_fraction(), Some(0.5));
/// assert_eq!(dist.label(), "-8:1/1");
/// # Ok(())
/// # }
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn run_length_distribution(
    collection: &TrialCollection,
    target: &Target,
) -> Result<RunLengthDistribution, AggregateError> {
    ensure_single_dimension(collection)?;

    let mut sample = vec![];
    let mut n = 0;
    let mut functions = BTreeSet::new();
    let mut solved = BTreeSet::new();

    for record in collection {
        let precision = target.resolve(record.function_id())?;
        functions.insert(record.function_id());
        if let Some(evals) = record.run_length(precision) {
            solved.insert(record.function_id());
            sample.push(evals as f64 / f64::from(record.dimension()));
        }
        n += 1;
    }

    tracing::debug!(
        solved_trials = sample.len(),
        trials = n,
        functions = functions.len(),
        "run-length distribution collected"
    );

    Ok(RunLengthDistribution {
        sample,
        n,
        functions,
        solved,
        target: target.as_scalar(),
    })
}

#[cfg(test)]
mod tests {
    use rld_data::{DimensionMismatchError, TargetLookupError};

    use super::*;
    use crate::distribution::test_util::record;

    fn six_of_ten() -> TrialCollection {
        (0..10u32)
            .map(|i| {
                if i < 6 {
                    let evals = 100 * u64::from(i + 1);
                    record(1 + i % 3, 5, 1000, &[(1, 10.0), (evals, 1e-9)])
                } else {
                    record(1 + i % 3, 5, 1000, &[(1, 10.0), (500, 1e-3)])
                }
            })
            .collect()
    }

    #[test]
    fn test_fraction_solved() {
        let dist = run_length_distribution(&six_of_ten(), &Target::Scalar(1e-8)).unwrap();
        assert_eq!(dist.n, 10);
        assert_eq!(dist.sample.len(), 6);
        let curve = dist.ecdf().curve();
        assert!((curve.final_fraction().unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_values_are_divided_by_dimension() {
        let collection: TrialCollection =
            [record(1, 5, 1000, &[(1, 10.0), (250, 1e-9)])].into_iter().collect();
        let dist = run_length_distribution(&collection, &Target::Scalar(1e-8)).unwrap();
        assert_eq!(dist.sample, vec![50.0]);
    }

    #[test]
    fn test_solved_functions() {
        let collection: TrialCollection = [
            record(1, 5, 1000, &[(1, 10.0), (100, 1e-9)]),
            record(2, 5, 1000, &[(1, 10.0)]),
            record(3, 5, 1000, &[(1, 10.0), (300, 1e-9)]),
        ]
        .into_iter()
        .collect();
        let dist = run_length_distribution(&collection, &Target::Scalar(1e-8)).unwrap();
        assert_eq!(dist.functions, BTreeSet::from([1, 2, 3]));
        assert_eq!(dist.solved, BTreeSet::from([1, 3]));
        assert_eq!(dist.label(), "-8:2/3");
    }

    #[test]
    fn test_label_for_targets() {
        let collection: TrialCollection =
            [record(1, 5, 1000, &[(1, 10.0)])].into_iter().collect();
        let dist = run_length_distribution(&collection, &Target::Scalar(10.0)).unwrap();
        assert_eq!(dist.label(), "+1:1/1");

        let dist = run_length_distribution(&collection, &Target::per_function([(1, 1.0)])).unwrap();
        assert_eq!(dist.label(), "0/1");
    }

    #[test]
    fn test_per_function_target() {
        let collection: TrialCollection = [
            record(1, 5, 1000, &[(1, 10.0), (100, 1e-2)]),
            record(2, 5, 1000, &[(1, 10.0), (100, 1e-2)]),
        ]
        .into_iter()
        .collect();
        let target = Target::per_function([(1, 1e-1), (2, 1e-3)]);
        let dist = run_length_distribution(&collection, &target).unwrap();
        assert_eq!(dist.sample, vec![20.0]);
        assert_eq!(dist.n, 2);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let collection: TrialCollection = [
            record(1, 5, 1000, &[(1, 10.0)]),
            record(7, 5, 1000, &[(1, 10.0)]),
        ]
        .into_iter()
        .collect();
        let target = Target::per_function([(1, 1e-1)]);
        let err = run_length_distribution(&collection, &target).unwrap_err();
        assert_eq!(
            err,
            AggregateError::TargetLookup(TargetLookupError { function_id: 7 })
        );
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let collection: TrialCollection = [
            record(1, 5, 1000, &[(1, 10.0)]),
            record(1, 10, 1000, &[(1, 10.0)]),
        ]
        .into_iter()
        .collect();
        let err = run_length_distribution(&collection, &Target::Scalar(1.0)).unwrap_err();
        assert_eq!(
            err,
            AggregateError::DimensionMismatch(DimensionMismatchError {
                dimensions: vec![5, 10]
            })
        );
    }

    #[test]
    fn test_empty_collection() {
        let dist = run_length_distribution(&TrialCollection::default(), &Target::Scalar(1.0))
            .unwrap();
        assert_eq!(dist.n, 0);
        assert!(dist.ecdf().curve().is_empty());
    }

    #[test]
    fn test_record_order_does_not_change_curve() {
        let collection = six_of_ten();
        let reversed: TrialCollection = collection.records().iter().rev().cloned().collect();
        let a = run_length_distribution(&collection, &Target::Scalar(1e-8)).unwrap();
        let b = run_length_distribution(&reversed, &Target::Scalar(1e-8)).unwrap();
        assert_eq!(a.ecdf().curve(), b.ecdf().curve());
    }
}
