//! Distributions aggregated over a trial collection
//!
//! Each aggregator walks a single-dimension [`TrialCollection`], turns every
//! record into at most a few sample values, and keeps a denominator counting
//! the records it examined. Records that contribute no value (unsolved trials)
//! still count in the denominator, so the resulting ECDF tops out at the
//! fraction of solved trials instead of 1.
//!
//! - [`run_length`]: Evaluations to reach a target, divided by dimension
//! - [`run_time`]: Bootstrap run-time estimates drawn from successful and censored runs
//! - [`final_value`]: Precision reached at a fixed evaluation budget, divided by the target

use rld_data::{DimensionMismatchError, TargetLookupError, TrialCollection};

pub mod final_value;
pub mod run_length;
pub mod run_time;

pub use self::{
    final_value::{FinalValueDistribution, final_value_distribution},
    run_length::{RunLengthDistribution, run_length_distribution},
    run_time::{RunTimeDistribution, run_time_distribution},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AggregateError {
    #[display("{_0}")]
    TargetLookup(TargetLookupError),
    #[display("{_0}")]
    DimensionMismatch(DimensionMismatchError),
}

/// Fails unless all records share one dimension.
fn ensure_single_dimension(collection: &TrialCollection) -> Result<(), DimensionMismatchError> {
    collection.single_dimension().map(|_| ())
}

#[cfg(test)]
pub(crate) mod test_util {
    use rld_data::{Observation, TrialRecord};

    pub(crate) fn record(
        function_id: u32,
        dimension: u32,
        max_evals: u64,
        observations: &[(u64, f64)],
    ) -> TrialRecord {
        TrialRecord::new(
            "alg",
            function_id,
            dimension,
            1,
            max_evals,
            observations
                .iter()
                .map(|&(evals, fvalue)| Observation::new(evals, fvalue))
                .collect(),
        )
        .unwrap()
    }
}
