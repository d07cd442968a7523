//! Per-trial evaluation records
//!
//! A trial is one independent run of an algorithm on one (function,
//! dimension, instance) triple. While it runs, the best precision reached so
//! far is logged together with the number of evaluations spent:
//!
//! ```text
//! evals:   1     10    120   900   (max_evals = 1000)
//! fvalue:  3e2   4e0   1e-3  1e-8
//! ```
//!
//! # Right-Censored Run Lengths
//!
//! A trial that reaches a target gives its exact run length for that target.
//! A trial that never reaches it only tells us that its run length exceeds
//! `max_evals`:
//!
//! ```text
//! Successful: |----x     (target hit after 120 evaluations)
//! Censored:   |--------> (stopped at 1000 evaluations, target never hit)
//! ```
//!
//! # Serialization
//!
//! ```json
//! {
//!   "algorithm": "BIPOP-CMA-ES",
//!   "function_id": 1,
//!   "dimension": 5,
//!   "instance": 1,
//!   "max_evals": 1000,
//!   "observations": [{ "evals": 1, "fvalue": 300.0 }, { "evals": 120, "fvalue": 1e-3 }]
//! }
//! ```
//!
//! Records are validated when deserialized: observations must have
//! non-decreasing evaluation counts and the dimension must be positive.

use serde::{Deserialize, Serialize};

use crate::function::{Dimension, FunctionGroup, FunctionId, NoiseClass};

/// Invalid trial record.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("dimension must be positive")]
    ZeroDimension,
    #[display(
        "evaluation counts must be non-decreasing (observation {index}: {evals} after {previous})"
    )]
    NonMonotoneEvals {
        index: usize,
        previous: u64,
        evals: u64,
    },
}

/// Best precision reached after a number of evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Number of function evaluations spent.
    pub evals: u64,
    /// Best precision (distance to the optimal function value) reached so far.
    pub fvalue: f64,
}

impl Observation {
    #[must_use]
    pub fn new(evals: u64, fvalue: f64) -> Self {
        Self { evals, fvalue }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawTrialRecord {
    #[serde(default)]
    algorithm: String,
    function_id: FunctionId,
    dimension: Dimension,
    #[serde(default)]
    instance: u32,
    max_evals: u64,
    observations: Vec<Observation>,
}

impl TryFrom<RawTrialRecord> for TrialRecord {
    type Error = RecordError;

    fn try_from(raw: RawTrialRecord) -> Result<Self, Self::Error> {
        TrialRecord::new(
            raw.algorithm,
            raw.function_id,
            raw.dimension,
            raw.instance,
            raw.max_evals,
            raw.observations,
        )
    }
}

/// One independent run of an algorithm on a (function, dimension, instance) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrialRecord")]
pub struct TrialRecord {
    algorithm: String,
    function_id: FunctionId,
    dimension: Dimension,
    instance: u32,
    max_evals: u64,
    observations: Vec<Observation>,
}

impl TrialRecord {
    /// Creates a record, checking that evaluation counts never decrease.
    pub fn new(
        algorithm: impl Into<String>,
        function_id: FunctionId,
        dimension: Dimension,
        instance: u32,
        max_evals: u64,
        observations: Vec<Observation>,
    ) -> Result<Self, RecordError> {
        if dimension == 0 {
            return Err(RecordError::ZeroDimension);
        }
        for (index, pair) in observations.windows(2).enumerate() {
            if pair[1].evals < pair[0].evals {
                return Err(RecordError::NonMonotoneEvals {
                    index: index + 1,
                    previous: pair[0].evals,
                    evals: pair[1].evals,
                });
            }
        }
        Ok(Self {
            algorithm: algorithm.into(),
            function_id,
            dimension,
            instance,
            max_evals,
            observations,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    #[must_use]
    pub fn function_id(&self) -> FunctionId {
        self.function_id
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Evaluations spent by the trial, whether or not it reached any target.
    #[must_use]
    pub fn max_evals(&self) -> u64 {
        self.max_evals
    }

    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    #[must_use]
    pub fn noise_class(&self) -> Option<NoiseClass> {
        NoiseClass::of(self.function_id)
    }

    #[must_use]
    pub fn function_group(&self) -> Option<FunctionGroup> {
        FunctionGroup::of(self.function_id)
    }

    /// Returns the number of evaluations after which `target` was first reached.
    ///
    /// Observations logged after `max_evals` do not count. Returns `None` if
    /// the target was never reached, i.e. the run length is censored at
    /// [`max_evals`](Self::max_evals).
    #[must_use]
    pub fn run_length(&self, target: f64) -> Option<u64> {
        self.observations
            .iter()
            .take_while(|obs| obs.evals <= self.max_evals)
            .find(|obs| obs.fvalue <= target)
            .map(|obs| obs.evals)
    }

    /// Returns `true` if the trial reached `target` within its budget.
    #[must_use]
    pub fn is_successful(&self, target: f64) -> bool {
        self.run_length(target).is_some()
    }

    /// Returns the precision logged last with at most `budget` evaluations spent.
    ///
    /// Like [`run_length`](Self::run_length), observations logged after
    /// `max_evals` do not count. Returns `None` if the first observation
    /// already exceeds the budget.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fvalue_at_budget(&self, budget: f64) -> Option<f64> {
        self.observations
            .iter()
            .take_while(|obs| obs.evals <= self.max_evals && obs.evals as f64 <= budget)
            .last()
            .map(|obs| obs.fvalue)
    }

    /// Returns `max_evals / dimension`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn max_evals_per_dimension(&self) -> f64 {
        self.max_evals as f64 / f64::from(self.dimension)
    }

    /// Key ordering records by algorithm, function, dimension and instance.
    #[must_use]
    pub fn sort_key(&self) -> (&str, FunctionId, Dimension, u32) {
        (
            &self.algorithm,
            self.function_id,
            self.dimension,
            self.instance,
        )
    }
}
