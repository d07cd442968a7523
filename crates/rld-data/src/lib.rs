//! Trial data for run-length distribution analysis
//!
//! This crate is the data provider of the analysis: it models the results of
//! repeated randomized optimization trials and the targets that define their
//! success.
//!
//! # Overview
//!
//! ```text
//! TrialCollection
//! └─ records: Vec<TrialRecord>
//!     ├─ algorithm, function id, dimension, instance
//!     ├─ max_evals (effort spent, reached target or not)
//!     └─ observations: Vec<Observation>
//!         ├─ evals
//!         └─ fvalue (best precision so far)
//! ```
//!
//! - [`record`]: Per-trial records and run-length queries
//! - [`collection`]: Collections of records and their groupings by dimension,
//!   function, testbed, function group and algorithm
//! - [`target`]: Scalar or per-function target precisions
//! - [`function`]: Testbed and function-group classification
//!
//! # Examples
//!
//! ```
//! use rld_data::{
//!     collection::TrialCollection,
//!     record::{Observation, TrialRecord},
//!     target::Target,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let record = TrialRecord::new(
//!     "my-optimizer",
//!     1,
//!     5,
//!     1,
//!     1000,
//!     vec![Observation::new(1, 80.0), Observation::new(250, 1e-9)],
//! )?;
//! let collection = TrialCollection::new(vec![record]);
//!
//! let target = Target::Scalar(1e-8);
//! for record in &collection {
//!     let precision = target.resolve(record.function_id())?;
//!     assert_eq!(record.run_length(precision), Some(250));
//! }
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod function;
pub mod record;
pub mod target;

pub use self::{
    collection::{DimensionMismatchError, TrialCollection},
    function::{Dimension, FunctionGroup, FunctionId, NoiseClass},
    record::{Observation, RecordError, TrialRecord},
    target::{Target, TargetLookupError},
};
