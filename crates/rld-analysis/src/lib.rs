//! ECDF aggregation of optimizer trials
//!
//! This crate turns trial records into empirical cumulative distribution
//! functions that compare algorithms across target precisions, dimensions and
//! functions, and assembles them into figure data for a renderer.
//!
//! # Overview
//!
//! ```text
//! TrialCollection ──> distribution::* ──> Ecdf ──> StepCurve
//!                                                     │
//!            reference::ReferenceOverlay ────────┐    │
//!                                                v    v
//!                          context::FigureContext ──> figure::EcdfFigure
//!                                                     (axis::extend_to_shared_limits)
//! ```
//!
//! - [`distribution`]: Run-length, estimated run-time and function-value
//!   distributions over a single-dimension collection
//! - [`axis`]: Extension of step curves to shared limits, log-scale ticks
//! - [`reference`]: Lazily loaded best-known performance backdrop
//! - [`context`]: Axis-alignment memos shared by the figures of one pass
//! - [`figure`]: Figure assembly for one algorithm or a pair of algorithms
//! - [`settings`]: Targets, dimensions and estimator parameters of a run
//!
//! # Censored data
//!
//! A trial that never reaches a target adds nothing to the sample but still
//! counts in the denominator. The last step of every curve is therefore the
//! fraction of trials that reached the target, not 1.
//!
//! # Examples
//!
//! ```
//! use rld_analysis::{axis::{AxisLimits, extend_to_shared_limits}, distribution};
//! use rld_data::{Observation, Target, TrialCollection, TrialRecord};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let collection = [(50, 1e-9), (500, 1e-2)]
//!     .into_iter()
//!     .map(|(evals, fvalue)| {
//!         TrialRecord::new("alg", 1, 5, 1, 1000, vec![Observation::new(evals, fvalue)])
//!     })
//!     .collect::<Result<TrialCollection, _>>()?;
//!
//! let dist = distribution::run_length_distribution(&collection, &Target::Scalar(1e-8))?;
//! let curve = dist.ecdf().curve();
//! assert_eq!(curve.final_fraction(), Some(0.5));
//!
//! let extended = extend_to_shared_limits(&curve, AxisLimits::new(1.0, 200.0), 1);
//! assert_eq!(extended.max_x(), Some(200.0));
//! # Ok(())
//! # }
//! ```

pub mod axis;
pub mod context;
pub mod distribution;
pub mod figure;
pub mod reference;
pub mod settings;
