//! Statistical building blocks for run-length distribution analysis.
//!
//! This crate provides the leaf-level tools the aggregation layer is built on:
//!
//! - **ECDF construction**: Turn an unsorted sample and a denominator into a
//!   monotone step curve
//! - **Percentiles**: Nearest-rank percentile of sorted data
//! - **Bootstrap estimation**: Resample run times from successful and censored
//!   run lengths with a seeded, reproducible estimator
//!
//! # Modules
//!
//! - [`ecdf`]: Empirical cumulative distribution functions and step curves
//! - [`percentiles`]: Percentile computation
//! - [`bootstrap`]: Run-time estimator contract and its restart-simulation implementation
//!
//! # Examples
//!
//! ## Building an ECDF with unsolved trials
//!
//! ```
//! use rld_stats::ecdf::build_ecdf;
//!
//! // 2 trials solved out of 4
//! let curve = build_ecdf(&[120.0, 40.0], Some(4));
//! assert_eq!(curve.final_fraction(), Some(0.5));
//! ```
//!
//! ## Drawing bootstrap run times
//!
//! ```
//! use rld_stats::bootstrap::{RunTimeEstimator, SimulatedRestarts};
//!
//! let mut estimator = SimulatedRestarts::new(0);
//! let resample = estimator.draw_samples(&[150.0, 300.0], &[1000.0], 0.5, 100);
//! assert_eq!(resample.values.len(), 100);
//! ```

pub mod bootstrap;
pub mod ecdf;
pub mod percentiles;
