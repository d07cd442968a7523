//! Best-known performance backdrop
//!
//! A reference snapshot records, for a set of reference algorithms, the run
//! lengths they needed on each function and dimension. Figures draw the ECDF
//! of those run lengths behind the analyzed algorithms.
//!
//! The snapshot is an optional artifact. [`ReferenceOverlay`] loads it on
//! first use, exactly once, and falls back to [`ReferenceState::Unavailable`]
//! when it cannot be read; every later request then yields no overlay.
//!
//! # Snapshot format
//!
//! ```json
//! { "<algorithm>": { "<function id>": { "<dimension>": [[target, r1, r2, ...], ...] } } }
//! ```
//!
//! Only the first row of each entry is used. Its first element is the target
//! and the rest are run lengths in evaluations, `null` marking an unsolved run.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use rld_data::{Dimension, FunctionId};
use rld_stats::ecdf::{Ecdf, StepCurve};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the location of the global snapshot.
pub const SNAPSHOT_PATH_ENV: &str = "RLD_REFERENCE_SNAPSHOT";

/// Location of the global snapshot when [`SNAPSHOT_PATH_ENV`] is not set.
pub const DEFAULT_SNAPSHOT_PATH: &str = "reference/best2009.json";

type RunLengthRows = Vec<Vec<Option<f64>>>;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReferenceLoadError {
    #[display("failed to open reference snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[display("failed to parse reference snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Recorded run lengths of reference algorithms.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceSnapshot {
    algorithms: BTreeMap<String, BTreeMap<FunctionId, BTreeMap<Dimension, RunLengthRows>>>,
}

impl ReferenceSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ReferenceLoadError> {
        let file = File::open(path).map_err(|source| ReferenceLoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ReferenceLoadError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Appends a run-length row for `algorithm` on `function_id` in `dimension`.
    ///
    /// The row starts with the target, followed by the run lengths. Only the
    /// first row of each entry takes part in the overlay.
    pub fn insert(
        &mut self,
        algorithm: impl Into<String>,
        function_id: FunctionId,
        dimension: Dimension,
        row: Vec<Option<f64>>,
    ) {
        self.algorithms
            .entry(algorithm.into())
            .or_default()
            .entry(function_id)
            .or_default()
            .entry(dimension)
            .or_default()
            .push(row);
    }

    /// Returns the names of the reference algorithms.
    #[must_use = "iterators are lazy"]
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }

    /// Collects the run lengths of one algorithm over `functions` in `dimension`.
    ///
    /// Returns `None` unless the algorithm has data for every requested function.
    #[must_use]
    pub fn algorithm_sample(
        &self,
        algorithm: &str,
        dimension: Dimension,
        functions: &BTreeSet<FunctionId>,
    ) -> Option<OverlaySample> {
        let per_function = self.algorithms.get(algorithm)?;
        let rows = functions
            .iter()
            .map(|id| per_function.get(id)?.get(&dimension)?.first())
            .collect::<Option<Vec<_>>>()?;

        let mut overlay = OverlaySample::default();
        for row in rows {
            let run_lengths = row.get(1..).unwrap_or_default();
            overlay.n += run_lengths.len();
            overlay.sample.extend(
                run_lengths
                    .iter()
                    .flatten()
                    .filter(|v| v.is_finite())
                    .map(|v| v / f64::from(dimension)),
            );
        }
        Some(overlay)
    }

    /// Collects one sample per reference algorithm covering all of `functions`.
    #[must_use]
    pub fn samples_by_algorithm(
        &self,
        dimension: Dimension,
        functions: &BTreeSet<FunctionId>,
    ) -> BTreeMap<&str, OverlaySample> {
        if functions.is_empty() {
            return BTreeMap::new();
        }
        self.algorithms()
            .filter_map(|alg| Some((alg, self.algorithm_sample(alg, dimension, functions)?)))
            .collect()
    }

    /// Concatenates the samples of every reference algorithm covering all of `functions`.
    ///
    /// Returns `None` when no algorithm qualifies.
    #[must_use]
    pub fn overlay_sample(
        &self,
        dimension: Dimension,
        functions: &BTreeSet<FunctionId>,
    ) -> Option<OverlaySample> {
        self.samples_by_algorithm(dimension, functions)
            .into_values()
            .reduce(|mut acc, sample| {
                acc.sample.extend(sample.sample);
                acc.n += sample.n;
                acc
            })
    }
}

/// Dimension-normalized reference run lengths.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OverlaySample {
    /// Solved run lengths divided by dimension.
    pub sample: Vec<f64>,
    /// Number of recorded runs, solved or not.
    pub n: usize,
}

impl OverlaySample {
    #[must_use]
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::new(&self.sample, Some(self.n))
    }
}

/// Outcome of loading the reference snapshot, cached after the first attempt.
#[derive(Debug)]
pub enum ReferenceState {
    Available(ReferenceSnapshot),
    Unavailable,
}

/// Lazily loaded reference snapshot.
///
/// The snapshot is read on the first call to [`ReferenceOverlay::state`] or any
/// accessor built on it. Concurrent first calls still read the file once.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
///
/// use rld_analysis::reference::{ReferenceOverlay, ReferenceSnapshot};
///
/// let mut snapshot = ReferenceSnapshot::default();
/// snapshot.insert("best", 1, 2, vec![Some(1e-8), Some(20.0), None, Some(40.0)]);
/// let overlay = ReferenceOverlay::from_snapshot(snapshot);
///
/// let sample = overlay.overlay_sample(2, &BTreeSet::from([1])).unwrap();
/// assert_eq!(sample.sample, vec![10.0, 20.0]);
/// assert_eq!(sample.n, 3);
///
/// assert!(ReferenceOverlay::unavailable().overlay_sample(2, &BTreeSet::from([1])).is_none());
/// ```
#[derive(Debug)]
pub struct ReferenceOverlay {
    path: Option<PathBuf>,
    state: OnceLock<ReferenceState>,
}

impl ReferenceOverlay {
    /// Creates an overlay reading `path` on first use. No I/O happens here.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            state: OnceLock::new(),
        }
    }

    /// Creates an overlay backed by an in-memory snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: ReferenceSnapshot) -> Self {
        Self {
            path: None,
            state: OnceLock::from(ReferenceState::Available(snapshot)),
        }
    }

    /// Creates an overlay that never yields anything.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            path: None,
            state: OnceLock::from(ReferenceState::Unavailable),
        }
    }

    /// Returns the process-wide overlay.
    ///
    /// It reads `$RLD_REFERENCE_SNAPSHOT`, or `reference/best2009.json` when
    /// the variable is not set.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ReferenceOverlay> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let path = std::env::var_os(SNAPSHOT_PATH_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH), PathBuf::from);
            Self::new(path)
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the loaded state, loading the snapshot on first call.
    ///
    /// A load failure is logged once and cached as [`ReferenceState::Unavailable`].
    #[must_use]
    pub fn state(&self) -> &ReferenceState {
        self.state.get_or_init(|| {
            let Some(path) = &self.path else {
                return ReferenceState::Unavailable;
            };
            match ReferenceSnapshot::load(path) {
                Ok(snapshot) => {
                    tracing::debug!(
                        path = %path.display(),
                        algorithms = snapshot.algorithms.len(),
                        "reference snapshot loaded"
                    );
                    ReferenceState::Available(snapshot)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "reference overlay disabled");
                    ReferenceState::Unavailable
                }
            }
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&ReferenceSnapshot> {
        match self.state() {
            ReferenceState::Available(snapshot) => Some(snapshot),
            ReferenceState::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Combined reference sample over `functions` in `dimension`, if any.
    #[must_use]
    pub fn overlay_sample(
        &self,
        dimension: Dimension,
        functions: &BTreeSet<FunctionId>,
    ) -> Option<OverlaySample> {
        self.snapshot()?.overlay_sample(dimension, functions)
    }

    /// One ECDF curve per qualifying reference algorithm, keyed by algorithm name.
    #[must_use]
    pub fn overlay_curves(
        &self,
        dimension: Dimension,
        functions: &BTreeSet<FunctionId>,
    ) -> BTreeMap<String, StepCurve> {
        let Some(snapshot) = self.snapshot() else {
            return BTreeMap::new();
        };
        snapshot
            .samples_by_algorithm(dimension, functions)
            .into_iter()
            .map(|(alg, sample)| (alg.to_owned(), sample.ecdf().curve()))
            .collect()
    }
}
