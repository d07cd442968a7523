use serde::{Deserialize, Serialize};

/// How a step curve is meant to be drawn.
///
/// Both styles use "steps" semantics: the y value holds constant until the next x.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStyle {
    /// A connected step line.
    #[default]
    Line,
    /// Isolated markers without a connecting line.
    Markers,
}

/// An ordered sequence of `(x, y)` points, non-decreasing in both coordinates.
///
/// The curve stores parallel vectors of the same length. For curves produced by
/// [`Ecdf::curve`], `y` lies in `[0, 1]` and the last point repeats the largest
/// x so the final step is flat.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCurve {
    /// Drawing style of the curve.
    pub style: DrawStyle,
    /// X coordinates, non-decreasing.
    pub x: Vec<f64>,
    /// Y coordinates, non-decreasing.
    pub y: Vec<f64>,
}

impl StepCurve {
    /// Returns a curve without any point.
    #[must_use]
    pub fn empty(style: DrawStyle) -> Self {
        Self {
            style,
            x: vec![],
            y: vec![],
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the curve has no point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the rightmost x, or `None` for an empty curve.
    #[must_use]
    pub fn max_x(&self) -> Option<f64> {
        self.x.last().copied()
    }

    /// Returns the leftmost x, or `None` for an empty curve.
    #[must_use]
    pub fn min_x(&self) -> Option<f64> {
        self.x.first().copied()
    }

    /// Returns the last y value, which for an ECDF is the fraction of the
    /// denominator found in the sample.
    #[must_use]
    pub fn final_fraction(&self) -> Option<f64> {
        self.y.last().copied()
    }

    /// Iterates over the `(x, y)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Appends a point. The caller keeps both coordinates non-decreasing.
    pub fn push(&mut self, x: f64, y: f64) {
        debug_assert!(self.x.last().is_none_or(|&last| last <= x));
        debug_assert!(self.y.last().is_none_or(|&last| last <= y));
        self.x.push(x);
        self.y.push(y);
    }
}

/// Empirical cumulative distribution function of a sample.
///
/// The denominator `n` may exceed the sample size: observations that were
/// dropped (e.g. runs that never reached a target) still count as "not yet
/// below any x", so the ECDF tops out at `|sample| / n`.
///
/// # Examples
///
/// ```
/// use rld_stats::ecdf::Ecdf;
///
/// // 3 successes out of 4 trials
/// let ecdf = Ecdf::new(&[30.0, 10.0, 20.0], Some(4));
/// assert_eq!(ecdf.fraction_at(5.0), 0.0);
/// assert_eq!(ecdf.fraction_at(20.0), 0.5);
/// assert_eq!(ecdf.fraction_at(1e9), 0.75);
///
/// let curve = ecdf.curve();
/// assert_eq!(curve.x, vec![10.0, 20.0, 30.0, 30.0]);
/// assert_eq!(curve.y, vec![0.0, 0.25, 0.5, 0.75]);
/// ```
#[derive(Debug, Clone)]
pub struct Ecdf {
    sorted: Vec<f64>,
    n: usize,
}

impl Ecdf {
    /// Builds an ECDF from an unsorted sample.
    ///
    /// The sample is copied and sorted, the caller's data is left untouched.
    /// When `n` is `None` the sample size is used as denominator.
    #[must_use]
    pub fn new(sample: &[f64], n: Option<usize>) -> Self {
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = n.unwrap_or(sorted.len());
        Self { sorted, n }
    }

    /// Builds an ECDF from values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: Vec<f64>, n: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        Self {
            sorted: sorted_values,
            n,
        }
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> usize {
        self.n
    }

    /// Returns the sorted sample.
    #[must_use]
    pub fn sorted_sample(&self) -> &[f64] {
        &self.sorted
    }

    /// Returns `true` when there is nothing to show (`n == 0` or no sample).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0 || self.sorted.is_empty()
    }

    /// Evaluates `|{s in sample : s <= x}| / n`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction_at(&self, x: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let count = self.sorted.partition_point(|&v| v <= x);
        count as f64 / self.n as f64
    }

    /// Returns the step curve of the ECDF.
    ///
    /// The points are the sorted sample values paired with `i / n`, followed by
    /// the maximum value once more paired with `|sample| / n`. Ties keep one
    /// point each so they show up as vertical steps.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn curve(&self) -> StepCurve {
        if self.is_empty() {
            return StepCurve::empty(DrawStyle::Line);
        }
        let n = self.n as f64;
        let len = self.sorted.len();
        let mut x = Vec::with_capacity(len + 1);
        let mut y = Vec::with_capacity(len + 1);
        for (i, &value) in self.sorted.iter().enumerate() {
            x.push(value);
            y.push(i as f64 / n);
        }
        x.push(self.sorted[len - 1]);
        y.push(len as f64 / n);
        StepCurve {
            style: DrawStyle::Line,
            x,
            y,
        }
    }

    /// Samples the ECDF at log-uniform positions `10^(k / nb_per_decade)`.
    ///
    /// Only positions inside the positive part of the sample range are used, so
    /// the markers are evenly spread on a logarithmic x axis regardless of how
    /// dense the underlying sample is.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn log_uniform_markers(&self, nb_per_decade: u32) -> StepCurve {
        let mut curve = StepCurve::empty(DrawStyle::Markers);
        if self.is_empty() || nb_per_decade == 0 {
            return curve;
        }
        let Some(&first) = self.sorted.iter().find(|&&v| v > 0.0) else {
            return curve;
        };
        let Some(&last) = self.sorted.last() else {
            return curve;
        };
        if !last.is_finite() {
            return curve;
        }
        let nb = f64::from(nb_per_decade);
        let min_idx = (first.log10() * nb).ceil() as i64;
        let max_idx = (last.log10() * nb).floor() as i64;
        for k in min_idx..=max_idx {
            let x = decade_position(k, nb_per_decade);
            curve.push(x, self.fraction_at(x));
        }
        curve
    }
}

/// Returns `10^(k / nb_per_decade)`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn decade_position(k: i64, nb_per_decade: u32) -> f64 {
    10f64.powf(k as f64 / f64::from(nb_per_decade))
}

/// Builds the ECDF step curve of `sample` with denominator `n`.
///
/// Shorthand for `Ecdf::new(sample, n).curve()`. Returns an empty curve when
/// `n == 0` or the sample is empty.
///
/// # Examples
///
/// ```
/// use rld_stats::ecdf::build_ecdf;
///
/// assert!(build_ecdf(&[], Some(10)).is_empty());
/// assert!(build_ecdf(&[1.0, 2.0], Some(0)).is_empty());
///
/// let curve = build_ecdf(&[2.0, 1.0], None);
/// assert_eq!(curve.final_fraction(), Some(1.0));
/// ```
#[must_use]
pub fn build_ecdf(sample: &[f64], n: Option<usize>) -> StepCurve {
    Ecdf::new(sample, n).curve()
}
