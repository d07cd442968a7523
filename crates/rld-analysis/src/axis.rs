//! Shared axis limits and curve extension
//!
//! Curves of one figure come from different samples and stop at different x.
//! To compare them on a common logarithmic axis, every curve is extended to the
//! figure's right limit with its final y value. Line curves get one extra
//! point; marker curves get one marker per log-uniform position so the marker
//! spacing stays even all the way to the edge.

use rld_stats::ecdf::{DrawStyle, StepCurve, decade_position};
use serde::{Deserialize, Serialize};

/// Y range of ECDF figures, slightly wider than `[0, 1]` so the extreme steps stay visible.
pub const ECDF_Y_LIMITS: AxisLimits = AxisLimits {
    min: -0.01,
    max: 1.01,
};

/// Left margin factor applied by [`AxisLimits::padded`].
const LEFT_MARGIN: f64 = 0.9;

/// Closed range of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl AxisLimits {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Moves the left limit to `0.9 * min` so the first step is not glued to the frame.
    #[must_use]
    pub fn padded(self) -> Self {
        Self {
            min: self.min * LEFT_MARGIN,
            max: self.max,
        }
    }
}

/// A labelled tick on an axis. An empty label draws the tick mark only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    fn new(position: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}

/// Extends `curve` to the right limit of `limits`, keeping its last y value.
///
/// - [`DrawStyle::Line`] curves get a single point `(limits.max, last y)`.
/// - [`DrawStyle::Markers`] curves get a point at every `10^(k / nb_per_decade)`
///   strictly after the last x and not beyond `limits.max`.
///
/// The left edge is never touched, empty curves stay empty and curves already
/// reaching `limits.max` are returned unchanged, so applying this twice gives
/// the same curve as applying it once.
///
/// # Examples
///
/// ```
/// use rld_analysis::axis::{AxisLimits, extend_to_shared_limits};
/// use rld_stats::ecdf::build_ecdf;
///
/// let curve = build_ecdf(&[2.0, 5.0], Some(4));
/// let extended = extend_to_shared_limits(&curve, AxisLimits::new(1.0, 100.0), 1);
/// assert_eq!(extended.x, vec![2.0, 5.0, 5.0, 100.0]);
/// assert_eq!(extended.y, vec![0.0, 0.25, 0.5, 0.5]);
/// ```
#[must_use]
pub fn extend_to_shared_limits(
    curve: &StepCurve,
    limits: AxisLimits,
    nb_per_decade: u32,
) -> StepCurve {
    let mut extended = curve.clone();
    let (Some(last_x), Some(last_y)) = (curve.max_x(), curve.final_fraction()) else {
        return extended;
    };
    let x_max = limits.max;
    if !x_max.is_finite() || x_max <= last_x {
        return extended;
    }

    match curve.style {
        DrawStyle::Line => extended.push(x_max, last_y),
        DrawStyle::Markers => {
            for x in log_positions_after(last_x, x_max, nb_per_decade) {
                extended.push(x, last_y);
            }
        }
    }
    extended
}

/// Returns the positions `10^(k / nb_per_decade)` in `(after, up_to]`.
#[expect(clippy::cast_possible_truncation)]
fn log_positions_after(after: f64, up_to: f64, nb_per_decade: u32) -> Vec<f64> {
    if nb_per_decade == 0 || after <= 0.0 || !after.is_finite() {
        return vec![];
    }
    let nb = f64::from(nb_per_decade);
    let min_idx = (after.log10() * nb).ceil() as i64;
    let max_idx = (up_to.log10() * nb).floor() as i64;
    (min_idx..=max_idx)
        .map(|k| decade_position(k, nb_per_decade))
        .filter(|&x| x > after && x <= up_to)
        .collect()
}

/// Derives the decade ticks of a logarithmic axis.
///
/// Ticks sit on every power of ten within the limits and are labelled with
/// their exponent (`"-1"`, `"0"`, `"1"`, ...). Limits that are not positive
/// give no ticks.
///
/// # Examples
///
/// ```
/// use rld_analysis::axis::{AxisLimits, log_ticks};
///
/// let ticks = log_ticks(AxisLimits::new(0.9, 2e3));
/// let labels = ticks.iter().map(|t| t.label.as_str()).collect::<Vec<_>>();
/// assert_eq!(labels, vec!["0", "1", "2", "3"]);
/// ```
#[expect(clippy::cast_possible_truncation)]
#[must_use]
pub fn log_ticks(limits: AxisLimits) -> Vec<Tick> {
    let AxisLimits { min, max } = limits;
    if min <= 0.0 || !min.is_finite() || !max.is_finite() || max < min {
        return vec![];
    }
    let first = min.log10().ceil() as i64;
    let last = max.log10().floor() as i64;
    (first..=last)
        .map(|exponent| Tick::new(decade_position(exponent, 1), exponent.to_string()))
        .collect()
}

/// Returns the fixed y ticks of ECDF figures: quarters, with every other one labelled.
#[must_use]
pub fn ecdf_y_ticks() -> Vec<Tick> {
    vec![
        Tick::new(0.0, "0.0"),
        Tick::new(0.25, ""),
        Tick::new(0.5, "0.5"),
        Tick::new(0.75, ""),
        Tick::new(1.0, "1.0"),
    ]
}
