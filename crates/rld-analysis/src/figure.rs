//! Figure data for ECDF plots
//!
//! The builders here run the aggregators for every configured target and
//! package the resulting step curves together with everything a renderer
//! needs: axis limits, ticks, labels, the function caption and the budget
//! markers. Every curve of a figure is extended to the figure's right limit so
//! the curves compare on a shared logarithmic axis.
//!
//! Single-algorithm passes produce, per dimension:
//!
//! - a run-length figure (`pprldistr_*`): one curve per target, the reference
//!   backdrop and a vertical line at the evaluation budget,
//! - a function-value figure (`ppfvdistr_*`): one curve per target at the full
//!   budget, then one curve per smaller decade of the budget for the last target,
//! - optionally a bootstrap run-time figure (`ppertdistr_*`).
//!
//! Two-algorithm passes produce one run-length figure per dimension with the
//! curves of both algorithms.

use std::collections::BTreeSet;

use rld_data::{Dimension, FunctionId, Target, TrialCollection, TrialRecord, function};
use rld_stats::{
    bootstrap::SimulatedRestarts,
    ecdf::{Ecdf, StepCurve, decade_position},
};
use serde::Serialize;

use crate::{
    axis::{self, AxisLimits, ECDF_Y_LIMITS, Tick},
    context::FigureContext,
    distribution::{self, AggregateError},
    reference::ReferenceOverlay,
    settings::EcdfSettings,
};

const RUN_LENGTH_X_LABEL: &str = "log10 of FEvals / DIM";
const FINAL_VALUE_X_LABEL: &str = "log10 of Df / Dftarget";
const RUN_TIME_X_LABEL: &str = "log10 of FEvals";
const Y_LABEL: &str = "proportion of trials";

/// Run-length figures extend to `evals_max ^ 1.05`.
const EVALS_MAX_EXPONENT: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    RunLength,
    FinalValue,
    RunTime,
    Comparison,
}

/// What a curve of a figure represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveRole {
    /// Distribution for one of the configured targets.
    Target,
    /// Function values at a budget smaller than the full one.
    Budget,
    /// Best-known performance backdrop.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureCurve {
    pub role: CurveRole,
    /// Index of the target (or budget) the curve belongs to, for picking its style.
    pub style_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub curve: StepCurve,
}

impl FigureCurve {
    fn new(role: CurveRole, style_index: usize, curve: StepCurve) -> Self {
        Self {
            role,
            style_index,
            algorithm: None,
            label: None,
            curve,
        }
    }

    fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    fn with_algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = Some(algorithm.to_owned());
        self
    }
}

/// Vertical marker, used for the evaluation budget of an algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerticalLine {
    pub x: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

/// Everything needed to draw one ECDF figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcdfFigure {
    pub kind: FigureKind,
    /// Output name, e.g. `pprldistr_05D_noiselessall`.
    pub name: String,
    pub dimension: Dimension,
    /// Function ids shown, e.g. `f1-5,7`.
    pub caption: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub curves: Vec<FigureCurve>,
    pub vertical_lines: Vec<VerticalLine>,
}

impl EcdfFigure {
    fn new(kind: FigureKind, name: String, dimension: Dimension, x_label: &str) -> Self {
        Self {
            kind,
            name,
            dimension,
            caption: String::new(),
            x_label: x_label.to_owned(),
            y_label: Y_LABEL.to_owned(),
            x_limits: AxisLimits::new(1.0, 1.0),
            y_limits: ECDF_Y_LIMITS,
            x_ticks: vec![],
            y_ticks: axis::ecdf_y_ticks(),
            curves: vec![],
            vertical_lines: vec![],
        }
    }

    /// Returns the largest x over all curves.
    #[must_use]
    pub fn curves_max_x(&self) -> Option<f64> {
        self.curves
            .iter()
            .filter_map(|c| c.curve.max_x())
            .max_by(f64::total_cmp)
    }

    /// Extends the curves to the right limit and derives the x axis.
    fn finish(mut self, x_limits: AxisLimits, nb_per_decade: u32) -> Self {
        for figure_curve in &mut self.curves {
            figure_curve.curve =
                axis::extend_to_shared_limits(&figure_curve.curve, x_limits, nb_per_decade);
        }
        self.x_limits = x_limits.padded();
        self.x_ticks = axis::log_ticks(self.x_limits);
        tracing::debug!(
            name = %self.name,
            curves = self.curves.len(),
            x_max = self.x_limits.max,
            "figure assembled"
        );
        self
    }
}

/// Line and log-uniform markers of an ECDF.
fn ecdf_curves(
    ecdf: &Ecdf,
    nb_per_decade: u32,
    role: CurveRole,
    style_index: usize,
) -> [FigureCurve; 2] {
    [
        FigureCurve::new(role, style_index, ecdf.curve()),
        FigureCurve::new(role, style_index, ecdf.log_uniform_markers(nb_per_decade)),
    ]
}

fn reference_curves(
    reference: &ReferenceOverlay,
    dimension: Dimension,
    functions: &BTreeSet<FunctionId>,
) -> impl Iterator<Item = FigureCurve> {
    reference
        .overlay_curves(dimension, functions)
        .into_iter()
        .map(|(algorithm, curve)| {
            FigureCurve::new(CurveRole::Reference, 0, curve).with_algorithm(&algorithm)
        })
}

fn function_caption(functions: &BTreeSet<FunctionId>) -> String {
    format!("f{}", function::format_function_ranges(functions.iter().copied()))
}

fn algorithm_names(collection: &TrialCollection) -> String {
    collection
        .iter()
        .map(TrialRecord::algorithm)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join("+")
}

/// Legend entry of a scalar target: its decimal exponent, e.g. `"-8"`.
#[expect(clippy::cast_possible_truncation)]
fn target_label(target: &Target) -> Option<String> {
    let value = target.as_scalar().filter(|v| *v > 0.0)?;
    Some(format!("{:+}", value.log10().round() as i64))
}

/// Budgets `10^k` for `k` in `0..floor(log10(evals_max))`.
#[expect(clippy::cast_possible_truncation)]
fn reduced_budgets(evals_max: f64) -> Vec<f64> {
    if !evals_max.is_finite() || evals_max < 1.0 {
        return vec![];
    }
    let decades = evals_max.log10().floor() as i64;
    (0..decades).map(|k| decade_position(k, 1)).collect()
}

/// Builds the figures of one single-dimension collection.
///
/// Returns the run-length and function-value figures, followed by the
/// run-time figure when [`EcdfSettings::run_time_figures`] is set. An empty
/// collection gives no figure. `info` suffixes the figure names.
///
/// # Errors
///
/// - [`AggregateError::DimensionMismatch`] if the collection spans several dimensions
/// - [`AggregateError::TargetLookup`] if a per-function target misses a function of the collection
///
/// # Examples
///
/// ```
/// use rld_analysis::{
///     context::FigureContext, figure::{FigureKind, build_figures},
///     reference::ReferenceOverlay, settings::EcdfSettings,
/// };
/// use rld_data::{Observation, TrialCollection, TrialRecord};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
/// let collection = [1, 2, 3]
///     .into_iter()
///     .map(|function_id| {
///         TrialRecord::new("alg", function_id, 5, 1, 5000, vec![Observation::new(100, 1e-9)])
///     })
///     .collect::<Result<TrialCollection, _>>()?;
///
/// let settings = EcdfSettings::default();
/// let reference = ReferenceOverlay::unavailable();
/// let mut context = FigureContext::new(&settings, &reference);
///
/// let figures = build_figures(&collection, &settings, &mut context, "all")?;
/// assert_eq!(figures[0].kind, FigureKind::RunLength);
/// assert_eq!(figures[0].name, "pprldistr_05D_all");
/// assert_eq!(figures[0].caption, "f1-3");
/// assert_eq!(figures[1].kind, FigureKind::FinalValue);
/// # Ok(())
/// # }
/// ```
pub fn build_figures(
    collection: &TrialCollection,
    settings: &EcdfSettings,
    context: &mut FigureContext<'_>,
    info: &str,
) -> Result<Vec<EcdfFigure>, AggregateError> {
    let Some(dimension) = collection.single_dimension()? else {
        return Ok(vec![]);
    };
    let Some(max_evals_factor) = collection.max_evals_per_dimension() else {
        return Ok(vec![]);
    };
    let evals_max = context.align_evals_max(max_evals_factor);

    let mut figures = vec![
        run_length_figure(collection, dimension, settings, context, evals_max, info)?,
        final_value_figure(collection, dimension, settings, context, evals_max, info)?,
    ];
    if settings.run_time_figures {
        figures.extend(build_run_time_figure(collection, settings, context, info)?);
    }
    Ok(figures)
}

fn run_length_figure(
    collection: &TrialCollection,
    dimension: Dimension,
    settings: &EcdfSettings,
    context: &FigureContext<'_>,
    evals_max: f64,
    info: &str,
) -> Result<EcdfFigure, AggregateError> {
    let nb = context.nb_per_decade();
    let functions = collection.function_ids();
    let mut figure = EcdfFigure::new(
        FigureKind::RunLength,
        format!("pprldistr_{dimension:02}D_{info}"),
        dimension,
        RUN_LENGTH_X_LABEL,
    );
    figure.caption = function_caption(&functions);
    figure
        .curves
        .extend(reference_curves(context.reference(), dimension, &functions));

    for (j, target) in settings.targets.iter().enumerate() {
        let dist = distribution::run_length_distribution(collection, target)?;
        let [line, markers] = ecdf_curves(&dist.ecdf(), nb, CurveRole::Target, j);
        figure.curves.push(line.with_label(Some(dist.label())));
        figure.curves.push(markers);
    }
    figure.vertical_lines.extend(
        collection
            .max_evals_per_dimension()
            .map(|x| VerticalLine { x, algorithm: None }),
    );

    Ok(figure.finish(
        AxisLimits::new(1.0, evals_max.powf(EVALS_MAX_EXPONENT)),
        nb,
    ))
}

fn final_value_figure(
    collection: &TrialCollection,
    dimension: Dimension,
    settings: &EcdfSettings,
    context: &mut FigureContext<'_>,
    evals_max: f64,
    info: &str,
) -> Result<EcdfFigure, AggregateError> {
    let nb = context.nb_per_decade();
    let mut figure = EcdfFigure::new(
        FigureKind::FinalValue,
        format!("ppfvdistr_{dimension:02}D_{info}"),
        dimension,
        FINAL_VALUE_X_LABEL,
    );
    figure.caption = function_caption(&collection.function_ids());

    for (j, target) in settings.targets.iter().enumerate() {
        let dist = distribution::final_value_distribution(collection, target, evals_max)?;
        let [line, markers] = ecdf_curves(&dist.ecdf(), nb, CurveRole::Target, j);
        figure.curves.push(line.with_label(target_label(target)));
        figure.curves.push(markers);
    }
    if let Some(last) = settings.targets.last() {
        for (k, budget) in reduced_budgets(evals_max).into_iter().enumerate() {
            let dist = distribution::final_value_distribution(collection, last, budget)?;
            let [line, markers] = ecdf_curves(&dist.ecdf(), nb, CurveRole::Budget, k);
            figure.curves.push(line);
            figure.curves.push(markers);
        }
    }

    let fvalue_max = context.align_fvalue_max(figure.curves_max_x().map_or(1.0, |x| x.max(1.0)));
    Ok(figure.finish(AxisLimits::new(1.0, fvalue_max), nb))
}

/// Builds the bootstrap run-time figure of a single-dimension collection.
///
/// The estimator is seeded from [`EcdfSettings::seed`] for every figure, so
/// the same input always gives the same figure. Returns `None` for an empty
/// collection.
///
/// # Errors
///
/// Same as [`build_figures`].
#[expect(clippy::cast_precision_loss)]
pub fn build_run_time_figure(
    collection: &TrialCollection,
    settings: &EcdfSettings,
    context: &FigureContext<'_>,
    info: &str,
) -> Result<Option<EcdfFigure>, AggregateError> {
    let Some(dimension) = collection.single_dimension()? else {
        return Ok(None);
    };
    let nb = context.nb_per_decade();
    let mut figure = EcdfFigure::new(
        FigureKind::RunTime,
        format!("ppertdistr_{dimension:02}D_{info}"),
        dimension,
        RUN_TIME_X_LABEL,
    );
    figure.caption = function_caption(&collection.function_ids());

    let mut estimator = SimulatedRestarts::new(settings.seed);
    for (j, target) in settings.targets.iter().enumerate() {
        let dist = distribution::run_time_distribution(
            collection,
            target,
            &mut estimator,
            settings.bootstrap_sample_size,
            settings.bootstrap_percentile,
        )?;
        let [line, markers] = ecdf_curves(&dist.ecdf(), nb, CurveRole::Target, j);
        figure.curves.push(line.with_label(target_label(target)));
        figure.curves.push(markers);
    }

    let max_evals = collection.iter().map(TrialRecord::max_evals).max().unwrap_or(1) as f64;
    figure.vertical_lines.push(VerticalLine {
        x: max_evals,
        algorithm: None,
    });
    let x_max = figure.curves_max_x().map_or(max_evals, |x| x.max(max_evals));
    Ok(Some(figure.finish(AxisLimits::new(1.0, x_max), nb)))
}

/// Builds the run-length figure comparing two single-dimension collections.
///
/// Curves of `first` come before those of `second` for every target; only the
/// line of `second` carries the target label. Returns `None` when either
/// collection is empty.
///
/// # Errors
///
/// - [`AggregateError::DimensionMismatch`] if a collection spans several
///   dimensions or the two collections have different dimensions
/// - [`AggregateError::TargetLookup`] if a per-function target misses a function
pub fn build_comparison_figure(
    first: &TrialCollection,
    second: &TrialCollection,
    settings: &EcdfSettings,
    context: &mut FigureContext<'_>,
    info: &str,
) -> Result<Option<EcdfFigure>, AggregateError> {
    let (Some(dimension), Some(other)) = (first.single_dimension()?, second.single_dimension()?)
    else {
        return Ok(None);
    };
    if dimension != other {
        let mut dimensions = vec![dimension, other];
        dimensions.sort_unstable();
        return Err(rld_data::DimensionMismatchError { dimensions }.into());
    }

    let nb = context.nb_per_decade();
    let first_max = first.max_evals_per_dimension().unwrap_or(1.0);
    let second_max = second.max_evals_per_dimension().unwrap_or(1.0);
    let evals_max = context.align_evals_max(first_max.max(second_max));
    let first_name = algorithm_names(first);
    let second_name = algorithm_names(second);
    let functions = &first.function_ids() | &second.function_ids();

    let mut figure = EcdfFigure::new(
        FigureKind::Comparison,
        format!("pprldistr_{dimension:02}D_{info}"),
        dimension,
        RUN_LENGTH_X_LABEL,
    );
    figure.caption = function_caption(&functions);
    figure
        .curves
        .extend(reference_curves(context.reference(), dimension, &functions));

    for (j, target) in settings.targets.iter().enumerate() {
        for (collection, name, labelled) in [
            (first, &first_name, false),
            (second, &second_name, true),
        ] {
            let dist = distribution::run_length_distribution(collection, target)?;
            let [line, markers] = ecdf_curves(&dist.ecdf(), nb, CurveRole::Target, j);
            let label = if labelled { target_label(target) } else { None };
            figure.curves.push(line.with_algorithm(name).with_label(label));
            figure.curves.push(markers.with_algorithm(name));
        }
    }
    figure.vertical_lines = vec![
        VerticalLine {
            x: first_max,
            algorithm: Some(first_name),
        },
        VerticalLine {
            x: second_max,
            algorithm: Some(second_name),
        },
    ];

    Ok(Some(figure.finish(
        AxisLimits::new(1.0, evals_max.powf(EVALS_MAX_EXPONENT)),
        nb,
    )))
}

#[cfg(test)]
mod tests {
    use rld_data::DimensionMismatchError;
    use rld_stats::ecdf::DrawStyle;

    use super::*;
    use crate::{distribution::test_util::record, reference::ReferenceSnapshot};

    fn collection() -> TrialCollection {
        [
            record(1, 2, 200, &[(1, 50.0), (20, 0.5), (120, 1e-9)]),
            record(2, 2, 200, &[(1, 500.0), (60, 5.0)]),
            record(1, 2, 100, &[(1, 20.0), (40, 1e-3)]),
        ]
        .into_iter()
        .collect()
    }

    fn renamed(collection: &TrialCollection, algorithm: &str) -> TrialCollection {
        collection
            .iter()
            .map(|r| {
                TrialRecord::new(
                    algorithm,
                    r.function_id(),
                    r.dimension(),
                    r.instance(),
                    r.max_evals(),
                    r.observations().to_vec(),
                )
                .unwrap()
            })
            .collect()
    }

    fn build(settings: &EcdfSettings, reference: &ReferenceOverlay) -> Vec<EcdfFigure> {
        let mut context = FigureContext::new(settings, reference);
        build_figures(&collection(), settings, &mut context, "all").unwrap()
    }

    fn assert_lines_reach(figure: &EcdfFigure, x_max: f64) {
        for c in &figure.curves {
            if c.curve.style == DrawStyle::Line && !c.curve.is_empty() {
                assert_eq!(c.curve.max_x(), Some(x_max), "{:?}", c.label);
            }
        }
    }

    #[test]
    fn test_run_length_figure() {
        let settings = EcdfSettings::default();
        let figures = build(&settings, &ReferenceOverlay::unavailable());
        assert_eq!(figures.len(), 2);

        let rld = &figures[0];
        assert_eq!(rld.kind, FigureKind::RunLength);
        assert_eq!(rld.name, "pprldistr_02D_all");
        assert_eq!(rld.caption, "f1-2");
        assert_eq!(rld.curves.len(), 2 * settings.targets.len());
        assert_eq!(
            rld.vertical_lines,
            vec![VerticalLine {
                x: 100.0,
                algorithm: None
            }]
        );

        let x_max = 100f64.powf(1.05);
        assert!((rld.x_limits.min - 0.9).abs() < 1e-12);
        assert_eq!(rld.x_limits.max, x_max);
        assert_lines_reach(rld, x_max);

        let labels = rld
            .curves
            .iter()
            .filter_map(|c| c.label.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["+1:2/2", "-1:1/2", "-4:1/2", "-8:1/2"]);
        assert_eq!(
            rld.x_ticks.iter().map(|t| t.label.as_str()).collect::<Vec<_>>(),
            vec!["0", "1", "2"]
        );
    }

    #[test]
    fn test_final_value_figure() {
        let settings = EcdfSettings::default();
        let figures = build(&settings, &ReferenceOverlay::unavailable());
        let fvd = &figures[1];
        assert_eq!(fvd.kind, FigureKind::FinalValue);
        assert_eq!(fvd.name, "ppfvdistr_02D_all");

        // 4 targets, then budgets 1 and 10 for the last target
        assert_eq!(fvd.curves.len(), 2 * (4 + 2));
        let budgets = fvd
            .curves
            .iter()
            .filter(|c| c.role == CurveRole::Budget)
            .map(|c| c.style_index)
            .collect::<BTreeSet<_>>();
        assert_eq!(budgets, BTreeSet::from([0, 1]));

        // Largest ratio: 500 / 1e-8 at a budget of one evaluation per dimension
        let expected = 500.0 / 1e-8;
        assert!((fvd.x_limits.max - expected).abs() / expected < 1e-12);
        assert_lines_reach(fvd, fvd.x_limits.max);
    }

    #[test]
    fn test_memoized_limits_until_reset() {
        let settings = EcdfSettings::default();
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);

        let small: TrialCollection = [record(1, 2, 20, &[(1, 1.0)])].into_iter().collect();
        let first = build_figures(&collection(), &settings, &mut context, "a").unwrap();
        let second = build_figures(&small, &settings, &mut context, "b").unwrap();
        assert_eq!(first[0].x_limits, second[0].x_limits);
        assert_eq!(first[1].x_limits, second[1].x_limits);
        // The budget marker still reflects the collection itself.
        assert_eq!(second[0].vertical_lines[0].x, 10.0);

        context.reset();
        let third = build_figures(&small, &settings, &mut context, "c").unwrap();
        assert_eq!(third[0].x_limits.max, 10f64.powf(1.05));
    }

    #[test]
    fn test_reference_backdrop() {
        let mut snapshot = ReferenceSnapshot::default();
        snapshot.insert("best", 1, 2, vec![Some(1e-8), Some(10.0), Some(30.0)]);
        snapshot.insert("best", 2, 2, vec![Some(1e-8), None]);
        snapshot.insert("partial", 1, 2, vec![Some(1e-8), Some(4.0)]);
        let reference = ReferenceOverlay::from_snapshot(snapshot);

        let figures = build(&EcdfSettings::default(), &reference);
        let backdrop = figures[0]
            .curves
            .iter()
            .filter(|c| c.role == CurveRole::Reference)
            .collect::<Vec<_>>();
        assert_eq!(backdrop.len(), 1);
        assert_eq!(backdrop[0].algorithm.as_deref(), Some("best"));
        assert_eq!(backdrop[0].curve.x[..3], [5.0, 15.0, 15.0]);
        assert!((backdrop[0].curve.final_fraction().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!(figures[1].curves.iter().all(|c| c.role != CurveRole::Reference));
    }

    #[test]
    fn test_errors_and_empty_input() {
        let settings = EcdfSettings::default();
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);

        let mixed: TrialCollection = [record(1, 2, 20, &[(1, 1.0)]), record(1, 3, 20, &[(1, 1.0)])]
            .into_iter()
            .collect();
        assert_eq!(
            build_figures(&mixed, &settings, &mut context, "x").unwrap_err(),
            AggregateError::DimensionMismatch(DimensionMismatchError {
                dimensions: vec![2, 3]
            })
        );

        let per_function = EcdfSettings {
            targets: vec![Target::per_function([(1, 1e-3)])],
            ..EcdfSettings::default()
        };
        assert!(matches!(
            build_figures(&collection(), &per_function, &mut context, "x"),
            Err(AggregateError::TargetLookup(_))
        ));

        let empty = build_figures(&TrialCollection::default(), &settings, &mut context, "x");
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn test_run_time_figure_is_reproducible() {
        let settings = EcdfSettings {
            run_time_figures: true,
            bootstrap_sample_size: 50,
            ..EcdfSettings::default()
        };
        let reference = ReferenceOverlay::unavailable();
        let a = build(&settings, &reference);
        let b = build(&settings, &reference);
        assert_eq!(a.len(), 3);
        assert_eq!(a[2].kind, FigureKind::RunTime);
        assert_eq!(a[2].name, "ppertdistr_02D_all");
        assert_eq!(a, b);

        // Target 10 is solved by every run: 2 pools * 50 draws out of 100.
        let first = &a[2].curves[0];
        assert_eq!(first.label.as_deref(), Some("+1"));
        assert_eq!(first.curve.final_fraction(), Some(1.0));
        assert_eq!(a[2].vertical_lines[0].x, 200.0);
    }

    #[test]
    fn test_comparison_figure() {
        let settings = EcdfSettings::default();
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);

        let first = renamed(&collection(), "A");
        let second: TrialCollection = [record(3, 2, 1000, &[(1, 1.0), (900, 1e-9)])]
            .into_iter()
            .collect();
        let second = renamed(&second, "B");

        let figure = build_comparison_figure(&first, &second, &settings, &mut context, "cmp")
            .unwrap()
            .unwrap();
        assert_eq!(figure.kind, FigureKind::Comparison);
        assert_eq!(figure.caption, "f1-3");
        assert_eq!(figure.curves.len(), 4 * settings.targets.len());
        assert_eq!(figure.curves[0].algorithm.as_deref(), Some("A"));
        assert_eq!(figure.curves[0].label, None);
        assert_eq!(figure.curves[2].algorithm.as_deref(), Some("B"));
        assert_eq!(figure.curves[2].label.as_deref(), Some("+1"));
        assert_eq!(
            figure
                .vertical_lines
                .iter()
                .map(|l| l.x)
                .collect::<Vec<_>>(),
            vec![100.0, 500.0]
        );
        assert_eq!(figure.x_limits.max, 500f64.powf(1.05));
    }

    #[test]
    fn test_comparison_requires_same_dimension() {
        let settings = EcdfSettings::default();
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);
        let other: TrialCollection = [record(1, 5, 100, &[(1, 1.0)])].into_iter().collect();

        let err = build_comparison_figure(&collection(), &other, &settings, &mut context, "x")
            .unwrap_err();
        assert_eq!(
            err,
            AggregateError::DimensionMismatch(DimensionMismatchError {
                dimensions: vec![2, 5]
            })
        );
        let none = build_comparison_figure(
            &collection(),
            &TrialCollection::default(),
            &settings,
            &mut context,
            "x",
        );
        assert_eq!(none, Ok(None));
    }

    #[test]
    fn test_reduced_budgets() {
        assert_eq!(reduced_budgets(100.0), vec![1.0, 10.0]);
        assert_eq!(reduced_budgets(999.0), vec![1.0, 10.0]);
        assert_eq!(reduced_budgets(1500.0), vec![1.0, 10.0, 100.0]);
        assert!(reduced_budgets(5.0).is_empty());
        assert!(reduced_budgets(0.5).is_empty());
        assert!(reduced_budgets(f64::INFINITY).is_empty());
    }

    #[test]
    fn test_figure_serializes() {
        let figures = build(&EcdfSettings::default(), &ReferenceOverlay::unavailable());
        let json = serde_json::to_value(&figures[0]).unwrap();
        assert_eq!(json["kind"], "run_length");
        assert_eq!(json["curves"][1]["curve"]["style"], "markers");
        assert!(json["curves"][1].get("label").is_none());
    }
}
