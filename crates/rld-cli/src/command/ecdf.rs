use std::path::PathBuf;

use anyhow::Context as _;
use rld_analysis::{
    context::FigureContext,
    figure::{self, EcdfFigure},
    reference::ReferenceOverlay,
    settings::EcdfSettings,
};
use rld_data::{NoiseClass, TrialCollection};
use tracing::{debug, info, warn};

use super::{ReferenceArg, SettingsArg};
use crate::util::{self, FigureReport, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EcdfArg {
    /// Trials JSON file
    pub trials: PathBuf,
    #[clap(flatten)]
    pub settings: SettingsArg,
    #[clap(flatten)]
    pub reference: ReferenceArg,
    /// Only use functions of the noisy testbed
    #[arg(long)]
    pub noisy: bool,
    /// Only use functions of the noise-free testbed
    #[arg(long)]
    pub noise_free: bool,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl EcdfArg {
    /// Testbed to keep, `None` for both. Giving both flags is the same as giving none.
    fn testbed(&self) -> Option<NoiseClass> {
        match (self.noisy, self.noise_free) {
            (true, false) => Some(NoiseClass::Noisy),
            (false, true) => Some(NoiseClass::Noiseless),
            _ => None,
        }
    }
}

pub(crate) fn run(arg: &EcdfArg) -> anyhow::Result<()> {
    let settings = arg.settings.resolve()?;
    let trials = util::read_trials_file(&arg.trials)?;
    let trials = match arg.testbed() {
        Some(noise) => {
            let selected: TrialCollection = trials
                .iter()
                .filter(|r| r.noise_class() == Some(noise))
                .cloned()
                .collect();
            info!(testbed = %noise, records = selected.len(), "testbed selected");
            selected
        }
        None => trials,
    };
    if trials.is_empty() {
        anyhow::bail!("No trial records to process in {}", arg.trials.display());
    }

    let local_reference = arg.reference.overlay();
    let reference = local_reference
        .as_ref()
        .unwrap_or_else(|| ReferenceOverlay::global());
    let mut context = FigureContext::new(&settings, reference);

    let figures = generate_figures(&trials, &settings, &mut context)?;
    info!(figures = figures.len(), "figures built");

    let report = FigureReport {
        settings: &settings,
        reference_available: reference.is_available(),
        figures,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

/// Builds the figures of every requested dimension.
///
/// For each dimension, figures are built for all functions, then for each
/// testbed, then for each function group. The right axis limits are shared
/// within a dimension.
fn generate_figures(
    trials: &TrialCollection,
    settings: &EcdfSettings,
    context: &mut FigureContext<'_>,
) -> anyhow::Result<Vec<EcdfFigure>> {
    let algorithms = trials.by_algorithm();
    if algorithms.len() > 1 {
        warn!(
            algorithms = ?algorithms.keys().collect::<Vec<_>>(),
            "trials mix several algorithms; they are pooled into the same curves"
        );
    }
    if trials.by_noise().len() > 1 {
        warn!("trials mix noisy and noise-free functions");
    }

    let by_dimension = trials.by_dimension();
    let mut figures = vec![];
    for dimension in &settings.dimensions {
        let Some(dim_trials) = by_dimension.get(dimension) else {
            debug!(dimension, "no trials for dimension, skipped");
            continue;
        };
        info!(dimension, records = dim_trials.len(), "building figures");

        let mut build = |collection: &TrialCollection, info: &str| {
            let built = figure::build_figures(collection, settings, context, info)
                .with_context(|| format!("Failed to build {info} figures for {dimension}-D"))?;
            figures.extend(built);
            anyhow::Ok(())
        };
        build(dim_trials, "all")?;
        for (noise, collection) in dim_trials.by_noise() {
            build(&collection, &noise.to_string())?;
        }
        for (group, collection) in dim_trials.by_function_group() {
            build(&collection, &group.to_string())?;
        }
        context.reset();
    }
    Ok(figures)
}

#[cfg(test)]
mod tests {
    use rld_analysis::figure::FigureKind;
    use rld_data::{Observation, TrialRecord};

    use super::*;

    fn record(function_id: u32, dimension: u32, max_evals: u64) -> TrialRecord {
        TrialRecord::new(
            "alg",
            function_id,
            dimension,
            1,
            max_evals,
            vec![Observation::new(1, 10.0), Observation::new(max_evals / 2, 1e-9)],
        )
        .unwrap()
    }

    fn names(figures: &[EcdfFigure]) -> Vec<&str> {
        figures.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_figures_per_dimension_testbed_and_group() {
        let trials = TrialCollection::new(vec![record(1, 5, 500), record(7, 5, 500)]);
        let settings = EcdfSettings {
            dimensions: vec![5, 20],
            ..EcdfSettings::default()
        };
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);
        let figures = generate_figures(&trials, &settings, &mut context).unwrap();
        assert_eq!(
            names(&figures),
            vec![
                "pprldistr_05D_all",
                "ppfvdistr_05D_all",
                "pprldistr_05D_noiselessall",
                "ppfvdistr_05D_noiselessall",
                "pprldistr_05D_separ",
                "ppfvdistr_05D_separ",
                "pprldistr_05D_lcond",
                "ppfvdistr_05D_lcond",
            ]
        );
        assert!(figures.iter().all(|f| f.dimension == 5));
    }

    #[test]
    fn test_axis_limits_shared_within_dimension_only() {
        let trials = TrialCollection::new(vec![
            record(1, 2, 2000),
            record(7, 2, 20),
            record(1, 3, 30),
        ]);
        let settings = EcdfSettings {
            dimensions: vec![2, 3],
            ..EcdfSettings::default()
        };
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);
        let figures = generate_figures(&trials, &settings, &mut context).unwrap();

        let rld_max = |name: &str| {
            figures
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.x_limits.max)
                .unwrap()
        };
        assert_eq!(rld_max("pprldistr_02D_all"), rld_max("pprldistr_02D_lcond"));
        assert!(rld_max("pprldistr_03D_all") < rld_max("pprldistr_02D_all"));
    }

    #[test]
    fn test_run_time_figures_included() {
        let trials = TrialCollection::new(vec![record(101, 2, 100)]);
        let settings = EcdfSettings {
            dimensions: vec![2],
            run_time_figures: true,
            bootstrap_sample_size: 20,
            ..EcdfSettings::default()
        };
        let reference = ReferenceOverlay::unavailable();
        let mut context = FigureContext::new(&settings, &reference);
        let figures = generate_figures(&trials, &settings, &mut context).unwrap();
        let run_time: Vec<_> = figures
            .iter()
            .filter(|f| f.kind == FigureKind::RunTime)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            run_time,
            vec![
                "ppertdistr_02D_all",
                "ppertdistr_02D_nzall",
                "ppertdistr_02D_nzmod"
            ]
        );
    }

    #[test]
    fn test_testbed_flags() {
        let arg = |noisy, noise_free| EcdfArg {
            noisy,
            noise_free,
            ..EcdfArg::default()
        };
        assert_eq!(arg(false, false).testbed(), None);
        assert_eq!(arg(true, false).testbed(), Some(NoiseClass::Noisy));
        assert_eq!(arg(false, true).testbed(), Some(NoiseClass::Noiseless));
        assert_eq!(arg(true, true).testbed(), None);
    }
}
