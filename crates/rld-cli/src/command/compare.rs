use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use rld_analysis::{
    context::FigureContext,
    figure::{self, EcdfFigure},
    reference::ReferenceOverlay,
    settings::EcdfSettings,
};
use rld_data::TrialCollection;
use tracing::{debug, info};

use super::{ReferenceArg, SettingsArg};
use crate::util::{self, FigureReport, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// Trials JSON file of the first algorithm
    pub first: PathBuf,
    /// Trials JSON file of the second algorithm
    pub second: PathBuf,
    #[clap(flatten)]
    pub settings: SettingsArg,
    #[clap(flatten)]
    pub reference: ReferenceArg,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let settings = arg.settings.resolve()?;
    let first = util::read_trials_file(&arg.first)?;
    let second = util::read_trials_file(&arg.second)?;

    let local_reference = arg.reference.overlay();
    let reference = local_reference
        .as_ref()
        .unwrap_or_else(|| ReferenceOverlay::global());
    let mut context = FigureContext::new(&settings, reference);

    let figures = generate_figures(&first, &second, &settings, &mut context)?;
    if figures.is_empty() {
        anyhow::bail!("The two trial files share no dimension, testbed or function group");
    }
    info!(figures = figures.len(), "comparison figures built");

    let report = FigureReport {
        settings: &settings,
        reference_available: reference.is_available(),
        figures,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

/// Pairs up the groups present in both collections.
fn paired<K: Ord>(
    first: BTreeMap<K, TrialCollection>,
    mut second: BTreeMap<K, TrialCollection>,
) -> Vec<(K, TrialCollection, TrialCollection)> {
    first
        .into_iter()
        .filter_map(|(key, a)| second.remove(&key).map(|b| (key, a, b)))
        .collect()
}

/// Builds the comparison figures of every requested dimension, over all
/// functions, then each testbed, then each function group.
fn generate_figures(
    first: &TrialCollection,
    second: &TrialCollection,
    settings: &EcdfSettings,
    context: &mut FigureContext<'_>,
) -> anyhow::Result<Vec<EcdfFigure>> {
    let mut first_dims = first.by_dimension();
    let mut second_dims = second.by_dimension();
    let mut figures = vec![];
    for dimension in &settings.dimensions {
        let (Some(a), Some(b)) = (first_dims.remove(dimension), second_dims.remove(dimension))
        else {
            debug!(dimension, "dimension missing from one of the trial files, skipped");
            continue;
        };
        info!(dimension, first = a.len(), second = b.len(), "comparing");

        let mut build = |a: &TrialCollection, b: &TrialCollection, info: &str| {
            let built = figure::build_comparison_figure(a, b, settings, context, info)
                .with_context(|| {
                    format!("Failed to build {info} comparison figure for {dimension}-D")
                })?;
            figures.extend(built);
            anyhow::Ok(())
        };
        build(&a, &b, "all")?;
        for (noise, a, b) in paired(a.by_noise(), b.by_noise()) {
            build(&a, &b, &noise.to_string())?;
        }
        for (group, a, b) in paired(a.by_function_group(), b.by_function_group()) {
            build(&a, &b, &group.to_string())?;
        }
        context.reset();
    }
    Ok(figures)
}
