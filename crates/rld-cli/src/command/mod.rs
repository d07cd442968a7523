use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rld_analysis::{reference::ReferenceOverlay, settings::EcdfSettings};
use rld_data::Target;
use tracing_subscriber::EnvFilter;

use self::{compare::CompareArg, ecdf::EcdfArg};
use crate::util;

mod compare;
mod ecdf;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build ECDF figure data for the trials of one algorithm
    Ecdf(#[clap(flatten)] EcdfArg),
    /// Build ECDF figure data comparing the trials of two algorithms
    Compare(#[clap(flatten)] CompareArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Ecdf(arg) => ecdf::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
    }
    Ok(())
}

/// Logs to stderr, leaving stdout to the JSON output. `RUST_LOG` takes precedence.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rld_cli={level},rld_analysis={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Figure settings, read from a file and overridden by individual flags.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct SettingsArg {
    /// Path to a settings JSON file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Target precisions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub targets: Option<Vec<f64>>,

    /// Dimensions to build figures for (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub dims: Option<Vec<u32>>,

    /// Markers per decade on ECDF curves
    #[arg(long)]
    pub nb_per_decade: Option<u32>,

    /// Seed of the bootstrap estimator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bootstrap draws per algorithm and function
    #[arg(long)]
    pub bootstrap_samples: Option<usize>,

    /// Let every figure pick its own right axis limit
    #[arg(long)]
    pub no_store_x_max: bool,

    /// Also build bootstrap run-time figures
    #[arg(long)]
    pub run_time: bool,
}

impl SettingsArg {
    pub fn resolve(&self) -> anyhow::Result<EcdfSettings> {
        let mut settings = match &self.settings {
            Some(path) => util::read_json_file::<EcdfSettings, _>("settings", path)?,
            None => EcdfSettings::default(),
        };
        if let Some(targets) = &self.targets {
            settings.targets = targets.iter().copied().map(Target::Scalar).collect();
        }
        if let Some(dims) = &self.dims {
            settings.dimensions.clone_from(dims);
        }
        if let Some(nb) = self.nb_per_decade {
            settings.nb_per_decade = nb;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(samples) = self.bootstrap_samples {
            settings.bootstrap_sample_size = samples;
        }
        if self.no_store_x_max {
            settings.store_x_max = false;
        }
        if self.run_time {
            settings.run_time_figures = true;
        }
        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }
}

/// Selection of the reference backdrop.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct ReferenceArg {
    /// Reference snapshot JSON file
    /// (defaults to $RLD_REFERENCE_SNAPSHOT or reference/best2009.json)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Do not draw the reference backdrop
    #[arg(long, conflicts_with = "reference")]
    pub no_reference: bool,
}

impl ReferenceArg {
    /// Returns the overlay chosen on the command line, or `None` for the process-wide one.
    pub fn overlay(&self) -> Option<ReferenceOverlay> {
        if self.no_reference {
            Some(ReferenceOverlay::unavailable())
        } else {
            self.reference.as_ref().map(ReferenceOverlay::new)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ecdf_command() {
        let args = CommandArgs::try_parse_from([
            "rld",
            "-v",
            "ecdf",
            "trials.json",
            "--targets",
            "1e-1,1e-8",
            "--dims",
            "2,3",
            "--no-reference",
        ])
        .unwrap();
        assert!(args.verbose);
        let Mode::Ecdf(arg) = args.mode else {
            panic!("expected ecdf mode");
        };
        assert_eq!(arg.trials, PathBuf::from("trials.json"));
        assert_eq!(arg.settings.targets, Some(vec![1e-1, 1e-8]));
        assert!(arg.reference.no_reference);
    }

    #[test]
    fn test_reference_flags_conflict() {
        let res = CommandArgs::try_parse_from([
            "rld",
            "ecdf",
            "trials.json",
            "--reference",
            "best.json",
            "--no-reference",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = SettingsArg {
            targets: Some(vec![1e-3]),
            dims: Some(vec![10]),
            seed: Some(7),
            no_store_x_max: true,
            run_time: true,
            ..SettingsArg::default()
        };
        let settings = arg.resolve().unwrap();
        assert_eq!(settings.targets, vec![Target::Scalar(1e-3)]);
        assert_eq!(settings.dimensions, vec![10]);
        assert_eq!(settings.seed, 7);
        assert!(!settings.store_x_max);
        assert!(settings.run_time_figures);
        assert_eq!(settings.nb_per_decade, EcdfSettings::default().nb_per_decade);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let arg = SettingsArg {
            targets: Some(vec![-1.0]),
            ..SettingsArg::default()
        };
        assert!(arg.resolve().is_err());
    }

    #[test]
    fn test_reference_selection() {
        assert!(ReferenceArg::default().overlay().is_none());

        let disabled = ReferenceArg {
            no_reference: true,
            ..ReferenceArg::default()
        };
        assert!(!disabled.overlay().unwrap().is_available());

        let custom = ReferenceArg {
            reference: Some(PathBuf::from("best.json")),
            ..ReferenceArg::default()
        };
        let overlay = custom.overlay().unwrap();
        assert_eq!(overlay.path(), Some(std::path::Path::new("best.json")));
    }
}
