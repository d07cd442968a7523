//! Settings of an ECDF figure-generation run

use rld_data::{Dimension, Target};
use serde::{Deserialize, Serialize};

use crate::distribution::run_time::{DEFAULT_PERCENTILE, DEFAULT_SAMPLE_SIZE};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SettingsError {
    #[display("at least one target is required")]
    NoTargets,
    #[display("target precision must be positive and finite, got {value}")]
    InvalidTarget { value: f64 },
    #[display("markers per decade must be at least 1")]
    ZeroMarkerDensity,
    #[display("bootstrap sample size must be at least 1")]
    ZeroSampleSize,
    #[display("bootstrap percentile must be within [0, 1], got {percentile}")]
    PercentileOutOfRange { percentile: f64 },
    #[display("dimension must be at least 1")]
    ZeroDimension,
}

/// Parameters of an ECDF figure-generation run.
///
/// Every field has a default, so a settings file only lists what it changes:
///
/// ```
/// use rld_analysis::settings::EcdfSettings;
///
/// let settings: EcdfSettings = serde_json::from_str(r#"{ "dimensions": [10] }"#).unwrap();
/// assert_eq!(settings.dimensions, vec![10]);
/// assert_eq!(settings.targets, EcdfSettings::default().targets);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcdfSettings {
    /// Targets drawn on each figure, one curve per target.
    pub targets: Vec<Target>,
    /// Dimensions to generate figures for. Dimensions missing from the data are skipped.
    pub dimensions: Vec<Dimension>,
    /// Density of log-uniform markers on ECDF curves.
    pub nb_per_decade: u32,
    /// Bootstrap draws per (algorithm, function) pool for estimated run-time figures.
    pub bootstrap_sample_size: usize,
    /// Percentile reported by the bootstrap estimator.
    pub bootstrap_percentile: f64,
    /// Seed of the bootstrap estimator.
    pub seed: u64,
    /// Keep the right axis limit of the first figure for the following
    /// figures of the same dimension.
    pub store_x_max: bool,
    /// Also build estimated run-time figures.
    pub run_time_figures: bool,
}

impl Default for EcdfSettings {
    fn default() -> Self {
        Self {
            targets: [10.0, 1e-1, 1e-4, 1e-8].map(Target::Scalar).to_vec(),
            dimensions: vec![5, 20],
            nb_per_decade: 1,
            bootstrap_sample_size: DEFAULT_SAMPLE_SIZE,
            bootstrap_percentile: DEFAULT_PERCENTILE,
            seed: 0x5eed,
            store_x_max: true,
            run_time_figures: false,
        }
    }
}

impl EcdfSettings {
    /// Checks the settings for values the figure builders cannot use.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.targets.is_empty() {
            return Err(SettingsError::NoTargets);
        }
        for target in &self.targets {
            let values: Vec<f64> = match target {
                Target::Scalar(value) => vec![*value],
                Target::PerFunction(map) => map.values().copied().collect(),
            };
            if let Some(&value) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                return Err(SettingsError::InvalidTarget { value });
            }
        }
        if self.nb_per_decade == 0 {
            return Err(SettingsError::ZeroMarkerDensity);
        }
        if self.bootstrap_sample_size == 0 {
            return Err(SettingsError::ZeroSampleSize);
        }
        if !(0.0..=1.0).contains(&self.bootstrap_percentile) {
            return Err(SettingsError::PercentileOutOfRange {
                percentile: self.bootstrap_percentile,
            });
        }
        if self.dimensions.contains(&0) {
            return Err(SettingsError::ZeroDimension);
        }
        Ok(())
    }
}
