//! Classification of benchmark functions by noise and function group
//!
//! Function identifiers follow the benchmark suite numbering: functions 1 to
//! 24 are noiseless, functions 101 to 130 are noisy. Both testbeds are further
//! split into groups of functions sharing a property, and figures are usually
//! produced once per group.

use serde::{Deserialize, Serialize};

/// Identifier of a test function.
pub type FunctionId = u32;

/// Problem dimension (number of search-space variables).
pub type Dimension = u32;

/// Testbed a function belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum NoiseClass {
    #[display("noiselessall")]
    Noiseless,
    #[display("nzall")]
    Noisy,
}

impl NoiseClass {
    /// Returns the testbed of `function_id`, or `None` for ids outside both testbeds.
    #[must_use]
    pub fn of(function_id: FunctionId) -> Option<Self> {
        match function_id {
            1..=24 => Some(Self::Noiseless),
            101..=130 => Some(Self::Noisy),
            _ => None,
        }
    }
}

/// Group of functions sharing a structural property.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum FunctionGroup {
    /// Separable functions (f1-f5)
    #[display("separ")]
    Separable,
    /// Functions with low or moderate conditioning (f6-f9)
    #[display("lcond")]
    ModerateConditioning,
    /// Unimodal functions with high conditioning (f10-f14)
    #[display("hcond")]
    HighConditioning,
    /// Multi-modal functions with adequate global structure (f15-f19)
    #[display("multi")]
    MultiModal,
    /// Multi-modal functions with weak global structure (f20-f24)
    #[display("mult2")]
    WeakStructure,
    /// Functions with moderate noise (f101-f106)
    #[display("nzmod")]
    ModerateNoise,
    /// Functions with severe noise (f107-f121)
    #[display("nzsev")]
    SevereNoise,
    /// Highly multi-modal functions with severe noise (f122-f130)
    #[display("nzmult")]
    SevereNoiseMultiModal,
}

impl FunctionGroup {
    /// Returns the group of `function_id`, or `None` for ids outside both testbeds.
    #[must_use]
    pub fn of(function_id: FunctionId) -> Option<Self> {
        let group = match function_id {
            1..=5 => Self::Separable,
            6..=9 => Self::ModerateConditioning,
            10..=14 => Self::HighConditioning,
            15..=19 => Self::MultiModal,
            20..=24 => Self::WeakStructure,
            101..=106 => Self::ModerateNoise,
            107..=121 => Self::SevereNoise,
            122..=130 => Self::SevereNoiseMultiModal,
            _ => return None,
        };
        Some(group)
    }

    /// Returns the testbed the group belongs to.
    #[must_use]
    pub fn noise_class(self) -> NoiseClass {
        match self {
            Self::Separable
            | Self::ModerateConditioning
            | Self::HighConditioning
            | Self::MultiModal
            | Self::WeakStructure => NoiseClass::Noiseless,
            Self::ModerateNoise | Self::SevereNoise | Self::SevereNoiseMultiModal => {
                NoiseClass::Noisy
            }
        }
    }
}

/// Formats sorted function ids as compact ranges, e.g. `[1, 2, 3, 5]` as `"1-3,5"`.
///
/// Duplicates are ignored. The input does not need to be sorted.
///
/// # Examples
///
/// ```
/// use rld_data::function::format_function_ranges;
///
/// assert_eq!(format_function_ranges([1, 2, 3, 5, 7, 8]), "1-3,5,7-8");
/// assert_eq!(format_function_ranges([101]), "101");
/// assert_eq!(format_function_ranges(Vec::new()), "");
/// ```
#[must_use]
pub fn format_function_ranges<I>(function_ids: I) -> String
where
    I: IntoIterator<Item = FunctionId>,
{
    let mut ids = function_ids.into_iter().collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();

    let mut ranges: Vec<(FunctionId, FunctionId)> = vec![];
    for id in ids {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == id => *end = id,
            _ => ranges.push((id, id)),
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
