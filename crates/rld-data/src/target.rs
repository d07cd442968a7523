//! Target precisions defining success of a trial

use std::{collections::BTreeMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};

use crate::function::FunctionId;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no target precision defined for function f{function_id}")]
pub struct TargetLookupError {
    pub function_id: FunctionId,
}

/// Function-value threshold a trial must reach to count as successful.
///
/// A target is either one precision shared by all functions, or a mapping
/// giving each function its own precision. The mapping must cover every
/// function of the data it is applied to.
///
/// # Examples
///
/// ```
/// use rld_data::target::Target;
///
/// let shared = Target::Scalar(1e-8);
/// assert_eq!(shared.resolve(7).unwrap(), 1e-8);
///
/// let per_function = Target::per_function([(1, 1e-3), (2, 1e-5)]);
/// assert_eq!(per_function.resolve(2).unwrap(), 1e-5);
/// assert!(per_function.resolve(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Target {
    Scalar(f64),
    PerFunction(BTreeMap<FunctionId, f64>),
}

impl Target {
    /// Builds a per-function target from `(function_id, precision)` pairs.
    pub fn per_function<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FunctionId, f64)>,
    {
        Self::PerFunction(entries.into_iter().collect())
    }

    /// Returns the precision that applies to `function_id`.
    pub fn resolve(&self, function_id: FunctionId) -> Result<f64, TargetLookupError> {
        match self {
            Self::Scalar(value) => Ok(*value),
            Self::PerFunction(map) => map
                .get(&function_id)
                .copied()
                .ok_or(TargetLookupError { function_id }),
        }
    }

    /// Returns the shared precision of a scalar target.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::PerFunction(_) => None,
        }
    }
}

impl From<f64> for Target {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

// Untagged derives buffer the input and then reject JSON object keys as
// function ids, so both shapes are visited by hand.
impl<'de> Deserialize<'de> for Target {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TargetVisitor)
    }
}

struct TargetVisitor;

impl<'de> Visitor<'de> for TargetVisitor {
    type Value = Target;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a precision or a map from function id to precision")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Target::Scalar(value))
    }

    #[expect(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Target::Scalar(value as f64))
    }

    #[expect(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Target::Scalar(value as f64))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut precisions = BTreeMap::new();
        while let Some((function_id, precision)) = map.next_entry::<FunctionId, f64>()? {
            precisions.insert(function_id, precision);
        }
        Ok(Target::PerFunction(precisions))
    }
}
