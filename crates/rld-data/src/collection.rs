//! Collections of trial records and their groupings

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    function::{Dimension, FunctionGroup, FunctionId, NoiseClass},
    record::TrialRecord,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot process dimensions {dimensions:?} together")]
pub struct DimensionMismatchError {
    #[error(not(source))]
    pub dimensions: Vec<Dimension>,
}

/// Ordered multiset of trial records.
///
/// The collection does not require its records to share anything; consumers
/// split it with the `by_*` groupings. Groupings are keyed by `BTreeMap` so
/// they iterate in a stable order, and records keep their relative order
/// inside each group.
///
/// It serializes as a plain JSON array of records.
///
/// # Examples
///
/// ```
/// use rld_data::{collection::TrialCollection, record::{Observation, TrialRecord}};
///
/// let records = [(1, 5), (2, 5), (1, 20)]
///     .into_iter()
///     .map(|(function_id, dimension)| {
///         TrialRecord::new("alg", function_id, dimension, 1, 100, vec![Observation::new(1, 1.0)])
///             .unwrap()
///     })
///     .collect::<Vec<_>>();
/// let collection = TrialCollection::new(records);
///
/// let by_dim = collection.by_dimension();
/// assert_eq!(by_dim.keys().copied().collect::<Vec<_>>(), vec![5, 20]);
/// assert_eq!(by_dim[&5].len(), 2);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialCollection {
    records: Vec<TrialRecord>,
}

impl FromIterator<TrialRecord> for TrialCollection {
    fn from_iter<T: IntoIterator<Item = TrialRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TrialCollection {
    type Item = &'a TrialRecord;
    type IntoIter = std::slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl TrialCollection {
    #[must_use]
    pub fn new(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the distinct dimensions present.
    #[must_use]
    pub fn dimensions(&self) -> BTreeSet<Dimension> {
        self.records.iter().map(TrialRecord::dimension).collect()
    }

    /// Returns the distinct function ids present.
    #[must_use]
    pub fn function_ids(&self) -> BTreeSet<FunctionId> {
        self.records.iter().map(TrialRecord::function_id).collect()
    }

    /// Returns the single dimension shared by all records.
    ///
    /// Returns `Ok(None)` for an empty collection, and an error when more than
    /// one dimension is present.
    pub fn single_dimension(&self) -> Result<Option<Dimension>, DimensionMismatchError> {
        let dimensions = self.dimensions();
        if dimensions.len() > 1 {
            return Err(DimensionMismatchError {
                dimensions: dimensions.into_iter().collect(),
            });
        }
        Ok(dimensions.first().copied())
    }

    /// Returns the largest `max_evals / dimension` over all records.
    #[must_use]
    pub fn max_evals_per_dimension(&self) -> Option<f64> {
        self.records
            .iter()
            .map(TrialRecord::max_evals_per_dimension)
            .max_by(f64::total_cmp)
    }

    /// Groups records by a custom key
    ///
    /// Records for which `key` returns `None` are left out.
    pub fn group_by<K, F>(&self, mut key: F) -> BTreeMap<K, TrialCollection>
    where
        F: FnMut(&TrialRecord) -> Option<K>,
        K: Ord,
    {
        let mut groups: BTreeMap<K, Vec<TrialRecord>> = BTreeMap::new();
        for record in &self.records {
            if let Some(k) = key(record) {
                groups.entry(k).or_default().push(record.clone());
            }
        }
        groups
            .into_iter()
            .map(|(k, records)| (k, TrialCollection::new(records)))
            .collect()
    }

    #[must_use]
    pub fn by_dimension(&self) -> BTreeMap<Dimension, TrialCollection> {
        self.group_by(|r| Some(r.dimension()))
    }

    #[must_use]
    pub fn by_function(&self) -> BTreeMap<FunctionId, TrialCollection> {
        self.group_by(|r| Some(r.function_id()))
    }

    #[must_use]
    pub fn by_algorithm(&self) -> BTreeMap<String, TrialCollection> {
        self.group_by(|r| Some(r.algorithm().to_owned()))
    }

    /// Groups by testbed. Functions outside both testbeds are left out.
    #[must_use]
    pub fn by_noise(&self) -> BTreeMap<NoiseClass, TrialCollection> {
        self.group_by(TrialRecord::noise_class)
    }

    /// Groups by function group. Functions outside both testbeds are left out.
    #[must_use]
    pub fn by_function_group(&self) -> BTreeMap<FunctionGroup, TrialCollection> {
        self.group_by(TrialRecord::function_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Observation;

    fn record(algorithm: &str, function_id: FunctionId, dimension: Dimension) -> TrialRecord {
        TrialRecord::new(
            algorithm,
            function_id,
            dimension,
            1,
            u64::from(dimension) * 100,
            vec![Observation::new(1, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_single_dimension() {
        let empty = TrialCollection::default();
        assert_eq!(empty.single_dimension(), Ok(None));

        let same = TrialCollection::new(vec![record("a", 1, 5), record("a", 2, 5)]);
        assert_eq!(same.single_dimension(), Ok(Some(5)));

        let mixed = TrialCollection::new(vec![record("a", 1, 20), record("a", 1, 5)]);
        assert_eq!(
            mixed.single_dimension(),
            Err(DimensionMismatchError {
                dimensions: vec![5, 20]
            })
        );
    }

    #[test]
    fn test_groupings_skip_unknown_functions() {
        let collection = TrialCollection::new(vec![
            record("a", 1, 5),
            record("a", 50, 5),
            record("a", 101, 5),
            record("a", 7, 5),
        ]);
        let noise = collection.by_noise();
        assert_eq!(noise[&NoiseClass::Noiseless].len(), 2);
        assert_eq!(noise[&NoiseClass::Noisy].len(), 1);

        let groups = collection.by_function_group();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&FunctionGroup::ModerateConditioning].len(), 1);
        assert_eq!(collection.by_function().len(), 4);
    }

    #[test]
    fn test_group_keeps_record_order() {
        let collection = TrialCollection::new(vec![
            record("b", 3, 5),
            record("a", 1, 5),
            record("b", 2, 5),
        ]);
        let by_alg = collection.by_algorithm();
        let b = by_alg["b"]
            .iter()
            .map(TrialRecord::function_id)
            .collect::<Vec<_>>();
        assert_eq!(b, vec![3, 2]);
    }

    #[test]
    fn test_deserialize_array_of_records() {
        let json = r#"[
            {"algorithm": "a", "function_id": 3, "dimension": 5, "max_evals": 50,
             "observations": [{"evals": 1, "fvalue": 2.0}]},
            {"function_id": 4, "dimension": 5, "max_evals": 50, "observations": []}
        ]"#;
        let collection: TrialCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.records()[1].algorithm(), "");
        assert_eq!(collection.function_ids(), BTreeSet::from([3, 4]));

        let invalid = r#"[{"function_id": 1, "dimension": 0, "max_evals": 1, "observations": []}]"#;
        assert!(serde_json::from_str::<TrialCollection>(invalid).is_err());
    }

    #[test]
    fn test_max_evals_per_dimension() {
        let collection = TrialCollection::new(vec![record("a", 1, 5), record("a", 2, 5)]);
        assert_eq!(collection.max_evals_per_dimension(), Some(100.0));
        assert_eq!(TrialCollection::default().max_evals_per_dimension(), None);
    }
}
