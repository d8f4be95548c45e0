//! Field aggregation across content files.
//!
//! Folds an ordered sequence of [`FileRecord`]s into one [`FieldObservation`]
//! per distinct field name. Emission order is the order in which fields were
//! first seen, so a sorted input yields a stable output.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::scanner::FileRecord;
use crate::value::{FieldValue, PrimitiveType};

/// Maximum number of sample values kept per field.
pub const MAX_SAMPLES: usize = 3;

/// Distinct string values tracked per field before giving up.
pub const MAX_DISTINCT_VALUES: usize = 8;

/// Distinct non-empty string values of a field.
///
/// Switches to `TooMany` once more than [`MAX_DISTINCT_VALUES`] are seen, so
/// the result does not depend on how the input was split for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistinctValues {
    Tracked(BTreeSet<String>),
    TooMany,
}

impl Default for DistinctValues {
    fn default() -> Self {
        Self::Tracked(BTreeSet::new())
    }
}

impl DistinctValues {
    pub fn insert(&mut self, value: &str) {
        if let Self::Tracked(values) = self {
            values.insert(value.to_string());
            if values.len() > MAX_DISTINCT_VALUES {
                *self = Self::TooMany;
            }
        }
    }

    pub fn extend(&mut self, other: &DistinctValues) {
        match other {
            Self::Tracked(values) => values.iter().for_each(|v| self.insert(v)),
            Self::TooMany => *self = Self::TooMany,
        }
    }

    /// The values, or `None` past the cap.
    pub fn values(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Tracked(values) => Some(values),
            Self::TooMany => None,
        }
    }
}

/// Statistics for one field across all aggregated files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldObservation {
    pub types: BTreeSet<PrimitiveType>,
    pub total: usize,
    pub non_empty: usize,
    pub samples: Vec<FieldValue>,
    pub distinct: DistinctValues,
}

impl FieldObservation {
    /// Record one occurrence of the field.
    pub fn observe(&mut self, value: &FieldValue) {
        self.total += 1;
        if let Some(tag) = value.primitive_type() {
            self.types.insert(tag);
        }
        if !value.is_empty() {
            self.non_empty += 1;
            if let Some(text) = value.as_str() {
                self.distinct.insert(text);
            }
            if self.samples.len() < MAX_SAMPLES {
                self.samples.push(value.clone());
            }
        }
    }

    /// Combine with an observation of the same field from later input.
    pub fn merge(&mut self, other: &FieldObservation) {
        self.total += other.total;
        self.non_empty += other.non_empty;
        self.types.extend(other.types.iter().copied());
        self.distinct.extend(&other.distinct);
        let room = MAX_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.iter().take(room).cloned());
    }

    /// Fraction of occurrences with a non-empty value.
    pub fn required_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.non_empty as f64 / self.total as f64
        }
    }
}

/// Aggregated statistics for a set of files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub file_count: usize,
    order: Vec<String>,
    fields: HashMap<String, FieldObservation>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file into the aggregation.
    pub fn add_record(&mut self, record: &FileRecord) {
        self.file_count += 1;
        for (name, value) in &record.fields {
            self.entry(name).observe(value);
        }
    }

    fn entry(&mut self, name: &str) -> &mut FieldObservation {
        if !self.fields.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.fields.entry(name.to_string()).or_default()
    }

    /// Combine with an aggregation over later input.
    pub fn merge(mut self, other: &Aggregation) -> Self {
        self.file_count += other.file_count;
        for (name, observation) in other.iter() {
            self.entry(name).merge(observation);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldObservation> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fields in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldObservation)> {
        self.order
            .iter()
            .filter_map(|name| self.fields.get(name).map(|obs| (name.as_str(), obs)))
    }
}

/// Aggregate every record into a single [`Aggregation`].
pub fn aggregate<'a, I>(records: I) -> Aggregation
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut aggregation = Aggregation::new();
    for record in records {
        aggregation.add_record(record);
    }
    aggregation
}

/// Aggregate records separately per collection, collections in first-seen order.
pub fn aggregate_by_collection(records: &[FileRecord]) -> Vec<(String, Aggregation)> {
    let mut out: Vec<(String, Aggregation)> = Vec::new();
    for record in records {
        match out.iter_mut().find(|(name, _)| *name == record.collection) {
            Some((_, aggregation)) => aggregation.add_record(record),
            None => {
                let mut aggregation = Aggregation::new();
                aggregation.add_record(record);
                out.push((record.collection.clone(), aggregation));
            }
        }
    }
    out
}
