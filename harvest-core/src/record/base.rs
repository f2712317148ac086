//! Record and its values.
use crate::error::HarvestError;
use chrono::prelude::{DateTime, Local};
use std::collections::HashMap;

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, e.g., the reward of an agent at a step.
    Scalar(f32),

    /// A timestamp, e.g., the wall-clock time of a step.
    DateTime(DateTime<Local>),

    /// Text, e.g., the description of an action.
    String(String),
}

/// Key-value pairs recorded at a step or at the end of an episode.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record holding a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair, overwriting an existing value.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Returns the scalar of the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, HarvestError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(HarvestError::RecordValueTypeError("Scalar".to_string())),
            None => Err(HarvestError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the string of the given key.
    pub fn get_string(&self, k: &str) -> Result<String, HarvestError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(HarvestError::RecordValueTypeError("String".to_string())),
            None => Err(HarvestError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
