use super::{AnySpace, Space, SpaceSummary, SpaceValue};
use crate::error::HarvestError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Named sub-spaces.
///
/// Melting Pot observations are dictionaries (e.g., `RGB`, `READY_TO_SHOOT`),
/// and some substrates split actions into named components as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictSpace {
    /// Sub-spaces, ordered by name.
    pub spaces: BTreeMap<String, AnySpace>,
}

impl DictSpace {
    /// Constructs the space from `(name, space)` pairs.
    pub fn new<K: Into<String>>(
        spaces: impl IntoIterator<Item = (K, AnySpace)>,
    ) -> Result<Self, HarvestError> {
        let space = Self {
            spaces: spaces.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        };
        space.validate()?;
        Ok(space)
    }

    /// Returns the sub-space of the given name.
    pub fn get(&self, name: &str) -> Option<&AnySpace> {
        self.spaces.get(name)
    }

    /// Validates every sub-space.
    pub fn validate(&self) -> Result<(), HarvestError> {
        for (name, space) in self.spaces.iter() {
            space.validate().map_err(|e| match e {
                HarvestError::InvalidSpace(msg) => {
                    HarvestError::InvalidSpace(format!("'{}': {}", name, msg))
                }
                e => e,
            })?;
        }
        Ok(())
    }
}

impl Space for DictSpace {
    type Sample = BTreeMap<String, SpaceValue>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Sample {
        self.spaces
            .iter()
            .map(|(k, space)| (k.clone(), space.sample(rng)))
            .collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        value.len() == self.spaces.len()
            && self
                .spaces
                .iter()
                .all(|(k, space)| value.get(k).map_or(false, |v| space.contains(v)))
    }

    fn shape(&self) -> Vec<usize> {
        vec![]
    }

    fn summary(&self) -> SpaceSummary {
        SpaceSummary::Dict(
            self.spaces
                .iter()
                .map(|(k, space)| (k.clone(), space.summary()))
                .collect(),
        )
    }
}

impl fmt::Display for DictSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .spaces
            .iter()
            .map(|(k, space)| format!("'{}': {}", k, space))
            .collect();
        write!(f, "Dict({})", items.join(", "))
    }
}
