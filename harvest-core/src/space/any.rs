use super::{BoxSpace, DictSpace, Discrete, MultiDiscrete, Space, SpaceSummary};
use crate::error::HarvestError;
use ndarray::ArrayD;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Any of the concrete spaces.
///
/// In YAML, the variant is selected by the `type` key
/// (`discrete`, `box`, `multi_discrete` or `dict`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnySpace {
    /// See [`Discrete`].
    Discrete(Discrete),

    /// See [`BoxSpace`].
    Box(BoxSpace),

    /// See [`MultiDiscrete`].
    MultiDiscrete(MultiDiscrete),

    /// See [`DictSpace`].
    Dict(DictSpace),
}

/// An element of an [`AnySpace`].
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceValue {
    /// Element of [`Discrete`].
    Discrete(i64),

    /// Element of [`BoxSpace`].
    Box(ArrayD<f32>),

    /// Element of [`MultiDiscrete`].
    MultiDiscrete(Vec<usize>),

    /// Element of [`DictSpace`].
    Dict(BTreeMap<String, SpaceValue>),
}

impl AnySpace {
    /// Checks the wrapped space. Deserialized spaces are not checked otherwise.
    pub fn validate(&self) -> Result<(), HarvestError> {
        match self {
            Self::Discrete(s) => s.validate(),
            Self::Box(s) => s.validate(),
            Self::MultiDiscrete(s) => s.validate(),
            Self::Dict(s) => s.validate(),
        }
    }
}

impl Space for AnySpace {
    type Sample = SpaceValue;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpaceValue {
        match self {
            Self::Discrete(s) => SpaceValue::Discrete(s.sample(rng)),
            Self::Box(s) => SpaceValue::Box(s.sample(rng)),
            Self::MultiDiscrete(s) => SpaceValue::MultiDiscrete(s.sample(rng)),
            Self::Dict(s) => SpaceValue::Dict(s.sample(rng)),
        }
    }

    fn contains(&self, value: &SpaceValue) -> bool {
        match (self, value) {
            (Self::Discrete(s), SpaceValue::Discrete(v)) => s.contains(v),
            (Self::Box(s), SpaceValue::Box(v)) => s.contains(v),
            (Self::MultiDiscrete(s), SpaceValue::MultiDiscrete(v)) => s.contains(v),
            (Self::Dict(s), SpaceValue::Dict(v)) => s.contains(v),
            _ => false,
        }
    }

    fn shape(&self) -> Vec<usize> {
        match self {
            Self::Discrete(s) => s.shape(),
            Self::Box(s) => s.shape(),
            Self::MultiDiscrete(s) => s.shape(),
            Self::Dict(s) => s.shape(),
        }
    }

    fn summary(&self) -> SpaceSummary {
        match self {
            Self::Discrete(s) => s.summary(),
            Self::Box(s) => s.summary(),
            Self::MultiDiscrete(s) => s.summary(),
            Self::Dict(s) => s.summary(),
        }
    }
}

impl fmt::Display for AnySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete(s) => fmt::Display::fmt(s, f),
            Self::Box(s) => fmt::Display::fmt(s, f),
            Self::MultiDiscrete(s) => fmt::Display::fmt(s, f),
            Self::Dict(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl From<Discrete> for AnySpace {
    fn from(space: Discrete) -> Self {
        Self::Discrete(space)
    }
}

impl From<BoxSpace> for AnySpace {
    fn from(space: BoxSpace) -> Self {
        Self::Box(space)
    }
}

impl From<MultiDiscrete> for AnySpace {
    fn from(space: MultiDiscrete) -> Self {
        Self::MultiDiscrete(space)
    }
}

impl From<DictSpace> for AnySpace {
    fn from(space: DictSpace) -> Self {
        Self::Dict(space)
    }
}

impl fmt::Display for SpaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete(v) => write!(f, "{}", v),
            Self::Box(v) => write!(f, "{:?}", v.iter().collect::<Vec<_>>()),
            Self::MultiDiscrete(v) => write!(f, "{:?}", v),
            Self::Dict(v) => {
                let items: Vec<String> = v.iter().map(|(k, v)| format!("'{}': {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}
