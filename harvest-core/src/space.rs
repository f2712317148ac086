//! Action and observation spaces.
//!
//! Every agent of a [`ParallelEnv`](crate::ParallelEnv) has its own action and
//! observation space. The episode driver only relies on the [`Space`] capability,
//! i.e., drawing a random sample and checking membership, never on the concrete
//! shape of a space.
//!
//! The concrete spaces mirror the ones of Gymnasium, which Melting Pot substrates
//! expose through their compatibility wrappers:
//!
//! * [`Discrete`] - integers `start, ..., start + n - 1`
//! * [`BoxSpace`] - arrays of `f32` with per-element bounds
//! * [`MultiDiscrete`] - vectors of independent discrete values
//! * [`DictSpace`] - named sub-spaces
//!
//! [`AnySpace`] wraps any of them and can be written in YAML:
//!
//! ```rust
//! use harvest_core::space::{AnySpace, Space};
//!
//! let yaml = r#"
//! type: dict
//! spaces:
//!   move:
//!     type: discrete
//!     n: 5
//!   strength:
//!     type: box
//!     low: [0.0]
//!     high: [1.0]
//!     shape: [1]
//! "#;
//! let space: AnySpace = serde_yaml::from_str(yaml).unwrap();
//! space.validate().unwrap();
//! assert_eq!(space.to_string(), "Dict('move': Discrete(5), 'strength': Box(0.0, 1.0, (1,), float32))");
//! ```
mod any;
mod box_space;
mod dict;
mod discrete;
mod multi_discrete;

pub use any::{AnySpace, SpaceValue};
pub use box_space::BoxSpace;
pub use dict::DictSpace;
pub use discrete::Discrete;
pub use multi_discrete::MultiDiscrete;

use rand::Rng;
use std::fmt::Debug;

/// A set of values an action or an observation can take.
pub trait Space: Debug {
    /// The type of the elements of the space.
    type Sample;

    /// Draws a random element of the space.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Sample;

    /// Returns `true` if `value` is an element of the space.
    fn contains(&self, value: &Self::Sample) -> bool;

    /// Shape of the elements. Empty for scalar and composite spaces.
    fn shape(&self) -> Vec<usize>;

    /// Structural description used when inspecting an environment.
    fn summary(&self) -> SpaceSummary;
}

/// Structure of a space, as reported by [`Space::summary`].
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceSummary {
    /// `n` integers starting from `start`.
    Discrete {
        /// Number of elements.
        n: usize,
        /// Smallest element.
        start: i64,
    },

    /// Bounded array.
    Box {
        /// Shape of the array.
        shape: Vec<usize>,
        /// Lower bounds, flattened.
        low: Vec<f32>,
        /// Upper bounds, flattened.
        high: Vec<f32>,
    },

    /// Independent discrete components.
    MultiDiscrete {
        /// Number of elements of each component.
        nvec: Vec<usize>,
    },

    /// Named components, ordered by name.
    Dict(Vec<(String, SpaceSummary)>),
}

/// Formats a shape the way Python prints a tuple, e.g. `(88, 88, 3)` or `(1,)`.
pub(crate) fn fmt_shape(shape: &[usize]) -> String {
    match shape {
        [d] => format!("({},)", d),
        _ => format!(
            "({})",
            shape
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
