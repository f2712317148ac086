//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::ParallelEnv;
pub use policy::{Policy, RandomPolicy};
pub use step::{Info, Step};

use std::collections::BTreeMap;

/// Mapping keyed by agent identifiers.
///
/// Ordered, so that iterating over agents (and thus drawing random actions)
/// is reproducible for a given seed.
pub type AgentMap<K, V> = BTreeMap<K, V>;
