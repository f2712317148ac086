//! Environment step.
use super::{AgentMap, ParallelEnv};
use std::fmt::{self, Debug};

/// Additional information of an agent at a step.
pub trait Info: Debug {}

impl Info for () {}

/// Result of a [`ParallelEnv::step`] call.
///
/// Every field is keyed by agent. An agent is usually present in every map
/// for the step in which it acted, but callers should not rely on it.
pub struct Step<E: ParallelEnv> {
    /// Observations after the step.
    pub obs: AgentMap<E::AgentId, E::Obs>,

    /// Rewards of the step.
    pub rewards: AgentMap<E::AgentId, f32>,

    /// Flags denoting agents whose episode is terminated.
    pub terminations: AgentMap<E::AgentId, bool>,

    /// Flags denoting agents whose episode is truncated.
    pub truncations: AgentMap<E::AgentId, bool>,

    /// Information defined by the environment.
    pub infos: AgentMap<E::AgentId, E::Info>,
}

impl<E: ParallelEnv> Debug for Step<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("obs", &self.obs)
            .field("rewards", &self.rewards)
            .field("terminations", &self.terminations)
            .field("truncations", &self.truncations)
            .field("infos", &self.infos)
            .finish()
    }
}

impl<E: ParallelEnv> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: AgentMap<E::AgentId, E::Obs>,
        rewards: AgentMap<E::AgentId, f32>,
        terminations: AgentMap<E::AgentId, bool>,
        truncations: AgentMap<E::AgentId, bool>,
        infos: AgentMap<E::AgentId, E::Info>,
    ) -> Self {
        Self {
            obs,
            rewards,
            terminations,
            truncations,
            infos,
        }
    }

    /// `true` if every agent in `terminations` is terminated.
    ///
    /// Trivially `true` for an empty map.
    pub fn all_terminated(&self) -> bool {
        self.terminations.values().all(|t| *t)
    }

    /// `true` if every agent in `truncations` is truncated.
    ///
    /// Trivially `true` for an empty map.
    pub fn all_truncated(&self) -> bool {
        self.truncations.values().all(|t| *t)
    }

    /// Terminated or truncated, aggregated over the returned mappings.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.all_terminated() || self.all_truncated()
    }

    /// `true` if the given agent finished in this step.
    pub fn is_finished(&self, agent: &E::AgentId) -> bool {
        self.terminations.get(agent).copied().unwrap_or(false)
            || self.truncations.get(agent).copied().unwrap_or(false)
    }
}
