//! Environment.
use super::{AgentMap, Info, Step};
use crate::{record::Record, space::Space};
use anyhow::Result;
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// A multi-agent environment in which all live agents act simultaneously.
///
/// This is the interface of PettingZoo's parallel API, which Melting Pot
/// substrates expose through their compatibility wrappers. The set of live
/// agents may shrink after every [`step`](ParallelEnv::step); callers must query
/// [`agents`](ParallelEnv::agents) again instead of caching it.
pub trait ParallelEnv {
    /// Configurations.
    type Config: Clone;

    /// Identifier of an agent, stable during an episode.
    type AgentId: Clone + Ord + Hash + Debug + Display;

    /// Observation of a single agent.
    type Obs: Clone + Debug;

    /// Action of a single agent.
    type Act: Clone + Debug;

    /// Auxiliary information of a single agent in the [`Step`] object.
    type Info: Info;

    /// Action space of a single agent.
    type ActSpace: Space<Sample = Self::Act> + Display;

    /// Observation space of a single agent.
    type ObsSpace: Space<Sample = Self::Obs> + Display;

    /// Builds an environment with a given random seed.
    ///
    /// Failing to construct or load the environment is fatal and not retried.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation of every agent.
    fn reset(&mut self) -> Result<AgentMap<Self::AgentId, Self::Obs>>;

    /// Agents currently taking part in the episode.
    fn agents(&self) -> Vec<Self::AgentId>;

    /// Every agent that may take part in an episode.
    fn possible_agents(&self) -> Vec<Self::AgentId>;

    /// Action space of the given agent.
    fn action_space(&self, agent: &Self::AgentId) -> Result<&Self::ActSpace>;

    /// Observation space of the given agent.
    fn observation_space(&self, agent: &Self::AgentId) -> Result<&Self::ObsSpace>;

    /// Applies one action per live agent.
    ///
    /// Acting for an agent that is not live, or giving an action outside the
    /// agent's action space, is an error.
    fn step(&mut self, actions: &AgentMap<Self::AgentId, Self::Act>) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Releases resources held by the environment.
    ///
    /// Calling this method more than once must not fail.
    fn close(&mut self) -> Result<()>;
}
