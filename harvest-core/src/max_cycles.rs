//! Truncates episodes after a number of steps.
use crate::{error::HarvestError, record::Record, AgentMap, ParallelEnv, Step};
use anyhow::Result;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Configuration of [`MaxCycles`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxCyclesConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Number of steps after which every agent is truncated.
    pub max_cycles: usize,
}

impl<C> MaxCyclesConfig<C> {
    /// Constructs the configuration.
    pub fn new(env: C, max_cycles: usize) -> Self {
        Self { env, max_cycles }
    }
}

/// Wraps a [`ParallelEnv`] and truncates every agent `max_cycles` steps after reset.
///
/// Once truncated, the wrapper reports no live agents until the next reset,
/// whatever the wrapped environment says.
#[derive(Debug)]
pub struct MaxCycles<E> {
    env: E,
    max_cycles: usize,
    cycle: usize,
    exhausted: bool,
}

impl<E: ParallelEnv> MaxCycles<E> {
    /// Wraps `env`. `max_cycles` must be positive.
    pub fn new(env: E, max_cycles: usize) -> Result<Self> {
        if max_cycles == 0 {
            return Err(HarvestError::EnvBuild("max_cycles must be positive".to_string()).into());
        }
        Ok(Self {
            env,
            max_cycles,
            cycle: 0,
            exhausted: false,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: ParallelEnv> ParallelEnv for MaxCycles<E> {
    type Config = MaxCyclesConfig<E::Config>;
    type AgentId = E::AgentId;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;
    type ActSpace = E::ActSpace;
    type ObsSpace = E::ObsSpace;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Self::new(E::build(&config.env, seed)?, config.max_cycles)
    }

    fn reset(&mut self) -> Result<AgentMap<E::AgentId, E::Obs>> {
        self.cycle = 0;
        self.exhausted = false;
        self.env.reset()
    }

    fn agents(&self) -> Vec<E::AgentId> {
        if self.exhausted {
            vec![]
        } else {
            self.env.agents()
        }
    }

    fn possible_agents(&self) -> Vec<E::AgentId> {
        self.env.possible_agents()
    }

    fn action_space(&self, agent: &E::AgentId) -> Result<&E::ActSpace> {
        self.env.action_space(agent)
    }

    fn observation_space(&self, agent: &E::AgentId) -> Result<&E::ObsSpace> {
        self.env.observation_space(agent)
    }

    fn step(&mut self, actions: &AgentMap<E::AgentId, E::Act>) -> Result<(Step<Self>, Record)> {
        if self.exhausted {
            if let Some(agent) = actions.keys().next() {
                return Err(HarvestError::InactiveAgent(agent.to_string()).into());
            }
        }

        let (step, record) = self.env.step(actions)?;
        let Step {
            obs,
            rewards,
            terminations,
            mut truncations,
            infos,
        } = step;
        self.cycle += 1;
        trace!("MaxCycles: cycle {}/{}", self.cycle, self.max_cycles);

        if self.cycle >= self.max_cycles {
            debug!("Truncate every agent after {} cycles", self.cycle);
            for agent in actions.keys().chain(rewards.keys()).chain(terminations.keys()) {
                truncations.insert(agent.clone(), true);
            }
            for flag in truncations.values_mut() {
                *flag = true;
            }
            self.exhausted = true;
        }

        Ok((
            Step::new(obs, rewards, terminations, truncations, infos),
            record,
        ))
    }

    fn close(&mut self) -> Result<()> {
        self.env.close()
    }
}
