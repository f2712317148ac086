//! A multi-agent environment driven by a script.
//!
//! [`ScriptedEnv`] follows a fixed schedule read from YAML: which agents take
//! part, their spaces, the reward they receive at every step and the step at
//! which each of them terminates or is truncated. Observations are random
//! elements of the observation spaces. It stands in for an external substrate
//! when exercising drivers and tools, and it checks every action it receives
//! as strictly as a real environment would.
mod config;
pub use config::{ScriptedAgentConfig, ScriptedEnvConfig};

use crate::{
    error::HarvestError,
    record::{Record, RecordValue},
    space::{AnySpace, Space, SpaceValue},
    AgentMap, Info, ParallelEnv, Step,
};
use anyhow::Result;
use log::{info, trace};
use rand::{rngs::SmallRng, SeedableRng};
use std::collections::BTreeSet;

/// Information of an agent at a step of [`ScriptedEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedInfo {
    /// Number of steps since the last reset, including this one.
    pub cycle: usize,
}

impl Info for ScriptedInfo {}

/// See the [module documentation](self).
#[derive(Debug)]
pub struct ScriptedEnv {
    config: ScriptedEnvConfig,

    rng: SmallRng,

    /// Live agents. Empty until the first reset.
    active: BTreeSet<String>,

    cycle: usize,

    closed: bool,
}

impl ScriptedEnv {
    fn agent_config(&self, agent: &str) -> Result<&ScriptedAgentConfig, HarvestError> {
        self.config
            .agents
            .iter()
            .find(|a| a.id == agent)
            .ok_or_else(|| HarvestError::UnknownAgent(agent.to_string()))
    }

    /// Name given in the configuration.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Number of steps since the last reset.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// `true` once [`close`](ParallelEnv::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // Rejects the whole action mapping before any state changes.
    fn check_actions(&self, actions: &AgentMap<String, SpaceValue>) -> Result<(), HarvestError> {
        if actions.is_empty() && !self.active.is_empty() {
            return Err(HarvestError::EmptyActions(self.active.len()));
        }
        for (agent, act) in actions.iter() {
            let config = self.agent_config(agent)?;
            if !self.active.contains(agent) {
                return Err(HarvestError::InactiveAgent(agent.clone()));
            }
            if !config.action_space.contains(act) {
                return Err(HarvestError::InvalidAction {
                    agent: agent.clone(),
                    action: act.to_string(),
                    space: config.action_space.to_string(),
                });
            }
        }
        if let Some(agent) = self.active.iter().find(|a| !actions.contains_key(*a)) {
            return Err(HarvestError::MissingAction(agent.clone()));
        }
        Ok(())
    }
}

impl ParallelEnv for ScriptedEnv {
    type Config = ScriptedEnvConfig;
    type AgentId = String;
    type Obs = SpaceValue;
    type Act = SpaceValue;
    type Info = ScriptedInfo;
    type ActSpace = AnySpace;
    type ObsSpace = AnySpace;

    /// Validates the configuration. `seed` seeds the observation sampler.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.validate()?;
        info!(
            "Build scripted environment {} with {} agents",
            config.name,
            config.agents.len()
        );

        Ok(Self {
            config: config.clone(),
            rng: SmallRng::seed_from_u64(seed as u64),
            active: BTreeSet::new(),
            cycle: 0,
            closed: false,
        })
    }

    fn reset(&mut self) -> Result<AgentMap<String, SpaceValue>> {
        trace!("ScriptedEnv::reset()");
        if self.closed {
            return Err(HarvestError::Closed.into());
        }

        self.cycle = 0;
        self.active = self.config.agents.iter().map(|a| a.id.clone()).collect();

        let mut obs = AgentMap::new();
        for agent in self.config.agents.iter() {
            obs.insert(agent.id.clone(), agent.observation_space.sample(&mut self.rng));
        }
        Ok(obs)
    }

    fn agents(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }

    fn possible_agents(&self) -> Vec<String> {
        self.config.agents.iter().map(|a| a.id.clone()).collect()
    }

    fn action_space(&self, agent: &String) -> Result<&AnySpace> {
        Ok(&self.agent_config(agent)?.action_space)
    }

    fn observation_space(&self, agent: &String) -> Result<&AnySpace> {
        Ok(&self.agent_config(agent)?.observation_space)
    }

    /// Every live agent must act. Agents reaching their `terminate_at` or
    /// `truncate_at` step leave the live set after this step.
    fn step(&mut self, actions: &AgentMap<String, SpaceValue>) -> Result<(Step<Self>, Record)> {
        trace!("ScriptedEnv::step()");
        if self.closed {
            return Err(HarvestError::Closed.into());
        }
        self.check_actions(actions)?;
        self.cycle += 1;

        let cycle = self.cycle;
        let mut obs = AgentMap::new();
        let mut rewards = AgentMap::new();
        let mut terminations = AgentMap::new();
        let mut truncations = AgentMap::new();
        let mut infos = AgentMap::new();

        for agent in self.config.agents.iter().filter(|a| self.active.contains(&a.id)) {
            let id = agent.id.clone();
            let terminated = agent.terminate_at.map_or(false, |t| cycle >= t);
            let truncated = agent.truncate_at.map_or(false, |t| cycle >= t);
            obs.insert(id.clone(), agent.observation_space.sample(&mut self.rng));
            rewards.insert(id.clone(), agent.reward);
            terminations.insert(id.clone(), terminated);
            truncations.insert(id.clone(), truncated);
            infos.insert(id, ScriptedInfo { cycle });
        }

        let step = Step::new(obs, rewards, terminations, truncations, infos);
        let finished: Vec<String> = step
            .terminations
            .keys()
            .filter(|id| step.is_finished(*id))
            .cloned()
            .collect();
        for id in finished.iter() {
            trace!("Agent {} leaves at cycle {}", id, cycle);
            self.active.remove(id);
        }

        let mut record = Record::from_scalar("cycle", cycle as f32);
        record.insert(
            "finished_agents",
            RecordValue::String(finished.join(",")),
        );

        Ok((step, record))
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            trace!("ScriptedEnv::close()");
            self.closed = true;
            self.active.clear();
        }
        Ok(())
    }
}
