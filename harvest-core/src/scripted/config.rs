//! Configuration of [`ScriptedEnv`](super::ScriptedEnv).
use crate::{
    error::HarvestError,
    space::{AnySpace, BoxSpace, Discrete},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Script of a single agent.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ScriptedAgentConfig {
    /// Identifier of the agent.
    pub id: String,

    /// Action space.
    pub action_space: AnySpace,

    /// Observation space. Observations are random elements of it.
    pub observation_space: AnySpace,

    /// Reward given at every step in which the agent acts.
    #[serde(default)]
    pub reward: f32,

    /// Step (1-based) at which the agent terminates.
    #[serde(default)]
    pub terminate_at: Option<usize>,

    /// Step (1-based) at which the agent is truncated.
    #[serde(default)]
    pub truncate_at: Option<usize>,
}

impl ScriptedAgentConfig {
    /// An agent with 8 discrete actions and a scalar observation in `[0, 1]`,
    /// rewarded with zero and never finishing.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action_space: AnySpace::Discrete(Discrete { n: 8, start: 0 }),
            observation_space: AnySpace::Box(BoxSpace {
                low: vec![0.0],
                high: vec![1.0],
                shape: vec![1],
            }),
            reward: 0.0,
            terminate_at: None,
            truncate_at: None,
        }
    }

    /// Sets the action space.
    pub fn action_space(mut self, v: impl Into<AnySpace>) -> Self {
        self.action_space = v.into();
        self
    }

    /// Sets the observation space.
    pub fn observation_space(mut self, v: impl Into<AnySpace>) -> Self {
        self.observation_space = v.into();
        self
    }

    /// Sets the reward per step.
    pub fn reward(mut self, v: f32) -> Self {
        self.reward = v;
        self
    }

    /// Sets the step at which the agent terminates.
    pub fn terminate_at(mut self, v: usize) -> Self {
        self.terminate_at = Some(v);
        self
    }

    /// Sets the step at which the agent is truncated.
    pub fn truncate_at(mut self, v: usize) -> Self {
        self.truncate_at = Some(v);
        self
    }
}

/// Configuration of [`ScriptedEnv`](super::ScriptedEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ScriptedEnvConfig {
    /// Name reported in logs, e.g., the substrate being imitated.
    pub name: String,

    /// Roster of the environment, in the order of `possible_agents()`.
    pub agents: Vec<ScriptedAgentConfig>,
}

impl Default for ScriptedEnvConfig {
    fn default() -> Self {
        Self {
            name: "scripted".to_string(),
            agents: vec![],
        }
    }
}

impl ScriptedEnvConfig {
    /// Sets the name.
    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.name = v.into();
        self
    }

    /// Appends an agent to the roster.
    pub fn agent(mut self, v: ScriptedAgentConfig) -> Self {
        self.agents.push(v);
        self
    }

    /// Checks the roster and every space.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.agents.is_empty() {
            return Err(HarvestError::EnvBuild(format!(
                "{}: the roster is empty",
                self.name
            )));
        }
        let mut ids = BTreeSet::new();
        for agent in self.agents.iter() {
            if !ids.insert(agent.id.as_str()) {
                return Err(HarvestError::EnvBuild(format!(
                    "{}: duplicated agent {}",
                    self.name, agent.id
                )));
            }
            for space in [&agent.action_space, &agent.observation_space] {
                space.validate().map_err(|e| {
                    HarvestError::EnvBuild(format!("{}: agent {}: {}", self.name, agent.id, e))
                })?;
            }
        }
        Ok(())
    }

    /// Constructs [`ScriptedEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ScriptedEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn parses_yaml_with_defaults() -> Result<()> {
        let yaml = r#"
name: allelopathic_harvest__open
agents:
  - id: player_0
    action_space: {type: discrete, n: 8}
    observation_space: {type: box, low: [0.0], high: [1.0], shape: [1]}
    reward: 1.0
    terminate_at: 5
  - id: player_1
    action_space: {type: multi_discrete, nvec: [3, 2]}
    observation_space: {type: discrete, n: 4}
"#;
        let config: ScriptedEnvConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].terminate_at, Some(5));
        assert_eq!(config.agents[1].reward, 0.0);
        assert_eq!(config.agents[1].truncate_at, None);
        Ok(())
    }

    #[test]
    fn save_and_load() -> Result<()> {
        let config = ScriptedEnvConfig::default()
            .name("two_players")
            .agent(ScriptedAgentConfig::new("a").reward(0.5).terminate_at(2))
            .agent(ScriptedAgentConfig::new("b").truncate_at(4));
        let dir = TempDir::new("scripted_env_config")?;
        let path = dir.path().join("env.yaml");
        config.save(&path)?;
        assert_eq!(ScriptedEnvConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_duplicated_rosters() {
        assert!(ScriptedEnvConfig::default().validate().is_err());

        let config = ScriptedEnvConfig::default()
            .agent(ScriptedAgentConfig::new("a"))
            .agent(ScriptedAgentConfig::new("a"));
        assert!(matches!(
            config.validate(),
            Err(HarvestError::EnvBuild(msg)) if msg.contains("duplicated")
        ));
    }

    #[test]
    fn rejects_invalid_spaces() {
        let config = ScriptedEnvConfig::default().agent(
            ScriptedAgentConfig::new("a").action_space(Discrete { n: 0, start: 0 }),
        );
        assert!(config.validate().is_err());
    }
}
