//! Describes the spaces of an environment.
//!
//! [`inspect`] collects the action and observation spaces of every agent that
//! may take part in an episode. Components of dictionary spaces named
//! [`INTERACTION_KEY`] are reported as potential interaction actions, e.g., the
//! zapping beam of Melting Pot substrates.
use crate::{
    space::{fmt_shape, Space, SpaceSummary},
    ParallelEnv,
};
use anyhow::Result;
use std::fmt::{self, Display, Write};

/// Name of the dictionary component that usually carries interaction actions.
pub const INTERACTION_KEY: &str = "global_interaction";

/// Description of a space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceReport {
    /// One-line description, e.g., `Discrete(8)`.
    pub description: String,

    /// Structure of the space.
    pub summary: SpaceSummary,
}

impl SpaceReport {
    fn new<S: Space + Display>(space: &S) -> Self {
        Self {
            description: space.to_string(),
            summary: space.summary(),
        }
    }

    /// Paths of the components named [`INTERACTION_KEY`], e.g., `beam.global_interaction`.
    pub fn interaction_keys(&self) -> Vec<String> {
        let mut keys = vec![];
        collect_interaction_keys(&self.summary, "", &mut keys);
        keys
    }
}

fn collect_interaction_keys(summary: &SpaceSummary, prefix: &str, keys: &mut Vec<String>) {
    if let SpaceSummary::Dict(items) = summary {
        for (name, sub) in items.iter() {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            if name == INTERACTION_KEY {
                keys.push(path.clone());
            }
            collect_interaction_keys(sub, &path, keys);
        }
    }
}

/// Spaces of an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReport {
    /// The agent.
    pub agent: String,

    /// Action space.
    pub action_space: SpaceReport,

    /// Observation space.
    pub observation_space: SpaceReport,
}

/// Spaces of every possible agent of an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvReport {
    /// Reports in the order of [`ParallelEnv::possible_agents`].
    pub agents: Vec<AgentReport>,
}

impl EnvReport {
    /// `(agent, path)` of every action component named [`INTERACTION_KEY`].
    pub fn interaction_actions(&self) -> Vec<(String, String)> {
        self.agents
            .iter()
            .flat_map(|a| {
                a.action_space
                    .interaction_keys()
                    .into_iter()
                    .map(move |k| (a.agent.clone(), k))
            })
            .collect()
    }
}

/// Collects the spaces of every possible agent of `env`.
pub fn inspect<E: ParallelEnv>(env: &E) -> Result<EnvReport> {
    let agents = env
        .possible_agents()
        .iter()
        .map(|agent| -> Result<AgentReport> {
            Ok(AgentReport {
                agent: agent.to_string(),
                action_space: SpaceReport::new(env.action_space(agent)?),
                observation_space: SpaceReport::new(env.observation_space(agent)?),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(EnvReport { agents })
}

fn write_summary(out: &mut String, summary: &SpaceSummary, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match summary {
        SpaceSummary::Discrete { n, start } => {
            writeln!(out, "{}Discrete: {} values starting at {}", indent, n, start)
        }
        SpaceSummary::Box { shape, low, high } => {
            let low = low.iter().cloned().fold(f32::INFINITY, f32::min);
            let high = high.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            writeln!(
                out,
                "{}Box: shape {}, range [{}, {}]",
                indent,
                fmt_shape(shape),
                low,
                high
            )
        }
        SpaceSummary::MultiDiscrete { nvec } => {
            writeln!(out, "{}MultiDiscrete: {} components {:?}", indent, nvec.len(), nvec)
        }
        SpaceSummary::Dict(items) => {
            writeln!(out, "{}Dict: {} components", indent, items.len())?;
            for (name, sub) in items.iter() {
                writeln!(out, "{}  Key '{}'", indent, name)?;
                write_summary(out, sub, depth + 2)?;
                if name == INTERACTION_KEY {
                    writeln!(out, "{}    *** Potential interaction (beam) action ***", indent)?;
                }
            }
            Ok(())
        }
    }
}

impl Display for EnvReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for a in self.agents.iter() {
            writeln!(out, "Agent {}", a.agent)?;
            writeln!(out, "  Action space: {}", a.action_space.description)?;
            write_summary(&mut out, &a.action_space.summary, 2)?;
            writeln!(out, "  Observation space: {}", a.observation_space.description)?;
            write_summary(&mut out, &a.observation_space.summary, 2)?;
        }
        write!(f, "{}", out.trim_end())
    }
}
