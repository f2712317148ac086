//! Runs a single episode of a [`ParallelEnv`] with a [`Policy`].
//!
//! An episode goes as follows:
//!
//! 1. Reset the environment. Every agent present at reset, i.e., with an
//!    initial observation or in [`ParallelEnv::agents`], starts with a
//!    cumulative reward of zero.
//! 2. Query the live agents. The episode ends if none is left or `max_steps`
//!    steps were executed.
//! 3. Ask the policy for an action of every live agent, given its latest
//!    observation and its action space, and apply them in one
//!    [`ParallelEnv::step`] call.
//! 4. Add the returned rewards of the agents that acted to their totals.
//! 5. The episode ends if every agent that acted is terminated, or every one
//!    is truncated. An agent absent from the returned flags counts as finished
//!    when it is no longer live.
//! 6. Back to 2.
//!
//! The environment is closed on every exit path. Errors of the environment are
//! propagated as they are; the driver neither validates actions nor retries.
mod config;
pub use config::DriverConfig;

use crate::{
    error::HarvestError,
    record::{NullRecorder, Record, RecordValue, Recorder},
    AgentMap, ParallelEnv, Policy,
};
use anyhow::Result;
use chrono::Local;
use log::{debug, info, warn};
use std::fmt::{self, Display};

/// Reason an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Every agent that acted in the last step was terminated.
    Terminated,

    /// Every agent that acted in the last step was truncated.
    Truncated,

    /// No live agent was left without an all-terminated or all-truncated step.
    AgentsExhausted,

    /// The episode reached the maximum number of steps.
    StepLimit,
}

impl Display for EpisodeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Terminated => "terminated",
            Self::Truncated => "truncated",
            Self::AgentsExhausted => "agents exhausted",
            Self::StepLimit => "step limit",
        };
        write!(f, "{}", s)
    }
}

/// Result of an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode<A: Ord> {
    /// Cumulative reward of every agent that took part in the episode.
    pub total_rewards: AgentMap<A, f32>,

    /// Number of environment steps executed.
    pub steps: usize,

    /// Why the episode ended.
    pub end: EpisodeEnd,
}

impl<A: Ord> Episode<A> {
    /// Sum of the cumulative rewards over agents.
    pub fn total_reward(&self) -> f32 {
        self.total_rewards.values().sum()
    }
}

/// Runs episodes as configured by [`DriverConfig`].
#[derive(Debug, Clone)]
pub struct EpisodeDriver {
    config: DriverConfig,
}

impl EpisodeDriver {
    /// Constructs the driver.
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Runs an episode and closes `env`.
    pub fn run<E, P>(&self, env: &mut E, policy: &mut P) -> Result<Episode<E::AgentId>>
    where
        E: ParallelEnv,
        P: Policy<E>,
    {
        self.run_with_recorder(env, policy, &mut NullRecorder::new())
    }

    /// Runs an episode, writes a record per step to `recorder` and closes `env`.
    ///
    /// Each record has the step index `step`, the reward of every agent that
    /// acted as `reward/<agent>`, the number of live agents after the step as
    /// `active_agents`, the wall-clock time as `time`, and the record returned
    /// by the environment.
    pub fn run_with_recorder<E, P, R>(
        &self,
        env: &mut E,
        policy: &mut P,
        recorder: &mut R,
    ) -> Result<Episode<E::AgentId>>
    where
        E: ParallelEnv,
        P: Policy<E>,
        R: Recorder + ?Sized,
    {
        let result = self.episode(env, policy, recorder);
        let closed = env.close();

        match (result, closed) {
            (Ok(episode), Ok(())) => {
                info!(
                    "Episode ended ({}) after {} steps, total rewards: {}",
                    episode.end,
                    episode.steps,
                    fmt_rewards(&episode.total_rewards)
                );
                Ok(episode)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(e_close)) => {
                warn!("Failed to close the environment: {}", e_close);
                Err(e)
            }
        }
    }

    fn episode<E, P, R>(
        &self,
        env: &mut E,
        policy: &mut P,
        recorder: &mut R,
    ) -> Result<Episode<E::AgentId>>
    where
        E: ParallelEnv,
        P: Policy<E>,
        R: Recorder + ?Sized,
    {
        let max_steps = self.config.max_steps;
        if max_steps == 0 {
            return Err(HarvestError::InvalidMaxSteps.into());
        }

        let mut obs = env.reset()?;
        let mut total_rewards: AgentMap<E::AgentId, f32> = obs
            .keys()
            .cloned()
            .chain(env.agents())
            .map(|agent| (agent, 0.0))
            .collect();
        let mut steps = 0;

        let end = loop {
            let agents = env.agents();
            if agents.is_empty() {
                break EpisodeEnd::AgentsExhausted;
            }
            if steps >= max_steps {
                break EpisodeEnd::StepLimit;
            }

            let mut actions = AgentMap::new();
            for agent in agents.into_iter() {
                let act = policy.sample(&agent, obs.get(&agent), env.action_space(&agent)?);
                actions.insert(agent, act);
            }
            debug!("Step {}: actions {:?}", steps + 1, actions);

            let (step, env_record) = env.step(&actions)?;
            steps += 1;

            let mut record = Record::from_scalar("step", steps as f32);
            for (agent, r) in step.rewards.iter() {
                if actions.contains_key(agent) {
                    *total_rewards.entry(agent.clone()).or_insert(0.0) += *r;
                    record.insert(format!("reward/{}", agent), RecordValue::Scalar(*r));
                } else {
                    warn!("Ignore reward {} of agent {}, which did not act", r, agent);
                }
            }

            let active = env.agents();
            record.insert("active_agents", RecordValue::Scalar(active.len() as f32));
            record.insert("time", RecordValue::DateTime(Local::now()));
            recorder.write(env_record.merge(record));

            let log_interval = self.config.log_interval;
            if log_interval > 0 && steps % log_interval == 0 {
                info!(
                    "Step {}: {} active agents, total rewards: {}",
                    steps,
                    active.len(),
                    fmt_rewards(&total_rewards)
                );
            }

            // Missing flags fall back to the live set.
            let all_finished = |flags: &AgentMap<E::AgentId, bool>| {
                actions.keys().all(|agent| match flags.get(agent) {
                    Some(flag) => *flag,
                    None => !active.contains(agent),
                })
            };
            let terminated = all_finished(&step.terminations);
            let truncated = all_finished(&step.truncations);

            obs.extend(step.obs);

            if terminated {
                break EpisodeEnd::Terminated;
            }
            if truncated {
                break EpisodeEnd::Truncated;
            }
        };

        Ok(Episode {
            total_rewards,
            steps,
            end,
        })
    }
}

/// Runs an episode of at most `max_steps` steps and closes `env`.
///
/// See the [module documentation](self) for the procedure.
pub fn run_episode<E, P>(env: &mut E, policy: &mut P, max_steps: usize) -> Result<Episode<E::AgentId>>
where
    E: ParallelEnv,
    P: Policy<E>,
{
    EpisodeDriver::new(DriverConfig::default().max_steps(max_steps)).run(env, policy)
}

/// Same as [`run_episode`], writing a record per step to `recorder`.
pub fn run_episode_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    max_steps: usize,
    recorder: &mut R,
) -> Result<Episode<E::AgentId>>
where
    E: ParallelEnv,
    P: Policy<E>,
    R: Recorder + ?Sized,
{
    EpisodeDriver::new(DriverConfig::default().max_steps(max_steps))
        .run_with_recorder(env, policy, recorder)
}

fn fmt_rewards<A: Display>(rewards: &AgentMap<A, f32>) -> String {
    rewards
        .iter()
        .map(|(agent, r)| format!("{}={}", agent, r))
        .collect::<Vec<_>>()
        .join(", ")
}
