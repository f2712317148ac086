//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return and length across all episodes.

use super::Evaluator;
use crate::{
    driver::{DriverConfig, Episode, EpisodeDriver},
    record::{Record, RecordValue},
    ParallelEnv, Policy,
};
use anyhow::{ensure, Result};
use log::info;

/// A default implementation of the [`Evaluator`] trait.
///
/// The environment is closed at the end of every episode, so a fresh one is
/// built from the configuration for each of them. The `ix`-th episode uses the
/// seed `seed + ix`.
///
/// # Examples
///
/// ```ignore
/// let config = ScriptedEnvConfig::load("env.yaml")?;
/// let mut evaluator =
///     DefaultEvaluator::<ScriptedEnv>::new(&config, 42, 10, DriverConfig::default())?;
///
/// let record = evaluator.evaluate(&mut RandomPolicy::new(42))?;
/// println!("Average return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: ParallelEnv> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// Configuration of the environment built for every episode.
    env_config: E::Config,

    /// Base random seed.
    seed: i64,

    driver: EpisodeDriver,
}

impl<E: ParallelEnv> Evaluator<E> for DefaultEvaluator<E> {
    /// Runs the episodes and returns a record with the mean over episodes of
    /// the summed reward of all agents as `"Episode return"` and the mean number
    /// of steps as `"Episode length"`.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let episodes = self.run_episodes(policy)?;
        let n = episodes.len() as f32;
        let r_total: f32 = episodes.iter().map(|e| e.total_reward()).sum();
        let steps_total: usize = episodes.iter().map(|e| e.steps).sum();

        let mut record = Record::from_scalar("Episode return", r_total / n);
        record.insert("Episode length", RecordValue::Scalar(steps_total as f32 / n));
        Ok(record)
    }
}

impl<E: ParallelEnv> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation, positive
    /// * `driver_config` - Step cap and logging of each episode
    pub fn new(
        config: &E::Config,
        seed: i64,
        n_episodes: usize,
        driver_config: DriverConfig,
    ) -> Result<Self> {
        ensure!(n_episodes > 0, "n_episodes must be positive");
        Ok(Self {
            n_episodes,
            env_config: config.clone(),
            seed,
            driver: EpisodeDriver::new(driver_config),
        })
    }

    /// Runs the episodes and returns each of them.
    pub fn run_episodes<P>(&mut self, policy: &mut P) -> Result<Vec<Episode<E::AgentId>>>
    where
        P: Policy<E>,
    {
        (0..self.n_episodes)
            .map(|ix| {
                info!("Episode {}/{}", ix + 1, self.n_episodes);
                let mut env = E::build(&self.env_config, self.seed + ix as i64)?;
                self.driver.run(&mut env, policy)
            })
            .collect()
    }
}
