//! Policy.
use super::ParallelEnv;
use crate::space::Space;
use rand::{rngs::SmallRng, SeedableRng};

/// Chooses the action of a single agent.
///
/// The episode driver calls [`Policy::sample`] once per live agent and step.
/// The returned action must be an element of `space`; the driver does not check
/// it and leaves rejection to the environment.
pub trait Policy<E: ParallelEnv> {
    /// Samples an action of `agent`.
    ///
    /// `obs` is the latest observation of the agent, if the environment
    /// returned one.
    fn sample(&mut self, agent: &E::AgentId, obs: Option<&E::Obs>, space: &E::ActSpace) -> E::Act;
}

/// Uniformly random actions drawn from each agent's action space.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    /// Constructs the policy with a seeded random number generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<E: ParallelEnv> Policy<E> for RandomPolicy {
    fn sample(&mut self, _agent: &E::AgentId, _obs: Option<&E::Obs>, space: &E::ActSpace) -> E::Act {
        space.sample(&mut self.rng)
    }
}
