//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Trait methods return [`anyhow::Result`]; use `downcast_ref::<HarvestError>()`
/// to inspect the variant.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The environment could not be constructed.
    #[error("Failed to build environment: {0}")]
    EnvBuild(String),

    /// The agent is not part of the environment's roster.
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// An action was given for an agent that already left the episode.
    #[error("Agent {0} is not active")]
    InactiveAgent(String),

    /// An action is outside the agent's action space.
    #[error("Action {action} of agent {agent} is not contained in {space}")]
    InvalidAction {
        /// Agent the action was given for.
        agent: String,
        /// The offending action.
        action: String,
        /// Description of the action space.
        space: String,
    },

    /// An active agent has no entry in the action mapping.
    #[error("No action given for active agent {0}")]
    MissingAction(String),

    /// `step` was called with no actions while agents remain active.
    #[error("Empty action mapping while {0} agent(s) remain active")]
    EmptyActions(usize),

    /// A space definition is malformed.
    #[error("Invalid space: {0}")]
    InvalidSpace(String),

    /// The step cap of an episode must be positive.
    #[error("max_steps must be positive")]
    InvalidMaxSteps,

    /// The environment was used after [`close`](crate::ParallelEnv::close).
    #[error("Environment is closed")]
    Closed,
}
