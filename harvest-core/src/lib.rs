#![warn(missing_docs)]
//! Core components for running multi-agent episodes.
//!
//! The main entities of the library are a multi-agent environment
//! ([`ParallelEnv`]), a per-agent [`Policy`] and the episode driver
//! ([`driver::EpisodeDriver`]), which lets every live agent act through the
//! policy until the episode ends.
//!
//! ```rust
//! use harvest_core::{
//!     driver::{run_episode, EpisodeEnd},
//!     scripted::{ScriptedAgentConfig, ScriptedEnv, ScriptedEnvConfig},
//!     ParallelEnv, RandomPolicy,
//! };
//!
//! let config = ScriptedEnvConfig::default()
//!     .agent(ScriptedAgentConfig::new("player_0").reward(1.0).terminate_at(5))
//!     .agent(ScriptedAgentConfig::new("player_1").terminate_at(5));
//! let mut env = ScriptedEnv::build(&config, 42).unwrap();
//! let mut policy = RandomPolicy::new(42);
//!
//! let episode = run_episode(&mut env, &mut policy, 100).unwrap();
//! assert_eq!(episode.steps, 5);
//! assert_eq!(episode.end, EpisodeEnd::Terminated);
//! assert_eq!(episode.total_rewards["player_0"], 5.0);
//! ```
pub mod driver;
pub mod error;
pub mod inspect;
pub mod record;
pub mod scripted;
pub mod space;

mod base;
pub use base::{AgentMap, Info, ParallelEnv, Policy, RandomPolicy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod max_cycles;
pub use max_cycles::{MaxCycles, MaxCyclesConfig};
