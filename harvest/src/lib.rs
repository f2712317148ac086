//! Command line tools for multi-agent environments.
//!
//! * `harvest inspect` prints the action and observation spaces of every agent.
//! * `harvest rollout` runs episodes with random actions and prints the
//!   cumulative reward of every agent.
//!
//! Environments are described by a [`ScriptedEnvConfig`] in YAML.
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use harvest_core::{
    driver::{DriverConfig, Episode},
    inspect::inspect,
    scripted::{ScriptedEnv, ScriptedEnvConfig},
    DefaultEvaluator, MaxCycles, MaxCyclesConfig, ParallelEnv, RandomPolicy,
};
use log::info;
use serde::Serialize;
use std::{fmt::Display, fs::File, path::PathBuf};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(version, about = "Run and inspect multi-agent environments", long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the spaces of every agent
    Inspect {
        /// Environment configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Run episodes with random actions
    Rollout(RolloutArgs),
}

/// Arguments of `harvest rollout`.
#[derive(Args, Debug)]
pub struct RolloutArgs {
    /// Environment configuration (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Driver configuration (YAML)
    #[arg(short, long)]
    pub driver: Option<PathBuf>,

    /// Maximum number of steps per episode, overrides the driver configuration
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Random seed, overrides the driver configuration
    #[arg(long)]
    pub seed: Option<i64>,

    /// Truncate every agent after this number of steps
    #[arg(long)]
    pub max_cycles: Option<usize>,

    /// Number of episodes
    #[arg(short, long, default_value_t = 1)]
    pub episodes: usize,

    /// Write the cumulative reward of every agent and episode to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// A row of the CSV output.
#[derive(Debug, Serialize, PartialEq)]
struct EpisodeRow {
    episode: usize,
    agent: String,
    total_reward: f32,
    steps: usize,
    end: String,
}

fn rows<A: Ord + Display>(episodes: &[Episode<A>]) -> Vec<EpisodeRow> {
    episodes
        .iter()
        .enumerate()
        .flat_map(|(ix, e)| {
            e.total_rewards.iter().map(move |(agent, r)| EpisodeRow {
                episode: ix,
                agent: agent.to_string(),
                total_reward: *r,
                steps: e.steps,
                end: e.end.to_string(),
            })
        })
        .collect()
}

/// Runs the command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect { config } => run_inspect(&ScriptedEnvConfig::load(config)?),
        Command::Rollout(args) => run_rollout(&args),
    }
}

fn run_inspect(config: &ScriptedEnvConfig) -> Result<()> {
    let mut env = ScriptedEnv::build(config, 0)?;
    let report = inspect(&env);
    env.close()?;
    println!("{}", report?);
    Ok(())
}

fn driver_config(args: &RolloutArgs) -> Result<DriverConfig> {
    let mut config = match &args.driver {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };
    if let Some(v) = args.max_steps {
        config = config.max_steps(v);
    }
    if let Some(v) = args.seed {
        config = config.seed(v);
    }
    Ok(config)
}

fn rollout<E: ParallelEnv>(
    env_config: &E::Config,
    driver_config: DriverConfig,
    n_episodes: usize,
) -> Result<Vec<Episode<E::AgentId>>> {
    let seed = driver_config.seed;
    let mut policy = RandomPolicy::new(seed as u64);
    let mut evaluator = DefaultEvaluator::<E>::new(env_config, seed, n_episodes, driver_config)?;
    evaluator.run_episodes(&mut policy)
}

fn run_rollout(args: &RolloutArgs) -> Result<()> {
    let env_config = ScriptedEnvConfig::load(&args.config)?;
    let driver_config = driver_config(args)?;
    info!("Driver configuration: {:?}", driver_config);

    let episodes = match args.max_cycles {
        Some(max_cycles) => rollout::<MaxCycles<ScriptedEnv>>(
            &MaxCyclesConfig::new(env_config, max_cycles),
            driver_config,
            args.episodes,
        )?,
        None => rollout::<ScriptedEnv>(&env_config, driver_config, args.episodes)?,
    };

    for (ix, episode) in episodes.iter().enumerate() {
        println!("Episode {}: {} steps ({})", ix, episode.steps, episode.end);
        for (agent, r) in episode.total_rewards.iter() {
            println!("  {}: {}", agent, r);
        }
    }

    if let Some(path) = &args.csv {
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        for row in rows(&episodes) {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        info!("Saved episode returns in {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::scripted::ScriptedAgentConfig;
    use std::{ffi::OsString, fs};
    use tempdir::TempDir;

    fn save_env_config(dir: &TempDir) -> Result<PathBuf> {
        let path = dir.path().join("env.yaml");
        ScriptedEnvConfig::default()
            .agent(ScriptedAgentConfig::new("player_0").reward(1.0).terminate_at(5))
            .agent(ScriptedAgentConfig::new("player_1").reward(0.5).terminate_at(5))
            .save(&path)?;
        Ok(path)
    }

    #[test]
    fn parses_rollout_arguments() -> Result<()> {
        let cli = Cli::try_parse_from([
            "harvest",
            "rollout",
            "--config",
            "env.yaml",
            "--max-steps",
            "10",
            "--max-cycles",
            "4",
            "--episodes",
            "2",
        ])?;
        match cli.command {
            Command::Rollout(args) => {
                assert_eq!(args.max_steps, Some(10));
                assert_eq!(args.max_cycles, Some(4));
                assert_eq!(args.episodes, 2);
                assert_eq!(args.seed, None);
                let config = driver_config(&args)?;
                assert_eq!(config, DriverConfig::default().max_steps(10));
            }
            _ => panic!("expected rollout"),
        }
        Ok(())
    }

    #[test]
    fn rollout_writes_csv() -> Result<()> {
        let dir = TempDir::new("harvest_rollout")?;
        let config = save_env_config(&dir)?;
        let csv = dir.path().join("returns.csv");
        let args: Vec<OsString> = vec![
            "harvest".into(),
            "rollout".into(),
            "--config".into(),
            config.into_os_string(),
            "--episodes".into(),
            "2".into(),
            "--csv".into(),
            csv.clone().into_os_string(),
        ];
        run(Cli::try_parse_from(args)?)?;

        let text = fs::read_to_string(&csv)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "episode,agent,total_reward,steps,end");
        assert_eq!(lines[1], "0,player_0,5.0,5,terminated");
        assert_eq!(lines[2], "0,player_1,2.5,5,terminated");
        assert_eq!(lines.len(), 5);
        Ok(())
    }

    #[test]
    fn rollout_with_max_cycles() -> Result<()> {
        let dir = TempDir::new("harvest_max_cycles")?;
        let config = ScriptedEnvConfig::load(save_env_config(&dir)?)?;
        let episodes = rollout::<MaxCycles<ScriptedEnv>>(
            &MaxCyclesConfig::new(config, 3),
            DriverConfig::default(),
            1,
        )?;
        let rows = rows(&episodes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].steps, 3);
        assert_eq!(rows[0].end, "truncated");
        assert_eq!(rows[1].total_reward, 1.5);
        Ok(())
    }

    #[test]
    fn inspects_a_config() -> Result<()> {
        let dir = TempDir::new("harvest_inspect")?;
        let config = save_env_config(&dir)?;
        let args: Vec<OsString> = vec![
            "harvest".into(),
            "inspect".into(),
            "--config".into(),
            config.into_os_string(),
        ];
        run(Cli::try_parse_from(args)?)
    }
}
