use anyhow::Result;
use harvest_core::{
    driver::{run_episode, run_episode_with_recorder, EpisodeEnd},
    error::HarvestError,
    record::BufferedRecorder,
    scripted::{ScriptedAgentConfig, ScriptedEnv, ScriptedEnvConfig},
    space::{AnySpace, Discrete, MultiDiscrete, SpaceValue},
    MaxCycles, ParallelEnv, Policy, RandomPolicy,
};
use test_log::test;

/// Random actions, remembering which agent each of them was drawn for.
struct RecordingPolicy {
    inner: RandomPolicy,
    sampled: Vec<String>,
}

impl RecordingPolicy {
    fn new() -> Self {
        Self {
            inner: RandomPolicy::new(0),
            sampled: vec![],
        }
    }
}

impl Policy<ScriptedEnv> for RecordingPolicy {
    fn sample(&mut self, agent: &String, obs: Option<&SpaceValue>, space: &AnySpace) -> SpaceValue {
        self.sampled.push(agent.clone());
        Policy::<ScriptedEnv>::sample(&mut self.inner, agent, obs, space)
    }
}

/// Always returns the same action, whatever the space.
struct ConstantPolicy(SpaceValue);

impl Policy<ScriptedEnv> for ConstantPolicy {
    fn sample(&mut self, _agent: &String, _obs: Option<&SpaceValue>, _space: &AnySpace) -> SpaceValue {
        self.0.clone()
    }
}

fn two_agents(a: ScriptedAgentConfig, b: ScriptedAgentConfig) -> Result<ScriptedEnv> {
    let config = ScriptedEnvConfig::default().agent(a).agent(b);
    ScriptedEnv::build(&config, 42)
}

#[test]
fn agents_terminating_together_end_the_episode() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").reward(1.0).terminate_at(5),
        ScriptedAgentConfig::new("b").reward(-0.5).terminate_at(5),
    )?;
    let episode = run_episode(&mut env, &mut RandomPolicy::new(42), 100)?;

    assert_eq!(episode.steps, 5);
    assert_eq!(episode.end, EpisodeEnd::Terminated);
    assert_eq!(episode.total_rewards["a"], 5.0);
    assert_eq!(episode.total_rewards["b"], -2.5);
    assert!(env.is_closed());
    Ok(())
}

#[test]
fn never_ending_agents_stop_at_max_steps() -> Result<()> {
    let mut env = two_agents(ScriptedAgentConfig::new("a"), ScriptedAgentConfig::new("b"))?;
    let episode = run_episode(&mut env, &mut RandomPolicy::new(42), 3)?;

    assert_eq!(episode.steps, 3);
    assert_eq!(episode.end, EpisodeEnd::StepLimit);
    assert!(env.is_closed());
    Ok(())
}

#[test]
fn finished_agents_are_not_asked_for_actions() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").reward(1.0).terminate_at(2),
        ScriptedAgentConfig::new("b").reward(2.0).terminate_at(4),
    )?;
    let mut policy = RecordingPolicy::new();
    let episode = run_episode(&mut env, &mut policy, 100)?;

    assert_eq!(episode.steps, 4);
    assert_eq!(episode.end, EpisodeEnd::Terminated);
    assert_eq!(policy.sampled, vec!["a", "b", "a", "b", "b", "b"]);

    // No reward after leaving the episode.
    assert_eq!(episode.total_rewards["a"], 2.0);
    assert_eq!(episode.total_rewards["b"], 8.0);
    Ok(())
}

#[test]
fn truncation_ends_the_episode() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").truncate_at(3),
        ScriptedAgentConfig::new("b").truncate_at(3),
    )?;
    let episode = run_episode(&mut env, &mut RandomPolicy::new(42), 100)?;

    assert_eq!(episode.steps, 3);
    assert_eq!(episode.end, EpisodeEnd::Truncated);
    Ok(())
}

#[test]
fn mixed_endings_exhaust_the_agents() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").terminate_at(2),
        ScriptedAgentConfig::new("b").truncate_at(2),
    )?;
    let episode = run_episode(&mut env, &mut RandomPolicy::new(42), 100)?;

    assert_eq!(episode.steps, 2);
    assert_eq!(episode.end, EpisodeEnd::AgentsExhausted);
    Ok(())
}

#[test]
fn invalid_action_fails_and_closes() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").action_space(Discrete::new(3)?),
        ScriptedAgentConfig::new("b").action_space(Discrete::new(3)?),
    )?;
    let err = run_episode(&mut env, &mut ConstantPolicy(SpaceValue::Discrete(3)), 10)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<HarvestError>(),
        Some(HarvestError::InvalidAction { agent, .. }) if agent == "a"
    ));
    assert!(env.is_closed());
    Ok(())
}

#[test]
fn action_of_the_wrong_kind_fails() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").action_space(MultiDiscrete::new(vec![3, 2])?),
        ScriptedAgentConfig::new("b"),
    )?;
    let err = run_episode(&mut env, &mut ConstantPolicy(SpaceValue::Discrete(0)), 10)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<HarvestError>(),
        Some(HarvestError::InvalidAction { .. })
    ));
    Ok(())
}

#[test]
fn max_cycles_truncates_the_episode() -> Result<()> {
    let inner = two_agents(
        ScriptedAgentConfig::new("a").reward(1.0),
        ScriptedAgentConfig::new("b").reward(1.0),
    )?;
    let mut env = MaxCycles::new(inner, 7)?;
    let episode = run_episode(&mut env, &mut RandomPolicy::new(42), 100)?;

    assert_eq!(episode.steps, 7);
    assert_eq!(episode.end, EpisodeEnd::Truncated);
    assert_eq!(episode.total_reward(), 14.0);
    Ok(())
}

#[test]
fn empty_action_mapping_is_rejected() -> Result<()> {
    let mut env = two_agents(ScriptedAgentConfig::new("a"), ScriptedAgentConfig::new("b"))?;
    env.reset()?;
    let err = env.step(&Default::default()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<HarvestError>(),
        Some(HarvestError::EmptyActions(2))
    ));
    Ok(())
}

#[test]
fn close_twice_after_an_episode() -> Result<()> {
    let mut env = two_agents(
        ScriptedAgentConfig::new("a").terminate_at(1),
        ScriptedAgentConfig::new("b").terminate_at(1),
    )?;
    run_episode(&mut env, &mut RandomPolicy::new(42), 10)?;
    env.close()?;
    env.close()?;
    Ok(())
}

#[test]
fn steps_never_exceed_max_steps() -> Result<()> {
    for max_steps in 1..8 {
        let mut env = two_agents(
            ScriptedAgentConfig::new("a").terminate_at(3),
            ScriptedAgentConfig::new("b").truncate_at(5),
        )?;
        let mut recorder = BufferedRecorder::new();
        let episode =
            run_episode_with_recorder(&mut env, &mut RandomPolicy::new(42), max_steps, &mut recorder)?;

        assert!(episode.steps <= max_steps);
        assert_eq!(recorder.len(), episode.steps);
        assert_eq!(episode.steps, max_steps.min(5));

        // The live set seen by the driver after its last step.
        let last = recorder.iter().last().unwrap();
        let active = last.get_scalar("active_agents")?;
        if max_steps < 5 {
            assert_eq!(episode.end, EpisodeEnd::StepLimit);
            assert_eq!(active, if max_steps < 3 { 2.0 } else { 1.0 });
        } else {
            assert_eq!(episode.end, EpisodeEnd::Truncated);
            assert_eq!(active, 0.0);
        }
    }
    Ok(())
}
