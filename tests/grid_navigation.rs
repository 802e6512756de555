//! End-to-end training on a parsed grid map.

mod common;

use gridnav_rl::{
    ACTION_LABELS, Action, Learner, MonteCarloConfig, MonteCarloLearner, PolicyCodec,
    QLearningConfig, QLearningLearner, SarsaConfig, SarsaLearner,
    learning::{Exploration, StateSampling, VisitMode},
};

fn assert_valid_labels(labels: &[String], states: usize) {
    assert_eq!(labels.len(), states);
    assert!(labels.iter().all(|l| ACTION_LABELS.contains(&l.as_str())));
}

#[test]
fn q_learning_moves_into_goal_from_neighbours() {
    let problem = common::small_problem(0.0);
    let env = problem.environment();
    let config = QLearningConfig::default()
        .with_max_iterations(60_000)
        .with_exploration(Exploration::Uniform)
        .with_state_sampling(StateSampling::Uniform)
        .with_seed(17);
    let mut learner = QLearningLearner::new(env, config).unwrap();

    learner.train().unwrap();
    let labels = learner.policy_labels().unwrap();

    assert_valid_labels(&labels, problem.state_count());
    // Goal is (2, 3).
    assert_eq!(labels[problem.state_of(2, 2).unwrap()], "N");
    assert_eq!(labels[problem.state_of(1, 3).unwrap()], "E");
    assert_eq!(labels[problem.state_of(3, 3).unwrap()], "O");
    assert_eq!(labels[problem.state_of(1, 2).unwrap()], "NE");
}

#[test]
fn sarsa_and_monte_carlo_produce_full_policies() {
    let problem = common::small_problem(0.1);
    let env = problem.environment();

    let mut sarsa = SarsaLearner::new(
        env,
        SarsaConfig::default().with_max_iterations(300).with_seed(5),
    )
    .unwrap();
    let summary = sarsa.train().unwrap();
    assert_eq!(summary.episodes, 301);
    assert_valid_labels(&sarsa.policy_labels().unwrap(), problem.state_count());

    let mut mc = MonteCarloLearner::new(
        env,
        MonteCarloConfig::default()
            .with_episodes(300)
            .with_visit_mode(VisitMode::EveryVisit)
            .with_seed(5),
    )
    .unwrap()
    .with_initial_policy(problem.greedy_policy())
    .unwrap();
    let summary = mc.train().unwrap();
    assert_eq!(summary.episodes, 301);
    assert!(summary.updates >= summary.total_steps);
    assert_valid_labels(&mc.policy_labels().unwrap(), problem.state_count());
}

#[test]
fn greedy_baseline_round_trips_through_codec() {
    let problem = common::small_problem(0.2);
    let codec = PolicyCodec::navigation();

    let policy = problem.greedy_policy();
    let labels = codec.encode(policy.as_slice().iter().copied()).unwrap();
    let decoded = codec.decode(&labels).unwrap();

    assert_eq!(decoded, policy.into_vec());
    assert_eq!(
        labels[problem.state_of(2, 3).unwrap()],
        Action::Wait.label()
    );
}
