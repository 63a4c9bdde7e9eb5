use crate::{ActionId, AgentError, Environment, QLearningAgent, TrainConfig, Transition};

use super::{Corridor, DeadEnd, Treadmill};

fn config(num_episodes: usize) -> TrainConfig {
    TrainConfig {
        num_episodes,
        learning_rate: 0.5,
        discount: 0.9,
        epsilon_start: 0.3,
        epsilon_min: 0.05,
        epsilon_decay: 0.99,
        max_episode_steps: 64,
        seed: 7,
        log_every: 0,
    }
}

/// One step, fixed reward, then terminal.
#[derive(Debug, Clone, Default)]
struct OneShot {
    done: bool,
}

impl Environment for OneShot {
    type State = bool;

    fn reset(&mut self) -> bool {
        self.done = false;
        self.done
    }

    fn state(&self) -> bool {
        self.done
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        if self.done {
            Vec::new()
        } else {
            vec![ActionId::from(0)]
        }
    }

    fn step(&mut self, _action: ActionId) -> Transition<bool> {
        self.done = true;
        Transition {
            next: true,
            reward: 10.0,
            done: true,
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

#[test]
fn terminal_transition_bootstraps_from_zero() {
    let config = TrainConfig {
        learning_rate: 1.0,
        discount: 1.0,
        ..config(1)
    };
    let mut agent = QLearningAgent::new(OneShot::default(), config).expect("valid config");
    agent.train().expect("training succeeds");

    assert_eq!(agent.table().value(&false, ActionId::from(0)), 10.0);
    // The terminal state never gets an entry.
    assert_eq!(agent.table().state_count(), 1);
}

#[test]
fn update_uses_max_over_next_legal_actions() {
    let config = TrainConfig {
        learning_rate: 0.5,
        discount: 0.9,
        epsilon_start: 0.05,
        epsilon_min: 0.05,
        ..config(1)
    };
    let mut agent = QLearningAgent::new(Corridor::new(5), config).expect("valid config");
    let metrics = agent.run_episode().expect("episode succeeds");
    assert!(metrics.completed);

    // Every visited state has an entry for both legal actions.
    for position in 0..5 {
        assert!(agent.table().contains(&position, ActionId::from(Corridor::WAIT)));
        assert!(agent.table().contains(&position, ActionId::from(Corridor::ADVANCE)));
    }
}

#[test]
fn training_learns_to_advance() {
    let mut agent = QLearningAgent::new(Corridor::new(4), config(300)).expect("valid config");
    let metrics = agent.train().expect("training succeeds");
    assert_eq!(metrics.episodes_run, 300);
    assert_eq!(metrics.truncated_episodes, 0);

    let rollout = agent.greedy_rollout().expect("rollout succeeds");
    assert_eq!(rollout.actions, vec![ActionId::from(Corridor::ADVANCE); 4]);
    assert_eq!(rollout.total_reward, -4.0);
    assert_eq!(rollout.final_state, 4);
}

#[test]
fn untrained_rollout_breaks_repeated_choices() {
    let mut agent = QLearningAgent::new(Corridor::new(2), config(0)).expect("valid config");
    let metrics = agent.train().expect("zero episodes is fine");
    assert_eq!(metrics.episodes_run, 0);

    // All-zero table: the first legal action (wait) wins the tie, and the
    // repeated (state, wait) pair is skipped in favour of advancing.
    let rollout = agent.greedy_rollout().expect("rollout succeeds");
    let wait = ActionId::from(Corridor::WAIT);
    let advance = ActionId::from(Corridor::ADVANCE);
    assert_eq!(rollout.actions, vec![wait, advance, wait, advance]);
    assert_eq!(rollout.total_reward, -6.0);
}

#[test]
fn greedy_rollout_is_repeatable_and_leaves_table_untouched() {
    let mut agent = QLearningAgent::new(Corridor::new(3), config(20)).expect("valid config");
    agent.train().expect("training succeeds");

    let before: Vec<(usize, f64)> = (0..3)
        .flat_map(|s| [0, 1].map(|a| (s, agent.table().value(&s, ActionId::from(a)))))
        .collect();
    let entries = agent.table().entry_count();

    let first = agent.greedy_rollout().expect("rollout succeeds");
    let second = agent.greedy_rollout().expect("rollout succeeds");
    assert_eq!(first, second);

    let after: Vec<(usize, f64)> = (0..3)
        .flat_map(|s| [0, 1].map(|a| (s, agent.table().value(&s, ActionId::from(a)))))
        .collect();
    assert_eq!(before, after);
    assert_eq!(entries, agent.table().entry_count());
}

#[test]
fn same_seed_gives_identical_training() {
    let mut a = QLearningAgent::new(Corridor::new(4), config(50)).expect("valid config");
    let mut b = QLearningAgent::new(Corridor::new(4), config(50)).expect("valid config");

    let mut trace_a = Vec::new();
    let mut trace_b = Vec::new();
    a.train_with_hook(|m| trace_a.push((m.steps, m.total_reward)))
        .expect("training succeeds");
    b.train_with_hook(|m| trace_b.push((m.steps, m.total_reward)))
        .expect("training succeeds");

    assert_eq!(trace_a, trace_b);
}

#[test]
fn step_limit_truncates_training_episodes() {
    let config = TrainConfig {
        max_episode_steps: 5,
        ..config(3)
    };
    let mut agent = QLearningAgent::new(Treadmill, config).expect("valid config");
    let metrics = agent.train().expect("truncation is not an error");

    assert_eq!(metrics.truncated_episodes, 3);
    assert_eq!(metrics.best_total_reward, None);
    assert!(agent.best_episode().is_none());
}

#[test]
fn endless_rollout_reports_error() {
    let mut agent = QLearningAgent::new(Treadmill, config(0)).expect("valid config");
    let err = agent.greedy_rollout().expect_err("treadmill never ends");
    // The single (state, action) pair is used up after the first step.
    assert!(matches!(err, AgentError::RolloutStalled { step: 1, .. }));
}

#[test]
fn missing_legal_actions_is_an_error() {
    let mut agent = QLearningAgent::new(DeadEnd, config(1)).expect("valid config");
    let err = agent.train().expect_err("dead end has no actions");
    assert!(matches!(
        err,
        AgentError::NoLegalActions {
            episode: 0,
            step: 0
        }
    ));
}

#[test]
fn best_episode_tracks_highest_return() {
    let mut agent = QLearningAgent::new(Corridor::new(3), config(40)).expect("valid config");
    let metrics = agent.train().expect("training succeeds");

    let best = agent.best_episode().expect("some episode completed");
    assert_eq!(Some(best.total_reward), metrics.best_total_reward);
    assert!(best.total_reward <= -3.0);
    assert_eq!(
        best.actions
            .iter()
            .filter(|a| a.index() == Corridor::ADVANCE)
            .count(),
        3
    );
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = TrainConfig {
        epsilon_decay: 0.0,
        ..config(1)
    };
    let err = QLearningAgent::new(Corridor::new(2), config).err();
    assert!(matches!(err, Some(AgentError::Config(_))));
}
