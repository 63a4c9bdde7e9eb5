use std::collections::HashSet;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::learn::{
    config::TrainConfig,
    env::Environment,
    error::AgentError,
    exploration::EpsilonSchedule,
    ids::ActionId,
    metrics::{BestEpisode, EpisodeMetrics, Rollout, TrainMetrics},
    snapshot::QTableSnapshot,
    table::QTable,
};

/// Tabular Q-learning agent.
///
/// Owns the environment it trains on, the value table, the exploration state
/// and a seeded RNG, so a fixed config seed gives a reproducible run.
///
/// Greedy choices take the first legal action (in the order returned by
/// `Environment::legal_actions`) that holds the maximum value.
pub struct QLearningAgent<E: Environment> {
    env: E,
    table: QTable<E::State>,
    config: TrainConfig,
    schedule: EpsilonSchedule,
    epsilon: f64,
    episodes_run: usize,
    best: Option<BestEpisode>,
    rng: ChaCha8Rng,
}

impl<E: Environment> QLearningAgent<E> {
    /// Create an agent with an empty table.
    pub fn new(env: E, config: TrainConfig) -> Result<Self, AgentError> {
        Self::with_table(env, config, QTable::new())
    }

    /// Create an agent that continues from an existing table.
    pub fn with_table(
        env: E,
        config: TrainConfig,
        table: QTable<E::State>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let schedule = config.epsilon_schedule();
        Ok(Self {
            env,
            table,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            epsilon: schedule.start(),
            schedule,
            config,
            episodes_run: 0,
            best: None,
        })
    }

    /// Borrow the environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Borrow the learned table.
    pub fn table(&self) -> &QTable<E::State> {
        &self.table
    }

    /// Serializable copy of the learned table.
    pub fn snapshot(&self) -> QTableSnapshot<E::State> {
        self.table.snapshot()
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Exploration rate the next episode will use.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of training episodes run so far.
    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Best completed training episode observed so far.
    pub fn best_episode(&self) -> Option<&BestEpisode> {
        self.best.as_ref()
    }

    /// Give up the agent, keeping the environment and the table.
    pub fn into_parts(self) -> (E, QTable<E::State>) {
        (self.env, self.table)
    }

    /// Greedy choice among `legal` for `state`; `None` only when `legal` is empty.
    pub fn greedy_action(&self, state: &E::State, legal: &[ActionId]) -> Option<ActionId> {
        self.table.best_action(state, legal).map(|(action, _)| action)
    }

    /// Epsilon-greedy choice among a non-empty `legal`.
    fn choose_action(&mut self, state: &E::State, legal: &[ActionId]) -> Option<ActionId> {
        if legal.is_empty() {
            return None;
        }
        if self.rng.gen_bool(self.epsilon) {
            let idx = self.rng.gen_range(0..legal.len());
            return Some(legal[idx]);
        }
        self.greedy_action(state, legal)
    }

    /// Run one training episode, then decay epsilon.
    pub fn run_episode(&mut self) -> Result<EpisodeMetrics, AgentError> {
        let episode = self.episodes_run;
        let epsilon = self.epsilon;
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;

        let mut state = self.env.reset();
        let mut actions = Vec::new();
        let mut total_reward = 0.0;

        while !self.env.is_done() && actions.len() < self.config.max_episode_steps {
            let legal = self.env.legal_actions();
            self.table.ensure_actions(&state, &legal);

            let action = self.choose_action(&state, &legal).ok_or(AgentError::NoLegalActions {
                episode,
                step: actions.len(),
            })?;

            let transition = self.env.step(action);

            // Terminal states bootstrap from zero.
            let bootstrap = if transition.done {
                0.0
            } else {
                let next_legal = self.env.legal_actions();
                self.table.max_value(&transition.next, &next_legal)
            };
            self.table
                .update(&state, action, transition.reward + gamma * bootstrap, alpha);

            total_reward += transition.reward;
            actions.push(action);
            state = transition.next;
        }

        let completed = self.env.is_done();
        if !completed {
            warn!(
                "episode {episode} truncated after {} steps",
                self.config.max_episode_steps
            );
        }

        if completed
            && self
                .best
                .as_ref()
                .is_none_or(|best| total_reward > best.total_reward)
        {
            debug!("episode {episode} is the best so far with reward {total_reward:.3}");
            self.best = Some(BestEpisode {
                episode,
                total_reward,
                actions: actions.clone(),
            });
        }

        self.episodes_run += 1;
        self.epsilon = self.schedule.next(self.epsilon);

        Ok(EpisodeMetrics {
            episode,
            steps: actions.len(),
            total_reward,
            epsilon,
            completed,
        })
    }

    /// Train for `config.num_episodes` episodes.
    pub fn train(&mut self) -> Result<TrainMetrics, AgentError> {
        self.train_with_hook(|_| {})
    }

    /// Train and invoke a callback after each completed episode.
    pub fn train_with_hook<FHook>(
        &mut self,
        mut on_episode: FHook,
    ) -> Result<TrainMetrics, AgentError>
    where
        FHook: FnMut(&EpisodeMetrics),
    {
        let mut metrics = TrainMetrics::new(self.config.num_episodes, self.epsilon);
        let log_every = self.config.log_every;

        for _ in 0..self.config.num_episodes {
            let episode_metrics = self.run_episode()?;

            if log_every > 0 && episode_metrics.episode % log_every == 0 {
                info!(
                    "episode {}: total reward {:.2}, steps {}, epsilon {:.4}",
                    episode_metrics.episode,
                    episode_metrics.total_reward,
                    episode_metrics.steps,
                    episode_metrics.epsilon
                );
            }

            on_episode(&episode_metrics);
            metrics.record(&episode_metrics);
        }

        metrics.final_epsilon = self.epsilon;
        info!(
            "training finished: {} episodes, {} truncated, {} states in table",
            metrics.episodes_run,
            metrics.truncated_episodes,
            self.table.state_count()
        );

        Ok(metrics)
    }

    /// Run one exploration-free episode from `reset` without touching the table.
    ///
    /// A `(state, action)` pair is never taken twice: if the greedy choice would
    /// repeat one, the best untried legal action is taken instead.
    pub fn greedy_rollout(&mut self) -> Result<Rollout<E::State>, AgentError> {
        let max_steps = self.config.max_episode_steps;
        let mut state = self.env.reset();
        let mut tried: HashSet<(E::State, ActionId)> = HashSet::new();
        let mut actions: Vec<ActionId> = Vec::new();
        let mut total_reward = 0.0;

        while !self.env.is_done() {
            if actions.len() >= max_steps {
                return Err(AgentError::RolloutStepLimit { max_steps });
            }

            let untried: Vec<ActionId> = self
                .env
                .legal_actions()
                .into_iter()
                .filter(|action| !tried.contains(&(state.clone(), *action)))
                .collect();

            let action = self.greedy_action(&state, &untried).ok_or(AgentError::RolloutStalled {
                step: actions.len(),
                last_action: actions.last().copied(),
            })?;
            tried.insert((state.clone(), action));

            let transition = self.env.step(action);
            total_reward += transition.reward;
            actions.push(action);
            state = transition.next;
        }

        Ok(Rollout {
            actions,
            total_reward,
            final_state: state,
        })
    }
}
