use crate::learn::ids::ActionId;

/// Per-episode metrics emitted during training.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeMetrics {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    /// Exploration rate the episode was run with.
    pub epsilon: f64,
    /// False when the episode was cut short by the step limit.
    pub completed: bool,
}

/// Aggregate metrics for a complete training run.
#[derive(Debug, Clone)]
pub struct TrainMetrics {
    pub episodes_requested: usize,
    pub episodes_run: usize,
    pub truncated_episodes: usize,
    pub total_reward_sum: f64,
    pub average_total_reward: f64,
    pub best_total_reward: Option<f64>,
    pub final_epsilon: f64,
}

impl TrainMetrics {
    pub(crate) fn new(episodes_requested: usize, epsilon: f64) -> Self {
        TrainMetrics {
            episodes_requested,
            episodes_run: 0,
            truncated_episodes: 0,
            total_reward_sum: 0.0,
            average_total_reward: 0.0,
            best_total_reward: None,
            final_epsilon: epsilon,
        }
    }

    pub(crate) fn record(&mut self, metrics: &EpisodeMetrics) {
        self.episodes_run += 1;
        if !metrics.completed {
            self.truncated_episodes += 1;
        }
        self.total_reward_sum += metrics.total_reward;
        self.average_total_reward = self.total_reward_sum / self.episodes_run as f64;
        if metrics.completed {
            self.best_total_reward = Some(match self.best_total_reward {
                Some(best) => best.max(metrics.total_reward),
                None => metrics.total_reward,
            });
        }
    }
}

/// Action trace of the highest-return completed training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct BestEpisode {
    pub episode: usize,
    pub total_reward: f64,
    pub actions: Vec<ActionId>,
}

/// Result of one greedy (exploration-free) episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout<S> {
    pub actions: Vec<ActionId>,
    pub total_reward: f64,
    pub final_state: S,
}
