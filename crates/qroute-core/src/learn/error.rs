use std::fmt;

use crate::learn::{config::TrainConfigError, ids::ActionId};

/// Error type for agent construction, training and greedy rollout.
#[derive(Debug)]
pub enum AgentError {
    /// The training configuration failed validation.
    Config(TrainConfigError),
    /// A non-terminal state offered no legal action.
    NoLegalActions { episode: usize, step: usize },
    /// The greedy rollout hit the step limit before the episode ended.
    RolloutStepLimit { max_steps: usize },
    /// Every legal action of a state was already taken during the greedy rollout.
    RolloutStalled { step: usize, last_action: Option<ActionId> },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Config(err) => write!(f, "{err}"),
            AgentError::NoLegalActions { episode, step } => write!(
                f,
                "no legal action in non-terminal state at episode {episode}, step {step}"
            ),
            AgentError::RolloutStepLimit { max_steps } => {
                write!(f, "greedy rollout did not finish within {max_steps} steps")
            }
            AgentError::RolloutStalled { step, last_action } => match last_action {
                Some(action) => write!(
                    f,
                    "greedy rollout stalled at step {step} after action {}",
                    action.index()
                ),
                None => write!(f, "greedy rollout stalled at step {step}"),
            },
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TrainConfigError> for AgentError {
    fn from(err: TrainConfigError) -> Self {
        AgentError::Config(err)
    }
}
