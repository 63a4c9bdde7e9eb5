use std::hash::Hash;

use crate::learn::ids::ActionId;

/// Result of applying one action to an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    pub next: S,
    pub reward: f64,
    pub done: bool,
}

/// Interface the agent uses to drive a stateful, deterministic episode.
///
/// The environment owns its simulation state; the agent only sees the
/// encoded state key returned by `reset` and `step`.
pub trait Environment {
    /// Hashable encoding of the current simulation state, used as Q-table key.
    type State: Clone + Eq + Hash;

    /// Start a new episode and return the initial state key.
    fn reset(&mut self) -> Self::State;

    /// Encode the current state.
    fn state(&self) -> Self::State;

    /// Actions legal in the current state, in the order used for tie-breaking.
    /// Must be empty only when the episode is done.
    fn legal_actions(&self) -> Vec<ActionId>;

    /// Apply one action. Illegal actions must leave the state unchanged.
    fn step(&mut self, action: ActionId) -> Transition<Self::State>;

    /// Whether the current episode has reached its terminal state.
    fn is_done(&self) -> bool;
}
