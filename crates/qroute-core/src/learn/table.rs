use std::collections::HashMap;
use std::hash::Hash;

use crate::learn::{
    ids::ActionId,
    snapshot::{ActionValueSnapshot, QTableSnapshot, StateEntrySnapshot},
};

/// Value estimates for the actions seen from one state.
/// Kept in first-seen order; action lists are short so lookups stay linear.
#[derive(Debug, Clone, Default)]
struct ActionValues {
    entries: Vec<(ActionId, f64)>,
}

impl ActionValues {
    fn get(&self, action: ActionId) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, value)| *value)
    }

    fn position_or_insert(&mut self, action: ActionId) -> usize {
        match self.entries.iter().position(|(a, _)| *a == action) {
            Some(idx) => idx,
            None => {
                self.entries.push((action, 0.0));
                self.entries.len() - 1
            }
        }
    }

    /// Add a zero entry for `action` unless one exists.
    fn insert_default(&mut self, action: ActionId) {
        self.position_or_insert(action);
    }

    fn get_mut_or_insert(&mut self, action: ActionId) -> &mut f64 {
        let idx = self.position_or_insert(action);
        &mut self.entries[idx].1
    }
}

/// Tabular action-value estimates keyed by an encoded state.
///
/// Unseen `(state, action)` pairs read as `0.0`. The table only grows: entries
/// are created by `ensure_actions` or `update` and never removed.
#[derive(Debug, Clone)]
pub struct QTable<S>
where
    S: Clone + Eq + Hash,
{
    values: HashMap<S, ActionValues>,
}

impl<S> Default for QTable<S>
where
    S: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<S> QTable<S>
where
    S: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Current estimate for `(state, action)`, zero when never stored.
    pub fn value(&self, state: &S, action: ActionId) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(action))
            .unwrap_or(0.0)
    }

    /// Whether an explicit entry exists for `(state, action)`.
    pub fn contains(&self, state: &S, action: ActionId) -> bool {
        self.values
            .get(state)
            .is_some_and(|actions| actions.get(action).is_some())
    }

    /// Make sure every listed action has an entry for `state`.
    /// Existing values are left as they are.
    pub fn ensure_actions(&mut self, state: &S, actions: &[ActionId]) {
        let entry = self.values.entry(state.clone()).or_default();
        for action in actions {
            entry.insert_default(*action);
        }
    }

    /// Overwrite the estimate for `(state, action)`.
    pub fn set(&mut self, state: &S, action: ActionId, value: f64) {
        let entry = self.values.entry(state.clone()).or_default();
        *entry.get_mut_or_insert(action) = value;
    }

    /// Move the estimate a step of size `alpha` towards `target` and return the new value.
    pub fn update(&mut self, state: &S, action: ActionId, target: f64, alpha: f64) -> f64 {
        let entry = self.values.entry(state.clone()).or_default();
        let value = entry.get_mut_or_insert(action);
        *value += alpha * (target - *value);
        *value
    }

    /// Pick the highest-valued action among `candidates`.
    ///
    /// Ties go to the first candidate holding the maximum, so the caller's
    /// ordering of `candidates` is the tie-break rule.
    pub fn best_action(&self, state: &S, candidates: &[ActionId]) -> Option<(ActionId, f64)> {
        let mut best: Option<(ActionId, f64)> = None;

        for action in candidates {
            let candidate = (*action, self.value(state, *action));
            best = match best {
                Some((best_action, best_value)) if best_value >= candidate.1 => {
                    Some((best_action, best_value))
                }
                _ => Some(candidate),
            };
        }

        best
    }

    /// Maximum estimate over `candidates`, or `0.0` when there are none.
    pub fn max_value(&self, state: &S, candidates: &[ActionId]) -> f64 {
        self.best_action(state, candidates)
            .map(|(_, value)| value)
            .unwrap_or(0.0)
    }

    /// Number of distinct states with at least one entry.
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of stored `(state, action)` entries.
    pub fn entry_count(&self) -> usize {
        self.values.values().map(|actions| actions.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy the table into a serializable form.
    pub fn snapshot(&self) -> QTableSnapshot<S> {
        let states = self
            .values
            .iter()
            .map(|(state, actions)| StateEntrySnapshot {
                state: state.clone(),
                actions: actions
                    .entries
                    .iter()
                    .map(|(action, value)| ActionValueSnapshot {
                        action_id: action.index(),
                        value: *value,
                    })
                    .collect(),
            })
            .collect();

        QTableSnapshot {
            schema_version: 1,
            state_count: self.state_count(),
            entry_count: self.entry_count(),
            states,
        }
    }
}
