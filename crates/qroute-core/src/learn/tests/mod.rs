mod agent_tests;

use crate::{ActionId, Environment, Transition};

/// Deterministic corridor: walk from 0 to `length`.
/// Action 0 waits in place (reward -2), action 1 advances (reward -1).
/// Waiting is listed first so an all-zero table prefers it.
#[derive(Debug, Clone)]
pub(crate) struct Corridor {
    pub length: usize,
    pub position: usize,
}

impl Corridor {
    pub(crate) const WAIT: usize = 0;
    pub(crate) const ADVANCE: usize = 1;

    pub(crate) fn new(length: usize) -> Self {
        Corridor {
            length,
            position: 0,
        }
    }
}

impl Environment for Corridor {
    type State = usize;

    fn reset(&mut self) -> usize {
        self.position = 0;
        self.position
    }

    fn state(&self) -> usize {
        self.position
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        if self.is_done() {
            Vec::new()
        } else {
            vec![ActionId::from(Self::WAIT), ActionId::from(Self::ADVANCE)]
        }
    }

    fn step(&mut self, action: ActionId) -> Transition<usize> {
        if self.is_done() {
            return Transition {
                next: self.position,
                reward: 0.0,
                done: true,
            };
        }
        let reward = match action.index() {
            Self::ADVANCE => {
                self.position += 1;
                -1.0
            }
            _ => -2.0,
        };
        Transition {
            next: self.position,
            reward,
            done: self.is_done(),
        }
    }

    fn is_done(&self) -> bool {
        self.position >= self.length
    }
}

/// Environment that never terminates and always offers one action.
#[derive(Debug, Clone, Default)]
pub(crate) struct Treadmill;

impl Environment for Treadmill {
    type State = u8;

    fn reset(&mut self) -> u8 {
        0
    }

    fn state(&self) -> u8 {
        0
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        vec![ActionId::from(0)]
    }

    fn step(&mut self, _action: ActionId) -> Transition<u8> {
        Transition {
            next: 0,
            reward: -1.0,
            done: false,
        }
    }

    fn is_done(&self) -> bool {
        false
    }
}

/// Broken environment: not done, yet no legal action.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeadEnd;

impl Environment for DeadEnd {
    type State = u8;

    fn reset(&mut self) -> u8 {
        0
    }

    fn state(&self) -> u8 {
        0
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        Vec::new()
    }

    fn step(&mut self, _action: ActionId) -> Transition<u8> {
        Transition {
            next: 0,
            reward: 0.0,
            done: false,
        }
    }

    fn is_done(&self) -> bool {
        false
    }
}
