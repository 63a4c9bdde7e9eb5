/// Multiplicative epsilon decay towards a positive floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    start: f64,
    min: f64,
    decay: f64,
}

impl EpsilonSchedule {
    /// Ranges are checked by `TrainConfig::validate`; `start` is clamped to the floor.
    pub fn new(start: f64, min: f64, decay: f64) -> Self {
        EpsilonSchedule {
            start: start.max(min),
            min,
            decay,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// Epsilon after one more episode. Never increases, never drops below the floor.
    pub fn next(&self, epsilon: f64) -> f64 {
        (epsilon * self.decay).max(self.min)
    }
}
