use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::learn::exploration::EpsilonSchedule;

const DEFAULT_TRAIN_CONFIG_YAML: &str = include_str!("../../config/train.default.yaml");

/// Training configuration for the Q-learning agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub num_episodes: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    /// Steps after which a training episode is cut short.
    pub max_episode_steps: usize,
    pub seed: u64,
    /// Log progress every this many episodes; 0 disables progress logging.
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            num_episodes: 500,
            learning_rate: 0.1,
            discount: 0.9,
            epsilon_start: 0.2,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            max_episode_steps: 4096,
            seed: 42,
            log_every: 50,
        }
    }
}

impl TrainConfig {
    /// Parse a training config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TrainConfigError> {
        let config: TrainConfig = serde_yaml::from_str(yaml).map_err(TrainConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a training config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, TrainConfigError> {
        let yaml = fs::read_to_string(path).map_err(TrainConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_TRAIN_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, TrainConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Check parameter ranges. `num_episodes` may be 0.
    pub fn validate(&self) -> Result<(), TrainConfigError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 || self.learning_rate > 1.0
        {
            return Err(TrainConfigError::Invalid(
                "learning_rate must be in (0, 1]".to_string(),
            ));
        }
        if !self.discount.is_finite() || !(0.0..=1.0).contains(&self.discount) {
            return Err(TrainConfigError::Invalid(
                "discount must be in [0, 1]".to_string(),
            ));
        }
        if !self.epsilon_min.is_finite() || self.epsilon_min <= 0.0 {
            return Err(TrainConfigError::Invalid(
                "epsilon_min must be finite and > 0".to_string(),
            ));
        }
        if !self.epsilon_start.is_finite()
            || self.epsilon_start < self.epsilon_min
            || self.epsilon_start > 1.0
        {
            return Err(TrainConfigError::Invalid(
                "epsilon_start must be in [epsilon_min, 1]".to_string(),
            ));
        }
        if !self.epsilon_decay.is_finite() || self.epsilon_decay <= 0.0 || self.epsilon_decay > 1.0
        {
            return Err(TrainConfigError::Invalid(
                "epsilon_decay must be in (0, 1]".to_string(),
            ));
        }
        if self.max_episode_steps == 0 {
            return Err(TrainConfigError::Invalid(
                "max_episode_steps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Exploration schedule described by the epsilon fields.
    pub fn epsilon_schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule::new(self.epsilon_start, self.epsilon_min, self.epsilon_decay)
    }
}

/// Error type for loading and validating `TrainConfig`.
#[derive(Debug)]
pub enum TrainConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for TrainConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            TrainConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            TrainConfigError::Invalid(err) => write!(f, "invalid training config: {err}"),
        }
    }
}

impl std::error::Error for TrainConfigError {}
