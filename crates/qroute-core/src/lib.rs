mod learn;

pub use learn::agent::QLearningAgent;
pub use learn::config::{TrainConfig, TrainConfigError};
pub use learn::env::{Environment, Transition};
pub use learn::error::AgentError;
pub use learn::exploration::EpsilonSchedule;
pub use learn::ids::ActionId;
pub use learn::metrics::{BestEpisode, EpisodeMetrics, Rollout, TrainMetrics};
pub use learn::snapshot::{ActionValueSnapshot, QTableSnapshot, StateEntrySnapshot};
pub use learn::table::QTable;
