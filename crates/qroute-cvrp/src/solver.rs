use std::{fs, path::Path};

use log::info;
use qroute_core::{
    Environment, EpisodeMetrics, QLearningAgent, QTable, QTableSnapshot, TrainConfig,
    TrainConfigError, TrainMetrics,
};
use serde::{Deserialize, Serialize};

use crate::{CvrpEnv, CvrpState, Instance, InstanceDef, Route, SolveError};

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../config/solver.default.yaml");

/// Training schedule plus the CVRP-specific knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    #[serde(flatten)]
    pub train: TrainConfig,
    /// Vehicle capacity used when the instance does not declare one.
    pub capacity: Option<u32>,
    /// Width of the remaining-capacity buckets in the state key.
    pub capacity_bucket: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            train: TrainConfig::default(),
            capacity: None,
            capacity_bucket: 1,
        }
    }
}

impl SolverConfig {
    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TrainConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml).map_err(TrainConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, TrainConfigError> {
        let yaml = fs::read_to_string(path).map_err(TrainConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, TrainConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), TrainConfigError> {
        self.train.validate()?;
        if self.capacity == Some(0) {
            return Err(TrainConfigError::Invalid(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.capacity_bucket == 0 {
            return Err(TrainConfigError::Invalid(
                "capacity_bucket must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a full train-then-extract run.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Greedy route from the trained table.
    pub route: Route,
    /// Route of the best completed training episode, if any completed.
    pub best_observed: Option<Route>,
    /// Reference solution, e.g. loaded from a `.sol` file.
    pub known_route: Option<Route>,
    pub known_optimum: Option<f64>,
    #[serde(skip)]
    pub metrics: Option<TrainMetrics>,
}

impl Solution {
    /// The shorter of the greedy and best observed routes.
    pub fn best_route(&self) -> &Route {
        match &self.best_observed {
            Some(observed) if observed.total_distance() < self.route.total_distance() => observed,
            _ => &self.route,
        }
    }

    /// Attach a reference route. A declared `cost` replaces the known optimum;
    /// without one the route length fills in a missing optimum.
    pub fn with_known_route(mut self, route: Route, cost: Option<f64>) -> Self {
        self.known_optimum = cost
            .or(self.known_optimum)
            .or_else(|| Some(route.total_distance()));
        self.known_route = Some(route);
        self
    }

    pub fn total_distance(&self) -> f64 {
        self.best_route().total_distance()
    }

    /// Relative gap of the best route to the known optimum.
    pub fn gap(&self) -> Option<f64> {
        self.known_optimum
            .and_then(|optimum| self.best_route().gap_to(optimum))
    }

    /// Render the solution as pretty-printed JSON for plotting tools.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Q-learning solver for one CVRP instance.
///
/// All instance checks run in `new`, so an infeasible or malformed instance
/// fails before any training episode.
pub struct CvrpSolver {
    agent: QLearningAgent<CvrpEnv>,
}

impl CvrpSolver {
    /// Validate a definition, applying the configured capacity fallback.
    pub fn new(def: &InstanceDef, config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        let instance = def.compile(config.capacity)?;
        Self::from_instance(instance, config)
    }

    /// Build a solver for an already validated instance.
    pub fn from_instance(instance: Instance, config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        let env = CvrpEnv::with_capacity_bucket(instance, config.capacity_bucket)?;
        let agent = QLearningAgent::new(env, config.train)?;
        Ok(Self { agent })
    }

    /// Continue from a table trained earlier on the same instance.
    pub fn with_table(
        instance: Instance,
        config: SolverConfig,
        table: QTable<CvrpState>,
    ) -> Result<Self, SolveError> {
        config.validate()?;
        let env = CvrpEnv::with_capacity_bucket(instance, config.capacity_bucket)?;
        let agent = QLearningAgent::with_table(env, config.train, table)?;
        Ok(Self { agent })
    }

    pub fn instance(&self) -> &Instance {
        self.agent.env().instance()
    }

    pub fn table(&self) -> &QTable<CvrpState> {
        self.agent.table()
    }

    pub fn snapshot(&self) -> QTableSnapshot<CvrpState> {
        self.agent.snapshot()
    }

    pub fn epsilon(&self) -> f64 {
        self.agent.epsilon()
    }

    pub fn train(&mut self) -> Result<TrainMetrics, SolveError> {
        Ok(self.agent.train()?)
    }

    pub fn train_with_hook<FHook>(&mut self, on_episode: FHook) -> Result<TrainMetrics, SolveError>
    where
        FHook: FnMut(&EpisodeMetrics),
    {
        Ok(self.agent.train_with_hook(on_episode)?)
    }

    /// Greedy route from the current table. The table is not modified.
    pub fn extract_route(&mut self) -> Result<Route, SolveError> {
        self.agent.greedy_rollout()?;
        let env = self.agent.env();
        let route = Route::from_log(env.instance(), env.route_log());
        route.validate(env.instance())?;
        Ok(route)
    }

    /// Replay the best completed training episode.
    pub fn best_observed_route(&self) -> Option<Route> {
        let best = self.agent.best_episode()?;
        let mut env = self.agent.env().clone();
        env.reset();
        for action in &best.actions {
            env.step(*action);
        }
        env.route()
    }

    /// Hand back the instance and the learned table.
    pub fn into_parts(self) -> (Instance, QTable<CvrpState>) {
        let (env, table) = self.agent.into_parts();
        (env.instance().clone(), table)
    }
}

/// Train on `def` and extract the resulting route.
pub fn solve(def: &InstanceDef, config: SolverConfig) -> Result<Solution, SolveError> {
    let mut solver = CvrpSolver::new(def, config)?;
    let metrics = solver.train()?;
    let route = solver.extract_route()?;
    let best_observed = solver.best_observed_route();
    let known_optimum = solver.instance().known_optimum();

    let solution = Solution {
        route,
        best_observed,
        known_route: None,
        known_optimum,
        metrics: Some(metrics),
    };
    info!(
        "solved {} customers: {} trips, total distance {:.2}",
        solver.instance().customer_count(),
        solution.best_route().trip_count(),
        solution.total_distance()
    );
    Ok(solution)
}
