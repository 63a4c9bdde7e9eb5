mod builder;
mod definition;
mod env;
mod error;
mod instance;
mod io;
mod route;
mod solver;

#[cfg(test)]
mod tests;

pub use builder::InstanceBuilder;
pub use definition::{InstanceDef, NodeDef};
pub use env::{CvrpEnv, CvrpState, Phase};
pub use error::{InstanceError, RouteError, SolveError};
pub use instance::{Instance, MAX_CUSTOMERS, Node};
pub use io::{compile_vrp, load_sol, load_vrp, load_yaml, parse_sol, parse_vrp, save_yaml};
pub use route::{Route, Trip};
pub use solver::{CvrpSolver, Solution, SolverConfig, solve};
