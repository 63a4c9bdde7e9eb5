use qroute_core::{AgentError, TrainConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for instance loading, parsing and validation.
pub enum InstanceError {
    #[error("failed to read instance file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A file-level problem that no single line is responsible for.
    #[error("malformed file: {message}")]
    Format { message: String },

    #[error("instance has no depot")]
    MissingDepot,

    #[error("depot id {depot} does not name a node")]
    UnknownDepot { depot: u32 },

    #[error("depot {depot} must have demand 0, got {demand}")]
    DepotDemand { depot: u32, demand: i64 },

    #[error("instance has no vehicle capacity and none was configured")]
    MissingCapacity,

    #[error("vehicle capacity must be greater than 0")]
    ZeroCapacity,

    #[error("duplicate node id {id}")]
    DuplicateNodeId { id: u32 },

    #[error("node {id} has non-finite coordinates ({x}, {y})")]
    InvalidCoordinate { id: u32, x: f64, y: f64 },

    #[error("customer {id} has negative demand {demand}")]
    NegativeDemand { id: u32, demand: i64 },

    #[error("customer {id} has zero demand")]
    ZeroDemand { id: u32 },

    #[error("customer {id} demand {demand} exceeds vehicle capacity {capacity}")]
    Infeasible { id: u32, demand: i64, capacity: u32 },

    #[error("{count} customers exceed the supported maximum of {max}")]
    TooManyCustomers { count: usize, max: usize },

    #[error("capacity bucket width must be greater than 0")]
    ZeroCapacityBucket,
}

#[derive(Debug, Error, PartialEq)]
/// A route that breaks one of the CVRP feasibility rules.
pub enum RouteError {
    #[error("trip {trip} does not start and end at the depot")]
    OpenTrip { trip: usize },

    #[error("trip {trip} visits no customer")]
    EmptyTrip { trip: usize },

    #[error("trip {trip} visits unknown node {id}")]
    UnknownNode { trip: usize, id: u32 },

    #[error("customer {id} is served more than once")]
    DuplicateCustomer { id: u32 },

    #[error("customer {id} is never served")]
    MissingCustomer { id: u32 },

    #[error("trip {trip} carries {load}, above capacity {capacity}")]
    OverCapacity { trip: usize, load: u64, capacity: u32 },
}

#[derive(Debug, Error)]
/// Error type for the end-to-end solver.
pub enum SolveError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Config(#[from] TrainConfigError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("extracted route is infeasible: {0}")]
    Route(#[from] RouteError),
}
