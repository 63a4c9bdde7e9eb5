use crate::{Instance, InstanceDef, InstanceError, NodeDef};

#[derive(Debug, Clone, Default)]
/// Struct to build CVRP instances in code
pub struct InstanceBuilder {
    name: Option<String>,
    capacity: Option<u32>,
    depot: Option<u32>,
    known_optimum: Option<f64>,
    nodes: Vec<NodeDef>,
}

impl InstanceBuilder {
    /// Create a new InstanceBuilder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Define the vehicle capacity
    pub fn set_capacity(&mut self, capacity: u32) -> &mut Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_known_optimum(&mut self, distance: f64) -> &mut Self {
        self.known_optimum = Some(distance);
        self
    }

    /// Add the depot node; it always carries demand 0
    pub fn add_depot(&mut self, id: u32, x: f64, y: f64) -> &mut Self {
        self.depot = Some(id);
        self.nodes.push(NodeDef {
            id,
            x,
            y,
            demand: 0,
        });
        self
    }

    /// Add a customer node
    pub fn add_customer(&mut self, id: u32, x: f64, y: f64, demand: i64) -> &mut Self {
        self.nodes.push(NodeDef { id, x, y, demand });
        self
    }

    /// Produce the definition without validating it.
    pub fn build_def(&self) -> InstanceDef {
        InstanceDef {
            name: self.name.clone(),
            capacity: self.capacity,
            depot: self.depot,
            known_optimum: self.known_optimum,
            nodes: self.nodes.clone(),
        }
    }

    pub fn build(&self) -> Result<Instance, InstanceError> {
        self.build_def().compile(None)
    }
}
