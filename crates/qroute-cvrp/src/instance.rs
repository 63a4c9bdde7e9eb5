use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{InstanceDef, InstanceError};

/// Unvisited customers are tracked in a `u64` bitmask.
pub const MAX_CUSTOMERS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A validated node. The depot has demand 0.
pub struct Node {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub demand: u32,
}

impl Node {
    /// Euclidean distance between two nodes.
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone)]
/// Validated, immutable CVRP instance with a dense distance matrix.
///
/// Nodes are addressed by dense index (their position in `nodes()`).
/// Each customer also owns a bit in the unvisited-set mask, assigned in node order.
pub struct Instance {
    name: Option<String>,
    nodes: Vec<Node>,
    depot: usize,
    capacity: u32,
    known_optimum: Option<f64>,
    customers: Vec<usize>,
    customer_bits: Vec<Option<u32>>,
    distances: Vec<f64>,
    id_to_index: HashMap<u32, usize>,
}

impl Instance {
    /// Validate a definition and build the runtime form.
    pub(crate) fn from_def(
        def: &InstanceDef,
        fallback_capacity: Option<u32>,
    ) -> Result<Self, InstanceError> {
        let capacity = def.validate(fallback_capacity)?;
        let depot_id = def.depot.ok_or(InstanceError::MissingDepot)?;

        let mut nodes = Vec::with_capacity(def.nodes.len());
        let mut id_to_index = HashMap::with_capacity(def.nodes.len());
        let mut customers = Vec::with_capacity(def.nodes.len().saturating_sub(1));
        let mut customer_bits = Vec::with_capacity(def.nodes.len());
        let mut depot = None;

        for (idx, node) in def.nodes.iter().enumerate() {
            // Validation guarantees 0 <= demand <= capacity.
            let demand = u32::try_from(node.demand).map_err(|_| InstanceError::NegativeDemand {
                id: node.id,
                demand: node.demand,
            })?;
            nodes.push(Node {
                id: node.id,
                x: node.x,
                y: node.y,
                demand,
            });
            id_to_index.insert(node.id, idx);

            if node.id == depot_id {
                depot = Some(idx);
                customer_bits.push(None);
            } else {
                customer_bits.push(Some(customers.len() as u32));
                customers.push(idx);
            }
        }

        let depot = depot.ok_or(InstanceError::UnknownDepot { depot: depot_id })?;

        let n = nodes.len();
        let mut distances = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = nodes[i].distance_to(&nodes[j]);
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }

        Ok(Self {
            name: def.name.clone(),
            nodes,
            depot,
            capacity,
            known_optimum: def.known_optimum,
            customers,
            customer_bits,
            distances,
            id_to_index,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All nodes in dense index order, depot included.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Dense index of the depot.
    pub fn depot_index(&self) -> usize {
        self.depot
    }

    pub fn depot(&self) -> &Node {
        &self.nodes[self.depot]
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn known_optimum(&self) -> Option<f64> {
        self.known_optimum
    }

    /// Dense indices of all customers, ascending.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Bit position of a customer in the unvisited mask; `None` for the depot or unknown indices.
    pub fn customer_bit(&self, index: usize) -> Option<u32> {
        self.customer_bits.get(index).copied().flatten()
    }

    /// Mask with one bit set per customer.
    pub fn all_customers_mask(&self) -> u64 {
        match self.customers.len() {
            0 => 0,
            MAX_CUSTOMERS => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    /// Dense index of the node with the given id.
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Distance between two dense indices.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.nodes.len() + to]
    }

    /// Longest distance between any two nodes.
    pub fn longest_edge(&self) -> f64 {
        self.distances.iter().copied().fold(0.0, f64::max)
    }

    pub fn total_demand(&self) -> u64 {
        self.nodes.iter().map(|node| u64::from(node.demand)).sum()
    }

    /// Lower bound on the number of trips any feasible route needs.
    pub fn min_trips(&self) -> u64 {
        self.total_demand().div_ceil(u64::from(self.capacity))
    }
}
