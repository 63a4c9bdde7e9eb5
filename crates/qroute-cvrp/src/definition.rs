use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Instance, InstanceError, instance::MAX_CUSTOMERS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable CVRP instance used for YAML IO and as the `.vrp` parse result.
/// Nothing is checked until `validate` or `compile`.
pub struct InstanceDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Vehicle capacity; a configured fallback is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Id of the depot node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depot: Option<u32>,
    /// Best known total distance, if published with the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_optimum: Option<f64>,
    pub nodes: Vec<NodeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One node declaration. Demand is signed so bad input can be reported.
pub struct NodeDef {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub demand: i64,
}

impl InstanceDef {
    /// Check structure and feasibility, returning the capacity that applies.
    ///
    /// `fallback_capacity` is only used when the definition declares none.
    pub fn validate(&self, fallback_capacity: Option<u32>) -> Result<u32, InstanceError> {
        let depot = self.depot.ok_or(InstanceError::MissingDepot)?;

        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(InstanceError::DuplicateNodeId { id: node.id });
            }
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(InstanceError::InvalidCoordinate {
                    id: node.id,
                    x: node.x,
                    y: node.y,
                });
            }
        }

        let depot_node = self
            .nodes
            .iter()
            .find(|node| node.id == depot)
            .ok_or(InstanceError::UnknownDepot { depot })?;
        if depot_node.demand != 0 {
            return Err(InstanceError::DepotDemand {
                depot,
                demand: depot_node.demand,
            });
        }

        let capacity = self
            .capacity
            .or(fallback_capacity)
            .ok_or(InstanceError::MissingCapacity)?;
        if capacity == 0 {
            return Err(InstanceError::ZeroCapacity);
        }

        let customers = self.nodes.iter().filter(|node| node.id != depot);
        let mut count = 0;
        for node in customers {
            count += 1;
            if node.demand < 0 {
                return Err(InstanceError::NegativeDemand {
                    id: node.id,
                    demand: node.demand,
                });
            }
            if node.demand == 0 {
                return Err(InstanceError::ZeroDemand { id: node.id });
            }
            if node.demand > i64::from(capacity) {
                return Err(InstanceError::Infeasible {
                    id: node.id,
                    demand: node.demand,
                    capacity,
                });
            }
        }

        if count > MAX_CUSTOMERS {
            return Err(InstanceError::TooManyCustomers {
                count,
                max: MAX_CUSTOMERS,
            });
        }

        Ok(capacity)
    }

    /// Validate and build the runtime instance.
    pub fn compile(&self, fallback_capacity: Option<u32>) -> Result<Instance, InstanceError> {
        Instance::from_def(self, fallback_capacity)
    }
}
