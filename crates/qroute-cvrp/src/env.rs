use log::debug;
use qroute_core::{ActionId, Environment, Transition};
use serde::{Deserialize, Serialize};

use crate::{Instance, InstanceError, Route};

/// Smallest magnitude of the illegal-action penalty.
const PENALTY_FLOOR: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Where the current episode stands.
pub enum Phase {
    /// At the depot with a full vehicle, about to start a trip.
    AtDepot,
    /// Mid-trip, at least one customer served since the last depot visit.
    EnRoute,
    /// Every customer served and the last trip closed.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Q-table key for a CVRP state.
pub struct CvrpState {
    /// Dense index of the current node.
    pub node: usize,
    /// Remaining capacity divided by the bucket width.
    pub capacity_bucket: u32,
    /// One bit per unserved customer.
    pub unvisited: u64,
}

#[derive(Debug, Clone)]
/// Route-construction environment over one CVRP instance.
///
/// An action is the dense index of a node: a customer means "serve it next",
/// the depot means "return to the depot". Illegal actions never change the
/// state; they are answered with `illegal_penalty()`.
pub struct CvrpEnv {
    instance: Instance,
    capacity_bucket: u32,
    penalty: f64,
    phase: Phase,
    current: usize,
    remaining: u32,
    unvisited: u64,
    route_log: Vec<usize>,
    trip_bounds: Vec<usize>,
    travelled: f64,
}

impl CvrpEnv {
    /// Create an environment with exact remaining capacity in the state key.
    pub fn new(instance: Instance) -> Result<Self, InstanceError> {
        Self::with_capacity_bucket(instance, 1)
    }

    /// Create an environment that buckets remaining capacity by `bucket_width`.
    pub fn with_capacity_bucket(
        instance: Instance,
        bucket_width: u32,
    ) -> Result<Self, InstanceError> {
        if bucket_width == 0 {
            return Err(InstanceError::ZeroCapacityBucket);
        }
        // Instances are validated on construction; re-check the one rule
        // training depends on so a bad instance can never start an episode.
        let capacity = instance.capacity();
        if let Some(node) = instance
            .nodes()
            .iter()
            .find(|node| node.demand > capacity)
        {
            return Err(InstanceError::Infeasible {
                id: node.id,
                demand: i64::from(node.demand),
                capacity,
            });
        }

        // A single step covers at most two edges (serve the last customer, then return).
        let penalty = -(2.0 * instance.longest_edge() + 1.0).max(PENALTY_FLOOR);
        let depot = instance.depot_index();
        let mut env = Self {
            instance,
            capacity_bucket: bucket_width,
            penalty,
            phase: Phase::AtDepot,
            current: depot,
            remaining: capacity,
            unvisited: 0,
            route_log: Vec::new(),
            trip_bounds: Vec::new(),
            travelled: 0.0,
        };
        env.reset();
        Ok(env)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Dense index of the node the vehicle is at.
    pub fn current_node(&self) -> usize {
        self.current
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.remaining
    }

    /// Bitmask of unserved customers.
    pub fn unvisited(&self) -> u64 {
        self.unvisited
    }

    /// Dense node indices visited so far, starting with the depot.
    pub fn route_log(&self) -> &[usize] {
        &self.route_log
    }

    /// Route-log positions of the depot visits that closed a trip.
    pub fn trip_bounds(&self) -> &[usize] {
        &self.trip_bounds
    }

    pub fn distance_travelled(&self) -> f64 {
        self.travelled
    }

    /// Reward returned for illegal actions and idle depot returns.
    pub fn illegal_penalty(&self) -> f64 {
        self.penalty
    }

    /// Action that returns the vehicle to the depot.
    pub fn depot_action(&self) -> ActionId {
        ActionId::from(self.instance.depot_index())
    }

    /// The finished route, once every customer is served.
    pub fn route(&self) -> Option<Route> {
        if self.phase != Phase::Done {
            return None;
        }
        Some(Route::from_log(&self.instance, &self.route_log))
    }

    fn is_unvisited(&self, index: usize) -> bool {
        self.instance
            .customer_bit(index)
            .is_some_and(|bit| self.unvisited & (1u64 << bit) != 0)
    }

    fn can_serve(&self, index: usize) -> bool {
        self.is_unvisited(index)
            && self
                .instance
                .node(index)
                .is_some_and(|node| node.demand <= self.remaining)
    }

    fn rejected(&self) -> Transition<CvrpState> {
        Transition {
            next: self.state(),
            reward: self.penalty,
            done: self.phase == Phase::Done,
        }
    }

    fn return_to_depot(&mut self) -> f64 {
        let depot = self.instance.depot_index();
        let distance = self.instance.distance(self.current, depot);
        self.current = depot;
        self.remaining = self.instance.capacity();
        self.travelled += distance;
        self.route_log.push(depot);
        self.trip_bounds.push(self.route_log.len() - 1);
        self.phase = if self.unvisited == 0 {
            Phase::Done
        } else {
            Phase::AtDepot
        };
        distance
    }

    fn serve(&mut self, index: usize) -> f64 {
        let distance = self.instance.distance(self.current, index);
        if let Some(bit) = self.instance.customer_bit(index) {
            self.unvisited &= !(1u64 << bit);
        }
        if let Some(node) = self.instance.node(index) {
            self.remaining -= node.demand;
        }
        self.current = index;
        self.travelled += distance;
        self.route_log.push(index);
        self.phase = Phase::EnRoute;

        if self.unvisited == 0 {
            // Last customer: the closing trip back to the depot is forced.
            distance + self.return_to_depot()
        } else {
            distance
        }
    }
}

impl Environment for CvrpEnv {
    type State = CvrpState;

    fn reset(&mut self) -> CvrpState {
        let depot = self.instance.depot_index();
        self.current = depot;
        self.remaining = self.instance.capacity();
        self.unvisited = self.instance.all_customers_mask();
        self.route_log.clear();
        self.route_log.push(depot);
        self.trip_bounds.clear();
        self.travelled = 0.0;
        self.phase = if self.unvisited == 0 {
            Phase::Done
        } else {
            Phase::AtDepot
        };
        self.state()
    }

    fn state(&self) -> CvrpState {
        CvrpState {
            node: self.current,
            capacity_bucket: self.remaining / self.capacity_bucket,
            unvisited: self.unvisited,
        }
    }

    /// Servable customers in ascending index order, then the depot return.
    fn legal_actions(&self) -> Vec<ActionId> {
        if self.phase == Phase::Done {
            return Vec::new();
        }
        let mut actions: Vec<ActionId> = self
            .instance
            .customers()
            .iter()
            .copied()
            .filter(|index| self.can_serve(*index))
            .map(ActionId::from)
            .collect();
        actions.push(self.depot_action());
        actions
    }

    fn step(&mut self, action: ActionId) -> Transition<CvrpState> {
        let index = action.index();

        let distance = match self.phase {
            Phase::Done => {
                debug!("action {index} after the episode ended");
                return self.rejected();
            }
            // An empty trip makes no progress.
            Phase::AtDepot if index == self.instance.depot_index() => return self.rejected(),
            Phase::EnRoute if index == self.instance.depot_index() => self.return_to_depot(),
            _ if self.can_serve(index) => self.serve(index),
            _ => {
                debug!("rejected illegal action {index} at node {}", self.current);
                return self.rejected();
            }
        };

        Transition {
            next: self.state(),
            reward: -distance,
            done: self.phase == Phase::Done,
        }
    }

    fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}
