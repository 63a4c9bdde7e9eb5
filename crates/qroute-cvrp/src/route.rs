use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Instance, RouteError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One depot-to-depot vehicle trip.
pub struct Trip {
    /// Node ids in visiting order, starting and ending with the depot.
    pub nodes: Vec<u32>,
    /// Total demand served on the trip.
    pub load: u64,
    pub distance: f64,
}

impl Trip {
    /// Build a trip serving `stops` (dense indices) from and back to the depot.
    fn from_stops(instance: &Instance, stops: &[usize]) -> Self {
        let depot = instance.depot_index();
        let mut path = Vec::with_capacity(stops.len() + 2);
        path.push(depot);
        path.extend_from_slice(stops);
        path.push(depot);

        let distance = path
            .windows(2)
            .map(|pair| instance.distance(pair[0], pair[1]))
            .sum();
        let load = stops
            .iter()
            .filter_map(|index| instance.node(*index))
            .map(|node| u64::from(node.demand))
            .sum();
        let nodes = path
            .iter()
            .filter_map(|index| instance.node(*index))
            .map(|node| node.id)
            .collect();

        Trip {
            nodes,
            load,
            distance,
        }
    }

    /// Customer ids, without the depot at either end.
    pub fn customers(&self) -> &[u32] {
        if self.nodes.len() < 2 {
            return &[];
        }
        &self.nodes[1..self.nodes.len() - 1]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A complete CVRP solution: an ordered list of trips.
pub struct Route {
    pub trips: Vec<Trip>,
}

impl Route {
    /// Split a log of dense node indices into trips at every depot visit.
    /// Depot-to-depot segments produce no trip; a trailing open trip is closed.
    pub fn from_log(instance: &Instance, log: &[usize]) -> Self {
        let depot = instance.depot_index();
        let mut trips = Vec::new();
        let mut stops = Vec::new();

        for &index in log {
            if index == depot {
                if !stops.is_empty() {
                    trips.push(Trip::from_stops(instance, &stops));
                    stops.clear();
                }
            } else {
                stops.push(index);
            }
        }
        if !stops.is_empty() {
            trips.push(Trip::from_stops(instance, &stops));
        }

        Route { trips }
    }

    /// Build a route from node ids, using the depot id as trip separator.
    pub fn from_node_ids(instance: &Instance, ids: &[u32]) -> Result<Self, RouteError> {
        let depot_id = instance.depot().id;
        let mut log = Vec::with_capacity(ids.len());
        let mut trip = 0;

        for id in ids {
            let index = instance
                .index_of(*id)
                .ok_or(RouteError::UnknownNode { trip, id: *id })?;
            if *id == depot_id {
                trip += 1;
            }
            log.push(index);
        }

        Ok(Self::from_log(instance, &log))
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn total_distance(&self) -> f64 {
        self.trips.iter().map(|trip| trip.distance).sum()
    }

    pub fn trip_distances(&self) -> Vec<f64> {
        self.trips.iter().map(|trip| trip.distance).collect()
    }

    /// Number of customer visits across all trips.
    pub fn customers_served(&self) -> usize {
        self.trips.iter().map(|trip| trip.customers().len()).sum()
    }

    /// Relative distance above `optimum`, e.g. `0.1` for 10% longer.
    /// `None` unless `optimum` is a positive finite distance.
    pub fn gap_to(&self, optimum: f64) -> Option<f64> {
        if !optimum.is_finite() || optimum <= 0.0 {
            return None;
        }
        Some((self.total_distance() - optimum) / optimum)
    }

    /// Check the CVRP rules: closed non-empty trips, every customer served
    /// exactly once, and no trip above capacity.
    pub fn validate(&self, instance: &Instance) -> Result<(), RouteError> {
        let depot_id = instance.depot().id;
        let mut served = HashSet::with_capacity(instance.customer_count());

        for (trip_idx, trip) in self.trips.iter().enumerate() {
            if trip.nodes.len() < 2
                || trip.nodes.first() != Some(&depot_id)
                || trip.nodes.last() != Some(&depot_id)
            {
                return Err(RouteError::OpenTrip { trip: trip_idx });
            }
            if trip.customers().is_empty() {
                return Err(RouteError::EmptyTrip { trip: trip_idx });
            }

            let mut load = 0u64;
            for id in trip.customers() {
                if *id == depot_id {
                    return Err(RouteError::OpenTrip { trip: trip_idx });
                }
                let node = instance
                    .index_of(*id)
                    .and_then(|index| instance.node(index))
                    .ok_or(RouteError::UnknownNode {
                        trip: trip_idx,
                        id: *id,
                    })?;
                if !served.insert(*id) {
                    return Err(RouteError::DuplicateCustomer { id: *id });
                }
                load += u64::from(node.demand);
            }

            if load > u64::from(instance.capacity()) {
                return Err(RouteError::OverCapacity {
                    trip: trip_idx,
                    load,
                    capacity: instance.capacity(),
                });
            }
        }

        let missing = instance
            .customers()
            .iter()
            .filter_map(|index| instance.node(*index))
            .map(|node| node.id)
            .filter(|id| !served.contains(id))
            .min();
        if let Some(id) = missing {
            return Err(RouteError::MissingCustomer { id });
        }

        Ok(())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, trip) in self.trips.iter().enumerate() {
            let path: Vec<String> = trip.nodes.iter().map(u32::to_string).collect();
            writeln!(
                f,
                "trip {}: {} (load {}, distance {:.2})",
                idx + 1,
                path.join(" -> "),
                trip.load,
                trip.distance
            )?;
        }
        write!(f, "total distance: {:.2}", self.total_distance())
    }
}
