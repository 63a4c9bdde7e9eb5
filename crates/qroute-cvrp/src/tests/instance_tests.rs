use crate::{InstanceBuilder, InstanceDef, InstanceError, MAX_CUSTOMERS, NodeDef};

use super::{four_on_a_line, two_customers};

fn def_with(nodes: Vec<NodeDef>, depot: Option<u32>, capacity: Option<u32>) -> InstanceDef {
    InstanceDef {
        name: None,
        capacity,
        depot,
        known_optimum: None,
        nodes,
    }
}

fn node(id: u32, demand: i64) -> NodeDef {
    NodeDef {
        id,
        x: id as f64,
        y: 0.0,
        demand,
    }
}

#[test]
fn dense_indices_and_customer_bits_follow_node_order() {
    let instance = two_customers();

    assert_eq!(instance.name(), Some("two-customers"));
    assert_eq!(instance.depot_index(), 0);
    assert_eq!(instance.depot().id, 1);
    assert_eq!(instance.customers(), &[1, 2]);
    assert_eq!(instance.customer_bit(0), None);
    assert_eq!(instance.customer_bit(1), Some(0));
    assert_eq!(instance.customer_bit(2), Some(1));
    assert_eq!(instance.customer_bit(9), None);
    assert_eq!(instance.all_customers_mask(), 0b11);
    assert_eq!(instance.index_of(3), Some(2));
    assert_eq!(instance.index_of(42), None);
}

#[test]
fn distance_matrix_is_euclidean_and_symmetric() {
    let instance = two_customers();
    assert_eq!(instance.distance(0, 1), 3.0);
    assert_eq!(instance.distance(2, 0), 4.0);
    assert_eq!(instance.distance(1, 2), 5.0);
    assert_eq!(instance.distance(2, 1), 5.0);
    assert_eq!(instance.distance(1, 1), 0.0);
    assert_eq!(instance.longest_edge(), 5.0);
}

#[test]
fn depot_does_not_have_to_come_first() {
    let def = def_with(vec![node(2, 4), node(1, 0), node(3, 2)], Some(1), Some(10));
    let instance = def.compile(None).expect("valid instance");

    assert_eq!(instance.depot_index(), 1);
    assert_eq!(instance.customers(), &[0, 2]);
    assert_eq!(instance.customer_bit(2), Some(1));
}

#[test]
fn demand_totals_give_a_trip_lower_bound() {
    let instance = four_on_a_line();
    assert_eq!(instance.total_demand(), 12);
    assert_eq!(instance.min_trips(), 2);
}

#[test]
fn demand_above_capacity_is_infeasible() {
    let err = InstanceBuilder::new()
        .set_capacity(5)
        .add_depot(1, 0.0, 0.0)
        .add_customer(2, 1.0, 1.0, 6)
        .build()
        .expect_err("demand 6 cannot fit capacity 5");

    assert!(matches!(
        err,
        InstanceError::Infeasible {
            id: 2,
            demand: 6,
            capacity: 5
        }
    ));
}

fn rejected(def: InstanceDef) -> InstanceError {
    def.compile(None).expect_err("definition should be rejected")
}

#[test]
fn malformed_definitions_are_rejected() {
    let err = rejected(def_with(vec![node(1, 0), node(2, 1)], None, Some(5)));
    assert!(matches!(err, InstanceError::MissingDepot));

    let err = rejected(def_with(vec![node(1, 0), node(2, 1)], Some(7), Some(5)));
    assert!(matches!(err, InstanceError::UnknownDepot { depot: 7 }));

    let err = rejected(def_with(vec![node(1, 2), node(2, 1)], Some(1), Some(5)));
    assert!(matches!(err, InstanceError::DepotDemand { depot: 1, demand: 2 }));

    let err = rejected(def_with(vec![node(1, 0), node(2, -3)], Some(1), Some(5)));
    assert!(matches!(err, InstanceError::NegativeDemand { id: 2, demand: -3 }));

    let err = rejected(def_with(vec![node(1, 0), node(2, 0)], Some(1), Some(5)));
    assert!(matches!(err, InstanceError::ZeroDemand { id: 2 }));

    let err = rejected(def_with(
        vec![node(1, 0), node(2, 1), node(2, 1)],
        Some(1),
        Some(5),
    ));
    assert!(matches!(err, InstanceError::DuplicateNodeId { id: 2 }));

    let err = rejected(def_with(vec![node(1, 0), node(2, 1)], Some(1), None));
    assert!(matches!(err, InstanceError::MissingCapacity));

    let err = rejected(def_with(vec![node(1, 0), node(2, 1)], Some(1), Some(0)));
    assert!(matches!(err, InstanceError::ZeroCapacity));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let mut bad = node(2, 1);
    bad.y = f64::NAN;
    let def = def_with(vec![node(1, 0), bad], Some(1), Some(5));

    let err = def.compile(None).expect_err("NaN coordinate");
    assert!(matches!(err, InstanceError::InvalidCoordinate { id: 2, .. }));
}

#[test]
fn fallback_capacity_only_applies_when_missing() {
    let without = def_with(vec![node(1, 0), node(2, 4)], Some(1), None);
    assert_eq!(without.compile(Some(8)).expect("fallback used").capacity(), 8);

    let with = def_with(vec![node(1, 0), node(2, 4)], Some(1), Some(5));
    assert_eq!(with.compile(Some(8)).expect("declared wins").capacity(), 5);
}

#[test]
fn customer_count_is_limited_by_mask_width() {
    let mut nodes = vec![node(0, 0)];
    nodes.extend((1..=MAX_CUSTOMERS as u32).map(|id| node(id, 1)));
    let full = def_with(nodes.clone(), Some(0), Some(100))
        .compile(None)
        .expect("64 customers fit");
    assert_eq!(full.all_customers_mask(), u64::MAX);

    nodes.push(node(MAX_CUSTOMERS as u32 + 1, 1));
    let err = def_with(nodes, Some(0), Some(100))
        .compile(None)
        .expect_err("65 customers do not fit");
    assert!(matches!(err, InstanceError::TooManyCustomers { count: 65, max: 64 }));
}
