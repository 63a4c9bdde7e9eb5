mod instance_tests;

use crate::{Instance, InstanceBuilder};

/// Depot 1 at the origin, customer 2 (demand 3) at (3, 0) and customer 3
/// (demand 4) at (0, 4), capacity 5: the two customers never fit together.
pub(crate) fn two_customers() -> Instance {
    InstanceBuilder::new()
        .set_name("two-customers")
        .set_capacity(5)
        .add_depot(1, 0.0, 0.0)
        .add_customer(2, 3.0, 0.0, 3)
        .add_customer(3, 0.0, 4.0, 4)
        .build()
        .expect("valid instance")
}

/// Four customers of demand 3 on a line, capacity 10.
pub(crate) fn four_on_a_line() -> Instance {
    InstanceBuilder::new()
        .set_capacity(10)
        .add_depot(1, 0.0, 0.0)
        .add_customer(2, 1.0, 0.0, 3)
        .add_customer(3, 2.0, 0.0, 3)
        .add_customer(4, 3.0, 0.0, 3)
        .add_customer(5, 4.0, 0.0, 3)
        .build()
        .expect("valid instance")
}
