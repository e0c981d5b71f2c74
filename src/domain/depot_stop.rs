/// A return to the depot partway through a route, identified by the
/// position in the package list at which it occurs. `route_index == 0` is
/// the implicit start-of-day depot stop; a final closing depot stop at
/// `route_index == packages.len()` is always synthesized by the route's
/// step cursor rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepotStop {
    pub route_index: usize,
    pub wait_minutes: i64,
}

impl DepotStop {
    pub fn new(route_index: usize) -> Self {
        DepotStop {
            route_index,
            wait_minutes: 0,
        }
    }

    pub fn with_wait(route_index: usize, wait_minutes: i64) -> Self {
        DepotStop {
            route_index,
            wait_minutes,
        }
    }
}
