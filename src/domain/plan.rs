use std::rc::Rc;

use crate::domain::route::Route;
use crate::domain::truck::Truck;

/// A full multi-route solution: one route per truck, in stable truck order.
/// Cloning a `Plan` is cheap — `Truck::route` is an `Rc<Route>`, so only the
/// routes actually touched by a neighborhood operator are deep-cloned.
#[derive(Debug, Clone)]
pub struct Plan {
    pub trucks: Vec<Truck>,
}

impl Plan {
    pub fn new(trucks: Vec<Truck>) -> Self {
        Plan { trucks }
    }

    pub fn route(&self, truck_index: usize) -> &Route {
        &self.trucks[truck_index].route
    }

    /// Returns a mutable handle to the route owned by `truck_index`,
    /// cloning it first if it is shared with another `Plan` (copy-on-write).
    pub fn route_mut(&mut self, truck_index: usize) -> &mut Route {
        Rc::make_mut(&mut self.trucks[truck_index].route)
    }

    pub fn num_trucks(&self) -> usize {
        self.trucks.len()
    }

    pub fn total_packages(&self) -> usize {
        self.trucks.iter().map(|t| t.route.len()).sum()
    }
}
