use std::rc::Rc;

use chrono::NaiveTime;

use crate::domain::route::Route;

/// A single truck in the fleet, owning exactly one route. Trucks are
/// identical (§1 non-goals: no heterogeneous fleets), so capacity/speed are
/// fleet-wide constants repeated per truck rather than distinct parameters.
#[derive(Debug, Clone)]
pub struct Truck {
    pub number: usize,
    pub capacity: usize,
    pub speed: f64,
    pub start_of_day: NaiveTime,
    pub route: Rc<Route>,
    pub depot_location_id: u32,
    /// Total miles driven, as of the last evaluator run over this truck's
    /// route. Zero until the plan has been simulated at least once.
    pub odometer: f64,
    /// The truck's location as of the last evaluator run. Starts (and
    /// resets to) the depot.
    pub current_location: u32,
}

impl Truck {
    pub fn new(
        number: usize,
        capacity: usize,
        speed: f64,
        start_of_day: NaiveTime,
        depot_location_id: u32,
    ) -> Self {
        Truck {
            number,
            capacity,
            speed,
            start_of_day,
            route: Rc::new(Route::new()),
            depot_location_id,
            odometer: 0.0,
            current_location: depot_location_id,
        }
    }
}
