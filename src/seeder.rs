//! Deterministic constructive seed heuristic (§4.C). Produces a feasible
//! initial [`Plan`] from the side-constraint rules observed in the input
//! data, before any stochastic search runs.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveTime, Timelike};

use crate::config::constant::TRUCK_TWO_WARMUP_WAIT_MINUTES;
use crate::disjoint_set::DisjointSets;
use crate::domain::package::{LinkedGroup, Package, PackageNote};
use crate::domain::plan::Plan;
use crate::domain::truck::Truck;
use crate::domain::Locations;
use crate::error::SolverError;

/// Builds the initial plan. Trucks are addressed by zero-based index
/// internally (`truck_packages[0]` is "truck 0" of §4.C); `required_truck`
/// notes use the one-based truck numbers from `packages.csv`.
pub fn seed(
    mut packages: Vec<Package>,
    locations: &Locations,
    depot_location_id: u32,
    number_drivers: usize,
    truck_capacity: usize,
    truck_speed: f64,
    start_of_day: NaiveTime,
) -> Result<Plan, SolverError> {
    if number_drivers < 2 {
        return Err(SolverError::ConfigurationError(
            "at least 2 drivers are required: the seeder routes packages to truck 1 and truck 2 directly".into(),
        ));
    }

    assign_linked_groups(&mut packages, truck_capacity)?;

    packages.sort_by(|a, b| {
        a.delivery_deadline
            .cmp(&b.delivery_deadline)
            .then(a.earliest_load.cmp(&b.earliest_load))
    });

    let mut truck_packages: Vec<Vec<Package>> = vec![Vec::new(); number_drivers];

    // Rule 1: every linked group loads onto truck 0.
    let mut remaining: Vec<Package> = Vec::new();
    for pkg in packages.drain(..) {
        if pkg.is_linked() {
            truck_packages[0].push(pkg);
        } else {
            remaining.push(pkg);
        }
    }

    // Rule 2: required truck, else the 09:05 note routes to truck 1, else defer.
    let nine_oh_five = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
    let mut deferred: Vec<Package> = Vec::new();
    for pkg in remaining.drain(..) {
        if let Some(required) = pkg.required_truck {
            let idx = required.saturating_sub(1);
            if idx < truck_packages.len() {
                truck_packages[idx].push(pkg);
                continue;
            }
        }
        if pkg.earliest_load == nine_oh_five && truck_packages.len() > 1 {
            truck_packages[1].push(pkg);
            continue;
        }
        deferred.push(pkg);
    }

    // Rule 3: second pass — skip (round-robin later) if deadline-hour > 10
    // or earliest-load-hour > 8, else truck 0.
    let mut round_robin: Vec<Package> = Vec::new();
    for pkg in deferred.drain(..) {
        if pkg.delivery_deadline.hour() > 10 || pkg.earliest_load.hour() > 8 {
            round_robin.push(pkg);
        } else {
            truck_packages[0].push(pkg);
        }
    }

    // Rule 4: nearest-neighbor reorder of truck 0's load.
    let truck_zero = std::mem::take(&mut truck_packages[0]);
    truck_packages[0] = nearest_neighbor_order(truck_zero, locations, depot_location_id);

    // Rule 5: round robin the remainder across every truck.
    let num_trucks = truck_packages.len();
    for (i, pkg) in round_robin.drain(..).enumerate() {
        truck_packages[i % num_trucks].push(pkg);
    }

    let mut trucks = Vec::with_capacity(number_drivers);
    for (i, pkgs) in truck_packages.into_iter().enumerate() {
        let mut truck = Truck::new(i + 1, truck_capacity, truck_speed, start_of_day, depot_location_id);
        {
            let route = Rc::get_mut(&mut truck.route).expect("fresh truck route is uniquely owned");
            route.packages = pkgs;
            route.set_minimal_depot_stops(truck_capacity);
        }
        trucks.push(truck);
    }

    // Rule 7: truck 2 (index 1) — the same truck the 09:05 rule loads
    // delayed-flight packages onto — gets a fixed warm-up wait on its first
    // depot stop, so those packages' load_time lands at or after 09:05
    // instead of start-of-day.
    if trucks.len() > 1 {
        let route = Rc::get_mut(&mut trucks[1].route).expect("fresh truck route is uniquely owned");
        if let Some(stop) = route.depot_stops.first_mut() {
            stop.wait_minutes += TRUCK_TWO_WARMUP_WAIT_MINUTES;
        }
    }

    Ok(Plan::new(trucks))
}

/// Unions every package id mentioned together in a `LinkedWith` note, then
/// hands each member a shared handle to its own group — not, as the
/// original did, to whichever group happened to be built first (§9 bug 2).
fn assign_linked_groups(packages: &mut [Package], truck_capacity: usize) -> Result<(), SolverError> {
    let id_to_idx: HashMap<u32, usize> = packages.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let mut ds = DisjointSets::new(packages.len());

    for pkg in packages.iter() {
        if let PackageNote::LinkedWith(ids) = &pkg.note {
            if let Some(&self_idx) = id_to_idx.get(&pkg.id) {
                for other_id in ids {
                    if let Some(&other_idx) = id_to_idx.get(other_id) {
                        ds.union(self_idx, other_idx);
                    }
                }
            }
        }
    }

    let idx_to_id: Vec<u32> = packages.iter().map(|p| p.id).collect();
    for set in ds.enumerate_sets() {
        if set.len() < 2 {
            continue;
        }
        if set.len() > truck_capacity {
            return Err(SolverError::InfeasibleInput(format!(
                "linked group of {} packages exceeds truck capacity {}",
                set.len(),
                truck_capacity
            )));
        }
        let members: Vec<u32> = set.iter().map(|&i| idx_to_id[i]).collect();
        let group = Rc::new(LinkedGroup { members });
        for idx in set {
            packages[idx].linked_group = Some(group.clone());
        }
    }

    Ok(())
}

fn nearest_neighbor_order(mut pool: Vec<Package>, locations: &Locations, depot_location_id: u32) -> Vec<Package> {
    let mut ordered = Vec::with_capacity(pool.len());
    let mut current = depot_location_id;
    while !pool.is_empty() {
        let (best_idx, _) = pool
            .iter()
            .enumerate()
            .map(|(i, p)| (i, locations.distance(current, p.location_id)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .expect("pool is non-empty");
        let pkg = pool.remove(best_idx);
        current = pkg.location_id;
        ordered.push(pkg);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::Location;
    use std::collections::HashMap as StdHashMap;

    fn flat_locations(ids: &[u32]) -> Locations {
        let mut map = StdHashMap::new();
        for &a in ids {
            let mut loc = Location::new(a, String::new(), String::new(), String::new(), String::new(), 0.0, 0.0);
            for &b in ids {
                if a != b {
                    loc.distances.insert(b, 1.0);
                }
            }
            map.insert(a, loc);
        }
        Locations::new(map)
    }

    fn pkg(id: u32, deadline: &str, notes: &str) -> Package {
        let deadline = NaiveTime::parse_from_str(deadline, "%H:%M").unwrap();
        Package::new(id, id, deadline, 1, notes.to_string(), NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    }

    #[test]
    fn requires_at_least_two_drivers() {
        let locations = flat_locations(&[0, 1]);
        let err = seed(vec![], &locations, 0, 1, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert!(matches!(err, Err(SolverError::ConfigurationError(_))));
    }

    #[test]
    fn seeds_every_package_exactly_once() {
        let ids: Vec<u32> = (1..=10).collect();
        let mut loc_ids = vec![0];
        loc_ids.extend(ids.iter().copied());
        let locations = flat_locations(&loc_ids);
        let packages: Vec<Package> = ids.iter().map(|&id| pkg(id, "23:59", "")).collect();
        let plan = seed(packages, &locations, 0, 2, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap()).unwrap();
        assert_eq!(plan.total_packages(), 10);
    }

    #[test]
    fn required_truck_note_routes_to_that_truck() {
        let loc_ids = vec![0, 1];
        let locations = flat_locations(&loc_ids);
        let packages = vec![pkg(1, "23:59", "Can only be on truck 2")];
        let plan = seed(packages, &locations, 0, 2, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap()).unwrap();
        assert_eq!(plan.trucks[1].route.packages.len(), 1);
        assert_eq!(plan.trucks[0].route.packages.len(), 0);
    }

    /// A delayed-flight package is routed to truck 1 (index 1) by the 09:05
    /// rule; truck 1's warm-up wait must land its load_time at or after
    /// 09:05, even in the canonical 2-driver fleet, or AVAILABLE_WHEN_LOADED
    /// is violated straight out of the seeder.
    #[test]
    fn warmup_wait_on_truck_index_one_keeps_delayed_flight_package_feasible_with_two_drivers() {
        let loc_ids = vec![0, 1];
        let locations = flat_locations(&loc_ids);
        let packages = vec![pkg(
            1,
            "23:59",
            "Delayed on flight---will not arrive to depot until 9:05 am",
        )];
        let mut plan = seed(packages, &locations, 0, 2, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap()).unwrap();
        assert_eq!(plan.trucks[1].route.packages.len(), 1);
        assert_eq!(plan.trucks[1].route.depot_stops[0].wait_minutes, TRUCK_TWO_WARMUP_WAIT_MINUTES);

        let result = crate::evaluation::test_eval(&mut plan, &locations, 0, false);
        assert!(
            result.feasibility.get(crate::evaluation::Constraint::AvailableWhenLoaded),
            "delayed-flight package should load no earlier than 09:05: {result:?}"
        );
    }
}
