//! Intra-route local search run after seeding and after simulated annealing
//! (§4.G): `two_opt`/`three_opt` repeatedly accept the first improving,
//! feasibility-preserving reconnection until a full pass finds none; then
//! `minimize_wait_times` shrinks every depot stop's wait to the smallest
//! value that keeps the whole plan feasible.

use crate::domain::package::Package;
use crate::domain::plan::Plan;
use crate::domain::Locations;
use crate::evaluation::test_eval;

/// Repeatedly reverses the first improving, feasible `[i, j]` segment of
/// each route independently, until a full scan of that route yields no
/// improvement.
pub fn two_opt(plan: &mut Plan, locations: &Locations, depot_location_id: u32) {
    for truck_idx in 0..plan.num_trucks() {
        loop {
            let len = plan.route(truck_idx).len();
            if len < 2 {
                break;
            }
            let baseline = test_eval(&mut plan.clone(), locations, depot_location_id, false);
            let mut applied = false;

            'scan: for i in 0..len {
                for j in (i + 1)..len {
                    let mut candidate = plan.clone();
                    candidate.route_mut(truck_idx).packages[i..=j].reverse();
                    let candidate_result = test_eval(&mut candidate, locations, depot_location_id, false);
                    if candidate_result.is_feasible() && candidate_result.cost < baseline.cost {
                        *plan = candidate;
                        applied = true;
                        break 'scan;
                    }
                }
            }

            if !applied {
                break;
            }
        }
    }
}

/// One of the seven non-identity 3-opt reconnections of `A B C D`, where
/// `A = packages[0..i]`, `B = packages[i..j]`, `C = packages[j..k]`,
/// `D = packages[k..]`.
fn reconnect(packages: &[Package], i: usize, j: usize, k: usize, variant: u8) -> Vec<Package> {
    let a = &packages[0..i];
    let b = &packages[i..j];
    let c = &packages[j..k];
    let d = &packages[k..];

    let mut out = Vec::with_capacity(packages.len());
    out.extend_from_slice(a);
    match variant {
        0 => {
            out.extend(b.iter().rev().cloned());
            out.extend_from_slice(c);
        }
        1 => {
            out.extend_from_slice(b);
            out.extend(c.iter().rev().cloned());
        }
        2 => {
            out.extend(b.iter().rev().cloned());
            out.extend(c.iter().rev().cloned());
        }
        3 => {
            out.extend_from_slice(c);
            out.extend_from_slice(b);
        }
        4 => {
            out.extend(c.iter().rev().cloned());
            out.extend_from_slice(b);
        }
        5 => {
            out.extend_from_slice(c);
            out.extend(b.iter().rev().cloned());
        }
        6 => {
            out.extend(c.iter().rev().cloned());
            out.extend(b.iter().rev().cloned());
        }
        _ => unreachable!("only 7 non-identity 3-opt reconnections exist"),
    }
    out.extend_from_slice(d);
    out
}

/// Analogous to [`two_opt`] but scans every cut triple `(i, j, k)` and all
/// seven reconnections, accepting the first improving, feasible one.
pub fn three_opt(plan: &mut Plan, locations: &Locations, depot_location_id: u32) {
    for truck_idx in 0..plan.num_trucks() {
        loop {
            let len = plan.route(truck_idx).len();
            if len < 3 {
                break;
            }
            let baseline = test_eval(&mut plan.clone(), locations, depot_location_id, false);
            let mut applied = false;

            'scan: for i in 0..len {
                for j in (i + 1)..len {
                    for k in (j + 1)..=len {
                        for variant in 0u8..7 {
                            let mut candidate = plan.clone();
                            let route = candidate.route_mut(truck_idx);
                            route.packages = reconnect(&route.packages, i, j, k, variant);
                            let candidate_result = test_eval(&mut candidate, locations, depot_location_id, false);
                            if candidate_result.is_feasible() && candidate_result.cost < baseline.cost {
                                *plan = candidate;
                                applied = true;
                                break 'scan;
                            }
                        }
                    }
                }
            }

            if !applied {
                break;
            }
        }
    }
}

/// For every depot stop of every route, decrements its wait by one minute
/// while the full plan stays feasible, reverting the last decrement once it
/// isn't. Idempotent on its own output.
pub fn minimize_wait_times(plan: &mut Plan, locations: &Locations, depot_location_id: u32) {
    for truck_idx in 0..plan.num_trucks() {
        let stop_count = plan.route(truck_idx).depot_stops.len();
        for stop_idx in 0..stop_count {
            loop {
                let wait = plan.route(truck_idx).depot_stops[stop_idx].wait_minutes;
                if wait <= 0 {
                    break;
                }
                plan.route_mut(truck_idx).depot_stops[stop_idx].wait_minutes -= 1;

                let probe_result = test_eval(&mut plan.clone(), locations, depot_location_id, false);
                if probe_result.is_feasible() {
                    continue;
                }
                plan.route_mut(truck_idx).depot_stops[stop_idx].wait_minutes += 1;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::Location;
    use crate::domain::truck::Truck;
    use chrono::NaiveTime;
    use std::collections::HashMap as StdHashMap;
    use std::rc::Rc;

    fn locations_line(n: u32) -> Locations {
        let mut map = StdHashMap::new();
        for a in 0..n {
            let mut loc = Location::new(a, String::new(), String::new(), String::new(), String::new(), 0.0, 0.0);
            for b in 0..n {
                if a != b {
                    loc.distances.insert(b, (a as f64 - b as f64).abs());
                }
            }
            map.insert(a, loc);
        }
        Locations::new(map)
    }

    fn dummy_package(id: u32) -> Package {
        Package::new(
            id,
            id,
            NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
            1,
            String::new(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn two_opt_never_increases_cost() {
        let locations = locations_line(5);
        let mut truck = Truck::new(1, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0);
        {
            let route = Rc::get_mut(&mut truck.route).unwrap();
            for id in [4, 3, 2, 1] {
                route.packages.push(dummy_package(id));
            }
            route.set_minimal_depot_stops(16);
        }
        let mut plan = Plan::new(vec![truck]);
        let before = test_eval(&mut plan.clone(), &locations, 0, false);
        two_opt(&mut plan, &locations, 0);
        let after = test_eval(&mut plan.clone(), &locations, 0, false);
        assert!(after.cost <= before.cost);
        assert!(after.is_feasible());
    }

    #[test]
    fn minimize_wait_times_is_idempotent() {
        let locations = locations_line(3);
        let mut truck = Truck::new(1, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0);
        {
            let route = Rc::get_mut(&mut truck.route).unwrap();
            route.packages.push(dummy_package(1));
            route.packages.push(dummy_package(2));
            route.set_minimal_depot_stops(16);
            route.depot_stops[0].wait_minutes = 30;
        }
        let mut plan = Plan::new(vec![truck]);
        minimize_wait_times(&mut plan, &locations, 0);
        let once = plan.clone();
        minimize_wait_times(&mut plan, &locations, 0);
        assert_eq!(
            once.trucks[0].route.depot_stops[0].wait_minutes,
            plan.trucks[0].route.depot_stops[0].wait_minutes
        );
    }
}
