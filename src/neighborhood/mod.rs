//! The 12 reversible move operators (§4.E/4.G) plus [`generate_neighbors`],
//! which tries each exactly once in a shuffled order and yields only the
//! attempts that produced a neighbor. Every operator either returns `None`
//! or a new [`Plan`] that clones only the route(s) it actually touches.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::domain::plan::Plan;

type Operator = fn(&Plan, &mut dyn RngCore) -> Option<Plan>;

const OPERATORS: [Operator; 12] = [
    local_flip,
    local_three_opt,
    local_swap,
    local_insertion,
    local_add_hub,
    local_remove_hub,
    local_move_hub,
    local_add_pause,
    local_remove_pause,
    nonlocal_insertion,
    nonlocal_swap,
    double_bridge,
];

/// Lazily tries each of the 12 operators exactly once, in an order shuffled
/// fresh for every call, yielding a neighbor for every attempt that
/// succeeded.
pub struct NeighborIter<'a> {
    plan: &'a Plan,
    rng: &'a mut dyn RngCore,
    order: Vec<usize>,
    cursor: usize,
}

impl<'a> Iterator for NeighborIter<'a> {
    type Item = Plan;

    fn next(&mut self) -> Option<Plan> {
        while self.cursor < self.order.len() {
            let op_idx = self.order[self.cursor];
            self.cursor += 1;
            if let Some(neighbor) = OPERATORS[op_idx](self.plan, self.rng) {
                return Some(neighbor);
            }
        }
        None
    }
}

pub fn generate_neighbors<'a>(plan: &'a Plan, rng: &'a mut dyn RngCore) -> NeighborIter<'a> {
    let mut order: Vec<usize> = (0..OPERATORS.len()).collect();
    order.shuffle(rng);
    NeighborIter {
        plan,
        rng,
        order,
        cursor: 0,
    }
}

fn routes_with_min_len(plan: &Plan, min_len: usize) -> Vec<usize> {
    (0..plan.num_trucks())
        .filter(|&i| plan.route(i).len() >= min_len)
        .collect()
}

/// Draws two distinct indices in `0..len`, sorted ascending. `None` if
/// `len < 2`.
fn two_distinct(len: usize, rng: &mut dyn RngCore) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let a = rng.gen_range(0..len);
    let mut b = rng.gen_range(0..len);
    while b == a {
        b = rng.gen_range(0..len);
    }
    Some(if a < b { (a, b) } else { (b, a) })
}

/// Draws three distinct interior cut points in `1..len`, sorted ascending,
/// dividing the route into four nonempty segments. `None` if `len < 4` or
/// no distinct triple could be found within a bounded number of attempts.
fn three_cuts(len: usize, rng: &mut dyn RngCore) -> Option<(usize, usize, usize)> {
    if len < 4 {
        return None;
    }
    for _ in 0..32 {
        let mut cuts = [
            rng.gen_range(1..len),
            rng.gen_range(1..len),
            rng.gen_range(1..len),
        ];
        cuts.sort_unstable();
        if cuts[0] < cuts[1] && cuts[1] < cuts[2] {
            return Some((cuts[0], cuts[1], cuts[2]));
        }
    }
    None
}

/// 2-opt: reverse a segment of one route.
fn local_flip(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 2);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let (i, j) = two_distinct(len, rng)?;

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).packages[i..=j].reverse();
    Some(neighbor)
}

/// Strict 3-opt: A + reverse(C) + B + D, distinct from both a 2-opt
/// reversal and the plain segment swap `double_bridge` performs.
fn local_three_opt(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 4);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let (c1, c2, c3) = three_cuts(len, rng)?;

    let mut neighbor = plan.clone();
    let route = neighbor.route_mut(truck_idx);
    let mut reassembled = Vec::with_capacity(route.packages.len());
    reassembled.extend_from_slice(&route.packages[0..c1]);
    reassembled.extend(route.packages[c2..c3].iter().rev().cloned());
    reassembled.extend_from_slice(&route.packages[c1..c2]);
    reassembled.extend_from_slice(&route.packages[c3..]);
    route.packages = reassembled;
    Some(neighbor)
}

/// Swap the positions of two packages within one route.
fn local_swap(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 2);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let (i, j) = two_distinct(len, rng)?;

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).packages.swap(i, j);
    Some(neighbor)
}

/// Remove a package and reinsert it elsewhere in the same route.
fn local_insertion(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 2);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let from = rng.gen_range(0..len);

    let mut neighbor = plan.clone();
    let route = neighbor.route_mut(truck_idx);
    let pkg = route.packages.remove(from);
    let to = rng.gen_range(0..route.packages.len() + 1);
    route.packages.insert(to, pkg);
    Some(neighbor)
}

/// Add a depot stop at a random package-list index that doesn't already
/// have one.
fn local_add_hub(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 1);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let free: Vec<usize> = (1..len)
        .filter(|idx| !plan.route(truck_idx).depot_stops.iter().any(|s| s.route_index == *idx))
        .collect();
    let idx = *free.choose(rng)?;

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).add_depot_stop(idx);
    Some(neighbor)
}

/// Remove a non-start depot stop.
fn local_remove_hub(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates: Vec<usize> = (0..plan.num_trucks())
        .filter(|&i| plan.route(i).depot_stops.iter().any(|s| s.route_index != 0))
        .collect();
    let truck_idx = *candidates.choose(rng)?;
    let removable: Vec<usize> = plan
        .route(truck_idx)
        .depot_stops
        .iter()
        .filter(|s| s.route_index != 0)
        .map(|s| s.route_index)
        .collect();
    let idx = *removable.choose(rng)?;

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).remove_depot_stop(idx);
    Some(neighbor)
}

/// Move a non-start depot stop to a different, unoccupied index.
fn local_move_hub(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates: Vec<usize> = (0..plan.num_trucks())
        .filter(|&i| plan.route(i).depot_stops.iter().any(|s| s.route_index != 0) && plan.route(i).len() >= 2)
        .collect();
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let movable: Vec<usize> = plan
        .route(truck_idx)
        .depot_stops
        .iter()
        .filter(|s| s.route_index != 0)
        .map(|s| s.route_index)
        .collect();
    let from = *movable.choose(rng)?;
    let occupied: std::collections::HashSet<usize> =
        plan.route(truck_idx).depot_stops.iter().map(|s| s.route_index).collect();
    let free: Vec<usize> = (1..len).filter(|idx| !occupied.contains(idx)).collect();
    let to = *free.choose(rng)?;

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).move_depot_stop(from, to);
    Some(neighbor)
}

fn random_pause_delta(rng: &mut dyn RngCore) -> i64 {
    rng.gen_range(1..=30)
}

/// Increase one depot stop's wait by 1..=30 minutes.
fn local_add_pause(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates: Vec<usize> = (0..plan.num_trucks())
        .filter(|&i| !plan.route(i).depot_stops.is_empty())
        .collect();
    let truck_idx = *candidates.choose(rng)?;
    let n = plan.route(truck_idx).depot_stops.len();
    let stop_idx = rng.gen_range(0..n);
    let delta = random_pause_delta(rng);

    let mut neighbor = plan.clone();
    neighbor.route_mut(truck_idx).depot_stops[stop_idx].wait_minutes += delta;
    Some(neighbor)
}

/// Decrease one depot stop's wait by 1..=30 minutes, clamped at 0.
fn local_remove_pause(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates: Vec<usize> = (0..plan.num_trucks())
        .filter(|&i| plan.route(i).depot_stops.iter().any(|s| s.wait_minutes > 0))
        .collect();
    let truck_idx = *candidates.choose(rng)?;
    let eligible: Vec<usize> = plan
        .route(truck_idx)
        .depot_stops
        .iter()
        .enumerate()
        .filter(|(_, s)| s.wait_minutes > 0)
        .map(|(i, _)| i)
        .collect();
    let stop_idx = *eligible.choose(rng)?;
    let delta = random_pause_delta(rng);

    let mut neighbor = plan.clone();
    let stop = &mut neighbor.route_mut(truck_idx).depot_stops[stop_idx];
    stop.wait_minutes = (stop.wait_minutes - delta).max(0);
    Some(neighbor)
}

/// Move a package from one route to a random position in another.
fn nonlocal_insertion(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let nonempty = routes_with_min_len(plan, 1);
    if plan.num_trucks() < 2 || nonempty.is_empty() {
        return None;
    }
    let from_truck = *nonempty.choose(rng)?;
    let others: Vec<usize> = (0..plan.num_trucks()).filter(|&t| t != from_truck).collect();
    let to_truck = *others.choose(rng)?;

    let from_len = plan.route(from_truck).len();
    let from_idx = rng.gen_range(0..from_len);

    let mut neighbor = plan.clone();
    let pkg = {
        let from_route = neighbor.route_mut(from_truck);
        from_route.packages.remove(from_idx)
    };
    let truck_number = neighbor.trucks[to_truck].number;
    let mut pkg = pkg;
    pkg.assigned_truck = Some(truck_number);
    let to_route = neighbor.route_mut(to_truck);
    let to_idx = rng.gen_range(0..to_route.packages.len() + 1);
    to_route.packages.insert(to_idx, pkg);
    Some(neighbor)
}

/// Exchange one package each between two distinct routes.
fn nonlocal_swap(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let nonempty = routes_with_min_len(plan, 1);
    if nonempty.len() < 2 {
        return None;
    }
    let mut chosen = nonempty;
    chosen.shuffle(rng);
    let truck_a = chosen[0];
    let truck_b = chosen[1];

    let idx_a = rng.gen_range(0..plan.route(truck_a).len());
    let idx_b = rng.gen_range(0..plan.route(truck_b).len());

    let mut neighbor = plan.clone();
    let number_a = neighbor.trucks[truck_a].number;
    let number_b = neighbor.trucks[truck_b].number;

    let pkg_a = neighbor.route_mut(truck_a).packages[idx_a].clone();
    let pkg_b = neighbor.route_mut(truck_b).packages[idx_b].clone();

    let mut pkg_a = pkg_a;
    let mut pkg_b = pkg_b;
    pkg_a.assigned_truck = Some(number_b);
    pkg_b.assigned_truck = Some(number_a);

    neighbor.route_mut(truck_a).packages[idx_a] = pkg_b;
    neighbor.route_mut(truck_b).packages[idx_b] = pkg_a;
    Some(neighbor)
}

/// Perturbation: split a route into four segments A B C D and reassemble
/// as A D C B, escaping the local basin a repeated 2-opt/3-opt pass
/// converges to.
fn double_bridge(plan: &Plan, rng: &mut dyn RngCore) -> Option<Plan> {
    let candidates = routes_with_min_len(plan, 4);
    let truck_idx = *candidates.choose(rng)?;
    let len = plan.route(truck_idx).len();
    let (c1, c2, c3) = three_cuts(len, rng)?;

    let mut neighbor = plan.clone();
    let route = neighbor.route_mut(truck_idx);
    let mut reassembled = Vec::with_capacity(route.packages.len());
    reassembled.extend_from_slice(&route.packages[0..c1]);
    reassembled.extend_from_slice(&route.packages[c3..]);
    reassembled.extend_from_slice(&route.packages[c2..c3]);
    reassembled.extend_from_slice(&route.packages[c1..c2]);
    route.packages = reassembled;
    Some(neighbor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::Package;
    use crate::domain::truck::Truck;
    use chrono::NaiveTime;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::rc::Rc;

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

    fn sample_plan() -> Plan {
        let mut truck = Truck::new(1, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0);
        {
            let route = Rc::get_mut(&mut truck.route).unwrap();
            for i in 1..=6 {
                route.packages.push(dummy_package(i));
            }
            route.set_minimal_depot_stops(16);
        }
        let mut truck2 = Truck::new(2, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0);
        {
            let route = Rc::get_mut(&mut truck2.route).unwrap();
            for i in 7..=9 {
                route.packages.push(dummy_package(i));
            }
            route.set_minimal_depot_stops(16);
        }
        Plan::new(vec![truck, truck2])
    }

    fn package_ids(plan: &Plan) -> Vec<u32> {
        let mut ids: Vec<u32> = plan
            .trucks
            .iter()
            .flat_map(|t| t.route.packages.iter().map(|p| p.id))
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn every_operator_preserves_package_multiset() {
        let plan = sample_plan();
        let baseline = package_ids(&plan);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            for neighbor in generate_neighbors(&plan, &mut rng) {
                assert_eq!(package_ids(&neighbor), baseline);
            }
        }
    }

    #[test]
    fn double_bridge_preserves_package_set() {
        let plan = sample_plan();
        let baseline = package_ids(&plan);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        if let Some(neighbor) = double_bridge(&plan, &mut rng) {
            assert_eq!(package_ids(&neighbor), baseline);
        }
    }

}
