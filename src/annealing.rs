//! Simulated-annealing driver (§4.F): geometric cooling over the
//! neighborhood, with infeasible candidates padded rather than rejected
//! outright so the search can still cross infeasible regions when needed.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::plan::Plan;
use crate::domain::Locations;
use crate::evaluation::{test_eval, EvalResult};
use crate::neighborhood::generate_neighbors;

#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub iterations_per_temperature: usize,
    pub cooling_factor: f64,
}

fn adjusted_cost(result: &EvalResult, schedule: &Schedule) -> f64 {
    if result.is_feasible() {
        result.cost
    } else {
        result.cost + schedule.initial_temperature * crate::config::constant::PENALTY_MULTIPLIER
    }
}

/// Runs the annealing schedule starting from `initial`, returning the best
/// plan the walk passed through (not necessarily the one it ends on).
pub fn simulated_annealing(
    initial: Plan,
    locations: &Locations,
    depot_location_id: u32,
    schedule: &Schedule,
    rng: &mut ChaCha8Rng,
) -> Plan {
    let mut current = initial.clone();
    let mut current_result = test_eval(&mut current.clone(), locations, depot_location_id, false);
    let mut best = current.clone();
    let mut best_cost = current_result.cost;
    let mut best_feasible = current_result.is_feasible();

    let mut temperature = schedule.initial_temperature;

    while temperature > schedule.final_temperature {
        for _ in 0..schedule.iterations_per_temperature {
            let mut candidate = match generate_neighbors(&current, rng).next() {
                Some(c) => c,
                None => continue,
            };
            let candidate_result = test_eval(&mut candidate, locations, depot_location_id, true);

            let delta = adjusted_cost(&candidate_result, schedule) - adjusted_cost(&current_result, schedule);
            let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();

            if accept {
                let candidate_feasible = candidate_result.is_feasible();
                if candidate_feasible && (!best_feasible || candidate_result.cost < best_cost) {
                    best = candidate.clone();
                    best_cost = candidate_result.cost;
                    best_feasible = true;
                }
                current = candidate;
                current_result = candidate_result;
            }
        }
        temperature *= schedule.cooling_factor;
        debug!(temperature, best_cost, best_feasible, "cooled");
    }

    if best_feasible {
        best
    } else {
        current
    }
}
