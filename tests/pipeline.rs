//! End-to-end exercise of the pipeline (§8): seed a synthetic instance,
//! refine it, anneal it, refine again, and check the quantified invariants
//! hold at each stage.

use chrono::NaiveTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vrptw_solver::annealing::{simulated_annealing, Schedule};
use vrptw_solver::evaluation::test_eval;
use vrptw_solver::fixtures::synthetic_instance;
use vrptw_solver::refinement::{minimize_wait_times, two_opt};
use vrptw_solver::seeder::seed;

const CAPACITY: usize = 16;
const SPEED: f64 = 18.0;
const DRIVERS: usize = 2;

fn start_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap()
}

#[test]
fn seeding_places_every_package_exactly_once_and_feasibly() {
    let instance = synthetic_instance(40, 7, start_of_day());
    let mut plan = seed(
        instance.packages.clone(),
        &instance.locations,
        instance.depot_location_id,
        DRIVERS,
        CAPACITY,
        SPEED,
        start_of_day(),
    )
    .unwrap();

    assert_eq!(plan.total_packages(), 40);
    let result = test_eval(&mut plan, &instance.locations, instance.depot_location_id, false);
    assert!(result.is_feasible(), "seeded plan should be feasible: {result:?}");
}

#[test]
fn two_opt_never_increases_cost_and_stays_feasible() {
    let instance = synthetic_instance(30, 3, start_of_day());
    let mut plan = seed(
        instance.packages.clone(),
        &instance.locations,
        instance.depot_location_id,
        DRIVERS,
        CAPACITY,
        SPEED,
        start_of_day(),
    )
    .unwrap();

    let before = test_eval(&mut plan.clone(), &instance.locations, instance.depot_location_id, false);
    two_opt(&mut plan, &instance.locations, instance.depot_location_id);
    let after = test_eval(&mut plan.clone(), &instance.locations, instance.depot_location_id, false);

    assert!(after.cost <= before.cost);
    assert!(after.is_feasible());
}

#[test]
fn annealing_then_minimize_wait_times_preserves_feasibility_and_package_count() {
    let instance = synthetic_instance(24, 11, start_of_day());
    let mut plan = seed(
        instance.packages.clone(),
        &instance.locations,
        instance.depot_location_id,
        DRIVERS,
        CAPACITY,
        SPEED,
        start_of_day(),
    )
    .unwrap();
    two_opt(&mut plan, &instance.locations, instance.depot_location_id);

    let schedule = Schedule {
        initial_temperature: 200.0,
        final_temperature: 20.0,
        iterations_per_temperature: 20,
        cooling_factor: 0.85,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    plan = simulated_annealing(plan, &instance.locations, instance.depot_location_id, &schedule, &mut rng);
    two_opt(&mut plan, &instance.locations, instance.depot_location_id);
    minimize_wait_times(&mut plan, &instance.locations, instance.depot_location_id);

    assert_eq!(plan.total_packages(), 24);
    let result = test_eval(&mut plan, &instance.locations, instance.depot_location_id, false);
    assert!(result.is_feasible(), "final plan should be feasible: {result:?}");
}

#[test]
fn linked_group_stays_within_one_segment_after_seeding() {
    let instance = synthetic_instance(20, 5, start_of_day());
    let mut packages = instance.packages;
    packages[0].notes = "Must be delivered with 2, 3".to_string();
    packages[0].note = vrptw_solver::domain::package::parse_notes(&packages[0].notes);

    let mut plan = seed(
        packages,
        &instance.locations,
        instance.depot_location_id,
        DRIVERS,
        CAPACITY,
        SPEED,
        start_of_day(),
    )
    .unwrap();

    let result = test_eval(&mut plan, &instance.locations, instance.depot_location_id, false);
    assert!(
        result.feasibility.get(vrptw_solver::evaluation::Constraint::SatisfiedLinkedDeliveries),
        "linked group should be satisfied: {result:?}"
    );
}
