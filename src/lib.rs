//! Core of a capacitated vehicle routing solver with time windows and side
//! constraints (CVRPTW+, §1). [`VrpSolver`] is the programmatic entry point
//! (§6): it loads a three-CSV instance, seeds a feasible initial plan,
//! anneals it, refines it, and exposes read operations over the result.

pub mod annealing;
pub mod cli;
pub mod config;
pub mod disjoint_set;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod graph;
pub mod loader;
pub mod neighborhood;
pub mod refinement;
pub mod seeder;
pub mod status;

pub use domain::plan::Plan;
pub use error::{SolverError, SolverResult};

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, span, Level};

use crate::annealing::{simulated_annealing, Schedule};
use crate::config::constant::{
    DEFAULT_RNG_SEED, PENALTY_MULTIPLIER, SA_COOLING_FACTOR, SA_FINAL_TEMPERATURE,
    SA_INITIAL_TEMPERATURE, SA_ITERATIONS_PER_TEMPERATURE,
};
use crate::domain::package::Package;
use crate::domain::Locations;
use crate::evaluation::{eval, test_eval, EvalResult};
use crate::status::{lookup_status, StatusRow};

/// The full CVRPTW+ instance plus solver configuration and, once [`run`] has
/// been called, the best plan found (§6).
///
/// [`run`]: VrpSolver::run
pub struct VrpSolver {
    locations: Locations,
    packages: Vec<Package>,
    depot_location_id: u32,
    number_drivers: usize,
    truck_speed: f64,
    truck_capacity: usize,
    start_of_day: NaiveTime,
    rng: ChaCha8Rng,
    plan: Option<Plan>,
}

impl VrpSolver {
    /// Loads `locations.csv`/`distances.csv`/`packages.csv` from `data_dir`
    /// and builds a solver ready to [`run`](VrpSolver::run). Fails with
    /// `ConfigurationError` on a malformed/missing file, an unknown
    /// location reference, or a fleet smaller than the seeder's hard-coded
    /// truck-1/truck-2 rules require.
    pub fn new(
        depot_location_id: u32,
        number_drivers: usize,
        truck_speed: f64,
        truck_capacity: usize,
        start_of_day: NaiveTime,
        data_dir: impl AsRef<Path>,
    ) -> SolverResult<Self> {
        if number_drivers < 2 {
            return Err(SolverError::ConfigurationError(
                "at least 2 drivers are required: the seeder routes packages to truck 1 and truck 2 directly".into(),
            ));
        }

        let data_dir: PathBuf = data_dir.as_ref().to_path_buf();
        let _span = span!(Level::INFO, "load", data_dir = %data_dir.display()).entered();
        let (locations, packages) = loader::load_instance(&data_dir, depot_location_id, start_of_day)?;
        info!(locations = locations.len(), packages = packages.len(), "loaded instance");

        Ok(VrpSolver {
            locations,
            packages,
            depot_location_id,
            number_drivers,
            truck_speed,
            truck_capacity,
            start_of_day,
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_RNG_SEED),
            plan: None,
        })
    }

    /// One built-in corrective command (§6): overrides `pid`'s delivery
    /// location before seeding. Fails if either id is unknown.
    pub fn change_package_address(&mut self, package_id: u32, location_id: u32) -> SolverResult<()> {
        if self.locations.get(location_id).is_none() {
            return Err(SolverError::ConfigurationError(format!(
                "unknown location id {location_id}"
            )));
        }
        let package = self
            .packages
            .iter_mut()
            .find(|p| p.id == package_id)
            .ok_or_else(|| SolverError::ConfigurationError(format!("unknown package id {package_id}")))?;
        package.location_id = location_id;
        Ok(())
    }

    /// Runs the full pipeline (§4.H): seed → two_opt → simulated_annealing
    /// (which two-opts internally) → two_opt → minimize_wait_times. Each
    /// stage's output is checked for full feasibility via `debug_assert!`;
    /// a violation is a programmer error (`InvariantViolation`, §7), never
    /// a `Result` the caller is expected to handle.
    pub fn run(&mut self) -> SolverResult<Plan> {
        let _span = span!(Level::INFO, "run").entered();

        let mut plan = {
            let _span = span!(Level::INFO, "seed").entered();
            let plan = seeder::seed(
                self.packages.clone(),
                &self.locations,
                self.depot_location_id,
                self.number_drivers,
                self.truck_capacity,
                self.truck_speed,
                self.start_of_day,
            )?;
            self.assert_stage_feasible(&plan, "seed");
            plan
        };

        {
            let _span = span!(Level::INFO, "two_opt_initial").entered();
            refinement::two_opt(&mut plan, &self.locations, self.depot_location_id);
            self.assert_stage_feasible(&plan, "two_opt_initial");
        }

        {
            let _span = span!(Level::INFO, "anneal").entered();
            let schedule = Schedule {
                initial_temperature: SA_INITIAL_TEMPERATURE,
                final_temperature: SA_FINAL_TEMPERATURE,
                iterations_per_temperature: SA_ITERATIONS_PER_TEMPERATURE,
                cooling_factor: SA_COOLING_FACTOR,
            };
            plan = simulated_annealing(plan, &self.locations, self.depot_location_id, &schedule, &mut self.rng);
            debug!(
                penalty_pad = SA_INITIAL_TEMPERATURE * PENALTY_MULTIPLIER,
                "annealing complete"
            );
        }

        {
            let _span = span!(Level::INFO, "two_opt_final").entered();
            refinement::two_opt(&mut plan, &self.locations, self.depot_location_id);
        }

        {
            let _span = span!(Level::INFO, "minimize_wait_times").entered();
            refinement::minimize_wait_times(&mut plan, &self.locations, self.depot_location_id);
            self.assert_stage_feasible(&plan, "minimize_wait_times");
        }

        self.plan = Some(plan.clone());
        Ok(plan)
    }

    fn assert_stage_feasible(&self, plan: &Plan, stage: &str) {
        let result = test_eval(&mut plan.clone(), &self.locations, self.depot_location_id, false);
        debug_assert!(result.is_feasible(), "plan infeasible after stage '{stage}': {result:?}");
    }

    /// The best plan [`run`](VrpSolver::run) found so far, if it has run.
    pub fn current_solution(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Total miles of `plan`. Equal to `test_eval(plan, false).cost` when
    /// that call returns all-feasible.
    pub fn eval(&self, plan: &mut Plan) -> f64 {
        eval(plan, &self.locations, self.depot_location_id)
    }

    /// Full feasibility-vector-and-cost evaluation (§4.D).
    pub fn test_eval(&self, plan: &mut Plan, return_early: bool) -> EvalResult {
        test_eval(plan, &self.locations, self.depot_location_id, return_early)
    }

    /// Per-package delivery status as of `time` (§4.M/§7), read off the
    /// current solution.
    pub fn lookup_status(&self, time: NaiveTime, package_ids: &[u32]) -> Vec<StatusRow> {
        match &self.plan {
            Some(plan) => lookup_status(plan, time, package_ids),
            None => package_ids
                .iter()
                .map(|&package_id| StatusRow { package_id, status: None })
                .collect(),
        }
    }

    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn depot_location_id(&self) -> u32 {
        self.depot_location_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_at_least_two_drivers_before_touching_disk() {
        let err = VrpSolver::new(
            0,
            1,
            18.0,
            16,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            "does-not-matter",
        );
        assert!(matches!(err, Err(SolverError::ConfigurationError(_))));
    }
}
