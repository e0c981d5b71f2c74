//! The one owning binary's CLI summary (§4.M/§4.N): loads an instance from
//! a data directory, runs the full pipeline, and prints a `colored` summary
//! table in the teacher's `print_solution` style. The interactive
//! terminal status-lookup loop this would normally feed is out of scope.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveTime;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{
    DEFAULT_DATA_DIR, DEFAULT_DEPOT_LOCATION_ID, DEFAULT_NUMBER_DRIVERS, DEFAULT_START_OF_DAY_HOUR,
    DEFAULT_START_OF_DAY_MIN, DEFAULT_TRUCK_CAPACITY, DEFAULT_TRUCK_SPEED,
};
use crate::Plan;
use crate::VrpSolver;

/// Entry point shared by both of this crate's binaries. Takes the data
/// directory as an optional first CLI argument, defaulting to
/// `config::constant::DEFAULT_DATA_DIR`.
pub fn run() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .compact(),
        )
        .init();

    let data_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let start_of_day = NaiveTime::from_hms_opt(DEFAULT_START_OF_DAY_HOUR, DEFAULT_START_OF_DAY_MIN, 0).unwrap();

    let mut solver = match VrpSolver::new(
        DEFAULT_DEPOT_LOCATION_ID,
        DEFAULT_NUMBER_DRIVERS,
        DEFAULT_TRUCK_SPEED,
        DEFAULT_TRUCK_CAPACITY,
        start_of_day,
        &data_dir,
    ) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("{}", format!("configuration error: {err}").red());
            return ExitCode::FAILURE;
        }
    };

    let plan = match solver.run() {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("{}", format!("solve failed: {err}").red());
            return ExitCode::FAILURE;
        }
    };

    print_summary(&solver, &plan);
    ExitCode::SUCCESS
}

fn print_summary(solver: &VrpSolver, plan: &Plan) {
    let result = solver.test_eval(&mut plan.clone(), false);
    if result.is_feasible() {
        println!("{}", format!("Total miles: {:.2}", result.cost).green());
    } else {
        println!("{}", format!("Total miles: {:.2} (INFEASIBLE)", result.cost).red());
    }

    for truck in &plan.trucks {
        let ids: Vec<u32> = truck.route.packages.iter().map(|p| p.id).collect();
        println!(
            "Truck {}: {} packages / {} capacity, {} depot stops",
            truck.number,
            truck.route.len(),
            truck.capacity,
            truck.route.depot_stops.len()
        );
        println!("  route: {ids:?}");
    }
}
