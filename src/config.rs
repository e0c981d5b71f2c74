/// Tunable constants for the solver and its ambient shell, mirroring the
/// flat `pub const` layout the rest of this crate's callers expect.
pub mod constant {
    /// Default truck capacity (number of packages) when not overridden by
    /// `VrpSolver::new`.
    pub const DEFAULT_TRUCK_CAPACITY: usize = 16;
    /// Default truck speed in distance units per hour.
    pub const DEFAULT_TRUCK_SPEED: f64 = 18.0;
    /// Default number of drivers. The seeder addresses truck 1 and truck 2
    /// directly (§4.C), so this must never drop below 2.
    pub const DEFAULT_NUMBER_DRIVERS: usize = 2;

    // Simulated-annealing schedule defaults.
    pub const SA_INITIAL_TEMPERATURE: f64 = 1000.0;
    pub const SA_FINAL_TEMPERATURE: f64 = 1.0;
    pub const SA_ITERATIONS_PER_TEMPERATURE: usize = 50;
    pub const SA_COOLING_FACTOR: f64 = 0.95;

    // Infeasible plans are padded by SA_INITIAL_TEMPERATURE * PENALTY_MULTIPLIER
    // before comparison.
    pub const PENALTY_MULTIPLIER: f64 = 1000.0;

    // Fixed warm-up wait (minutes) applied to truck 2's first depot stop by
    // the seeder.
    pub const TRUCK_TWO_WARMUP_WAIT_MINUTES: i64 = 95;

    // Earliest-load note thresholds parsed from SpecialNotes.
    pub const DELAYED_FLIGHT_EARLIEST_LOAD_HOUR: u32 = 9;
    pub const DELAYED_FLIGHT_EARLIEST_LOAD_MIN: u32 = 5;
    pub const WRONG_ADDRESS_EARLIEST_LOAD_HOUR: u32 = 10;
    pub const WRONG_ADDRESS_EARLIEST_LOAD_MIN: u32 = 20;

    // Default relative data directory for the CSV loader.
    pub const DEFAULT_DATA_DIR: &str = "data";
    pub const LOCATIONS_FILE: &str = "locations.csv";
    pub const DISTANCES_FILE: &str = "distances.csv";
    pub const PACKAGES_FILE: &str = "packages.csv";

    // Seed for every deterministic RNG in the crate, threaded explicitly
    // rather than read from a hidden global.
    pub const DEFAULT_RNG_SEED: u64 = 64;

    // Default depot location id and start-of-day, used when the owning
    // binary doesn't override them.
    pub const DEFAULT_DEPOT_LOCATION_ID: u32 = 0;
    pub const DEFAULT_START_OF_DAY_HOUR: u32 = 8;
    pub const DEFAULT_START_OF_DAY_MIN: u32 = 0;
}
