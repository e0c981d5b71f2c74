use std::error::Error;
use std::fmt;

/// Errors surfaced at the solver boundary. Intermediate infeasible plans
/// produced inside the simulated-annealing loop are never represented here —
/// they are scored through a penalty term instead, see `annealing`.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// Missing/malformed input file, an unknown location id referenced by a
    /// package, or a fleet too small for the seeder's fixed truck-1/truck-2
    /// rules.
    ConfigurationError(String),
    /// The input is structurally infeasible regardless of search effort,
    /// e.g. a linked group larger than truck capacity.
    InfeasibleInput(String),
    /// The location graph is disconnected; at least one pair of locations
    /// has no finite shortest path.
    GraphError(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::ConfigurationError(msg) => write!(f, "configuration error: {msg}"),
            SolverError::InfeasibleInput(msg) => write!(f, "infeasible input: {msg}"),
            SolverError::GraphError(msg) => write!(f, "graph error: {msg}"),
        }
    }
}

impl Error for SolverError {}

pub type SolverResult<T> = Result<T, SolverError>;
