use std::process::ExitCode;

fn main() -> ExitCode {
    vrptw_solver::cli::run()
}
