//! Binary entrypoint for the `symfix` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match symfix::run_fix(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
