//! Binary entrypoint for the `resym` link audit.

use std::process::ExitCode;

fn main() -> ExitCode {
    match symfix::run_audit(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
