//! Mythic Chronicles - terminal reader for a stories and poetry site

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = mythic_chronicles::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
