use ReactSim::Utils::logger::{init_logger, level_from_verbosity};
use ReactSim::cli::cli_main::run_cli;
use std::path::Path;
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    // REACTSIM_LOG=<file> additionally writes the full debug log to a file
    let log_file = std::env::var("REACTSIM_LOG").ok();
    if let Err(e) = init_logger(level_from_verbosity(verbose), log_file.as_deref().map(Path::new)) {
        eprintln!("{}", e);
    }
    match run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
