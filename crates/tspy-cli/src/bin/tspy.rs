//! The tspy binary: transpile TypeScript declaration files to Python
//! type declarations.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tspy_cli::args::CliArgs;
use tspy_cli::config;
use tspy_cli::driver;
use tspy_cli::reporter::Reporter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.debug);
    let reporter = Reporter::new(args.verbose);

    let base_options = match config::load_config_file(config::config_dir(&args.path)) {
        Ok(Some(options)) => {
            reporter.info(&format!("loaded options from {}", config::CONFIG_FILE));
            options
        }
        Ok(None) => Default::default(),
        Err(error) => {
            reporter.error(&format!("{error:#}"));
            return ExitCode::FAILURE;
        }
    };
    let options = config::resolve_options(&args, base_options);

    match driver::run(&args.path, &options, &reporter) {
        Ok(outcome) if outcome.fatal => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            reporter.error(&format!("{error:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
