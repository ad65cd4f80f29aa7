//! `icoforge` binary

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use icoforge_cli::{cli, run_build, run_inspect, sizes, CliConfig};
use tracing::debug;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: cannot determine working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config = match CliConfig::resolve(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        &working_dir,
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let verbose = matches.get_flag("verbose") || config.verbose;
    if let Err(err) = icoforge_cli::init_logging(&config.log_level, verbose) {
        eprintln!("warning: logging not initialized: {err}");
    }
    debug!("icoforge v{}", icoforge_core::VERSION);

    match run(&matches, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches, config: &CliConfig) -> Result<()> {
    match matches.subcommand() {
        Some(("build", args)) => {
            let options = cli::build_options(args, config);
            let summary = run_build(&options)?;
            println!("{}", summary.describe());
        }
        Some(("inspect", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .context("missing icon file")?;
            print!("{}", run_inspect(file, args.get_flag("json"))?);
            if args.get_flag("json") {
                println!();
            }
        }
        Some(("sizes", _)) => print!("{}", sizes()),
        _ => {}
    }
    Ok(())
}
