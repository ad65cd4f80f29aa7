//! Argument definitions

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use icoforge_core::{BatchPolicy, Dimension};

use crate::commands::BuildOptions;
use crate::config::CliConfig;

/// Build the `icoforge` command
#[must_use]
pub fn command() -> Command {
    Command::new("icoforge")
        .version(icoforge_core::VERSION)
        .about("Assemble PNG images into a Windows .ico file")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .arg(
            Arg::new("verbose")
                .short('V')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Report every image added and raise logging to debug"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: icoforge.toml in the working directory)"),
        )
        .subcommand(
            Command::new("build")
                .about("Build an icon from a directory or a list of images")
                .arg(
                    Arg::new("inputs")
                        .num_args(0..)
                        .value_parser(value_parser!(PathBuf))
                        .help("One directory, or image files (default: working directory)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Icon file to write"),
                )
                .arg(
                    Arg::new("recursive")
                        .short('r')
                        .long("recursive")
                        .action(ArgAction::SetTrue)
                        .help("Scan subdirectories too"),
                )
                .arg(
                    Arg::new("keep-going")
                        .short('k')
                        .long("keep-going")
                        .action(ArgAction::SetTrue)
                        .help("Skip images that cannot be added instead of stopping"),
                )
                .arg(
                    Arg::new("skip-size")
                        .long("skip-size")
                        .value_name("WxH")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(Dimension))
                        .help("Leave a standard size out of the icon"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the directory of an icon file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Icon file to read"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("sizes").about("List the standard icon sizes"))
}

/// Combine `build` arguments with the loaded config; flags win
#[must_use]
pub fn build_options(args: &ArgMatches, config: &CliConfig) -> BuildOptions {
    let policy = if args.get_flag("keep-going") {
        BatchPolicy::ContinueOnError
    } else {
        config.policy
    };

    BuildOptions {
        inputs: args
            .get_many::<PathBuf>("inputs")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        output: args
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| config.output.clone()),
        recursive: args.get_flag("recursive") || config.recursive,
        policy,
        skip_sizes: args
            .get_many::<Dimension>("skip-size")
            .map(|values| values.copied().collect())
            .unwrap_or_default(),
        verbose: args.get_flag("verbose") || config.verbose,
    }
}
