//! icoforge command line
//!
//! Argument parsing, configuration, logging setup and the subcommands behind
//! the `icoforge` binary.

#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{run_build, run_inspect, sizes, BuildOptions, BuildSummary};
pub use config::{CliConfig, DEFAULT_CONFIG_FILE};
pub use logging::{filter_directive, init_logging};
